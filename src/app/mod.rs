pub mod batch_use_case;
pub mod fetch_title_use_case;
pub mod ports;
