use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use title_fetcher::app::ports::HttpClientPort;
use title_fetcher::config::Config;
use title_fetcher::infra::http_client::ReqwestHttp;
use title_fetcher::{logging, metrics, server};
use title_fetcher::{BatchOrchestrator, ConcurrencyLimit, SharedOrchestrator, TitleError};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "title_fetcher")]
#[command(about = "Fetch the HTML titles of a batch of web addresses")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve GET /I/want/title?address=...
    Serve {
        /// Listen port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
        #[command(flatten)]
        tuning: Tuning,
    },
    /// Resolve the given addresses once and print one line per address
    Fetch {
        #[arg(required = true)]
        addresses: Vec<String>,
        #[command(flatten)]
        tuning: Tuning,
    },
}

#[derive(Args)]
struct Tuning {
    /// Per-address deadline in milliseconds, redirects included (overrides REQUEST_TIMEOUT)
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Redirect hops followed before giving up (overrides MAX_REDIRECTS)
    #[arg(long)]
    max_redirects: Option<u32>,
    /// unbounded, sequential or a positive number of fetches in flight (overrides CONCURRENCY_LIMIT)
    #[arg(long)]
    concurrency: Option<ConcurrencyLimit>,
}

impl Tuning {
    fn apply(&self, config: &mut Config) {
        if let Some(ms) = self.timeout_ms.filter(|ms| *ms > 0) {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(max) = self.max_redirects {
            config.max_redirects = max;
        }
        if let Some(limit) = self.concurrency {
            config.concurrency = limit;
        }
    }
}

fn build_orchestrator(config: &Config) -> Result<SharedOrchestrator, TitleError> {
    let http: Arc<dyn HttpClientPort> = Arc::new(ReqwestHttp::new()?);
    Ok(Arc::new(BatchOrchestrator::from_config(config, http)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging(&logging::log_dir_from_env());

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Serve { port, tuning } => {
            tuning.apply(&mut config);
            if let Some(port) = port {
                config.port = port;
            }
            info!(
                port = config.port,
                timeout_ms = config.request_timeout.as_millis() as u64,
                max_redirects = config.max_redirects,
                concurrency = %config.concurrency,
                "Starting title server"
            );
            metrics::init_metrics();
            let orchestrator = build_orchestrator(&config)?;
            server::start_server(orchestrator, config.port).await?;
        }
        Commands::Fetch { addresses, tuning } => {
            tuning.apply(&mut config);
            let orchestrator = build_orchestrator(&config)?;
            match orchestrator.handle_batch(addresses).await {
                Ok(batch) => {
                    for line in batch.rendered_lines() {
                        println!("{line}");
                    }
                }
                Err(e) => {
                    error!("Batch failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}
