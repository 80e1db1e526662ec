//! HTML pages served by the listener.

use crate::types::Batch;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Website Titles</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            margin: 0;
            padding: 20px;
            background-color: #f4f4f9;
            color: #333;
        }
        h1 {
            color: #444;
        }
        ul {
            list-style-type: none;
            padding: 0;
        }
        li {
            background: #fff;
            margin: 10px 0;
            padding: 10px;
            border: 1px solid #ddd;
            border-radius: 5px;
        }
    </style>
</head>
<body>
    <h1>Following are the titles of the given websites:</h1>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

pub const BAD_REQUEST_PAGE: &str = "<h1>400 Bad Request</h1><p>No addresses provided.</p>";
pub const NOT_FOUND_PAGE: &str = "<h1>404 Not Found</h1>";
pub const SERVER_ERROR_PAGE: &str = "<h1>500 Internal Server Error</h1>";

/// One `<li>` per batch entry, in batch order.
pub fn render_html(batch: &Batch) -> String {
    let items: Vec<String> = batch
        .rendered_lines()
        .iter()
        .map(|line| format!("        <li>{}</li>", escape_html(line)))
        .collect();

    format!("{PAGE_HEAD}    <ul>\n{}\n    </ul>\n{PAGE_TAIL}", items.join("\n"))
}

/// Remote titles and caller-supplied addresses are untrusted text.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
