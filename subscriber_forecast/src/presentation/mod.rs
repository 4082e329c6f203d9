//! Rendering of the dashboard: charts, tables and the page itself
//!
//! All renderers are pure functions from pipeline output to text. Charts
//! are drawn with plotters into in-memory SVG, tables and the page are HTML
//! or plain text.

pub mod chart;
pub mod diagnostics;
pub mod page;
pub mod tables;

/// Escape text for use inside HTML/SVG content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
