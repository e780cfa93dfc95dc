//! Canonical XML escaping.
//!
//! Every textual leaf in every emitted part passes through [`escape`];
//! no block type bypasses it. The same function covers element content
//! and attribute values, so quotes are always escaped.

/// Escape the five XML-significant characters.
pub fn escape(s: &str) -> String {
    // Fast path: most document text contains nothing to escape.
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
