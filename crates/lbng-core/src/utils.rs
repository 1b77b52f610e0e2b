use anyhow::Result;
use std::fs;
use std::path::Path;

/// Marker that separates generated output from hand-written additions.
pub const CUSTOM_MARKER: &str = "// === LBNG:CUSTOM ===";

/// Write content to a file, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Read a file and split at the LBNG:CUSTOM marker.
/// Returns (before_marker, custom_block) where custom_block includes the marker line.
pub fn read_with_custom_block(path: &Path) -> Option<(String, String)> {
    let content = fs::read_to_string(path).ok()?;
    content
        .find(CUSTOM_MARKER)
        .map(|pos| (content[..pos].to_string(), content[pos..].to_string()))
}

/// Compose what `write_generated` would put on disk, without touching it.
pub fn merge_custom_block(path: &Path, generated: &str) -> String {
    match read_with_custom_block(path) {
        Some((_, custom_block)) => format!("{}{}", generated, custom_block),
        None => generated.to_string(),
    }
}

/// Write generated content, preserving custom block if file already exists.
pub fn write_generated(path: &Path, generated: &str) -> Result<()> {
    let content = merge_custom_block(path, generated);
    write_file(path, &content)
}

/// Unified diff between the file on disk and what would be written.
pub fn unified_diff(old: &str, new: &str, path: &str) -> String {
    use similar::TextDiff;
    let diff = TextDiff::from_lines(old, new);
    let mut output = format!("--- a/{}\n+++ b/{}\n", path, path);
    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        output.push_str(&hunk.to_string());
    }
    output
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pluralize an English word (same rules as the Tera `plural` filter).
pub fn pluralize(s: &str) -> String {
    if s.ends_with('s') || s.ends_with('x') || s.ends_with("ch") || s.ends_with("sh") {
        format!("{}es", s)
    } else if s.ends_with('y')
        && !s.ends_with("ay")
        && !s.ends_with("ey")
        && !s.ends_with("oy")
        && !s.ends_with("uy")
    {
        format!("{}ies", &s[..s.len() - 1])
    } else {
        format!("{}s", s)
    }
}

/// Quote a string as a single-quoted JavaScript literal.
pub fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Pretty CLI output helpers using the `colored` crate.
///
/// Diagnostics go to stderr: stdout may be carrying the generated module.
pub mod ui {
    use colored::Colorize;

    /// Print a "create" action (green)
    pub fn created(path: &str) {
        eprintln!("  {} {}", "create".green(), path);
    }

    /// Print an "update" action (cyan)
    pub fn updated(path: &str) {
        eprintln!("  {} {}", "update".cyan(), path);
    }

    /// Print a success message (green bold)
    pub fn success(msg: &str) {
        eprintln!("\n{}", msg.green().bold());
    }

    /// Print a warning (yellow)
    pub fn warn(msg: &str) {
        eprintln!("  {} {}", "warn".yellow(), msg);
    }

    /// Print an error (red)
    pub fn error(msg: &str) {
        eprintln!("  {} {}", "error".red(), msg);
    }
}
