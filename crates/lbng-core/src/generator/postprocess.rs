//! Source-to-source pass over the rendered module.

use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

pub trait PostProcessor {
    fn process(&self, source: &str) -> Result<String>;
}

/// Lowers the rendered module to ES5 and tidies whitespace:
/// `const`/`let` declarations become `var`, trailing whitespace is dropped,
/// runs of blank lines collapse to one and the text ends with a single newline.
pub struct Downlevel;

fn block_scoped_declaration() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^([ \t]*)(?:const|let)[ \t]+").expect("declaration pattern is valid")
    })
}

impl PostProcessor for Downlevel {
    fn process(&self, source: &str) -> Result<String> {
        let normalized = source.replace("\r\n", "\n");
        let lowered = block_scoped_declaration().replace_all(&normalized, "${1}var ");

        let mut out = String::with_capacity(lowered.len());
        let mut blank_run = 0;
        for line in lowered.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                blank_run += 1;
                if blank_run > 1 || out.is_empty() {
                    continue;
                }
            } else {
                blank_run = 0;
            }
            out.push_str(line);
            out.push('\n');
        }

        while out.ends_with("\n\n") {
            out.pop();
        }
        if out.is_empty() {
            out.push('\n');
        }
        Ok(out)
    }
}
