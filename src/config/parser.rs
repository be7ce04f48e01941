//! INI-style configuration text parsing
//!
//! Sections are `[name]` headers; options are `key = value` or
//! `key: value` lines. Full-line comments start with `#` or `;`.
//! A non-blank line starting with whitespace continues the previous
//! option's value; continuation lines are joined with newlines.

use std::collections::HashSet;

use super::document::Config;
use super::error::ConfigError;

struct Pending {
    section: String,
    option: String,
    value: String,
}

fn parse_error(line: usize, message: impl Into<String>) -> ConfigError {
    ConfigError::Parse {
        line,
        message: message.into(),
    }
}

/// Parse one INI text into the document. Within the text, duplicate
/// sections and options are errors; relative to earlier parses they
/// override.
pub(crate) fn parse_into(config: &mut Config, text: &str) -> Result<(), ConfigError> {
    let mut current_section: Option<String> = None;
    let mut pending: Option<Pending> = None;
    let mut seen_sections: HashSet<String> = HashSet::new();
    let mut seen_options: HashSet<(String, String)> = HashSet::new();

    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if line.starts_with([' ', '\t']) {
            let pending = pending
                .as_mut()
                .ok_or_else(|| parse_error(lineno, "continuation line without an option"))?;
            if !pending.value.is_empty() {
                pending.value.push('\n');
            }
            pending.value.push_str(trimmed);
            continue;
        }

        if trimmed.starts_with('[') {
            let name = trimmed
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    parse_error(lineno, format!("malformed section header '{}'", trimmed))
                })?;
            if !seen_sections.insert(name.to_string()) {
                return Err(parse_error(lineno, format!("duplicate section '{}'", name)));
            }
            flush(config, &mut pending);
            config.ensure_section(name);
            current_section = Some(name.to_string());
            continue;
        }

        let pos = trimmed
            .find(['=', ':'])
            .ok_or_else(|| parse_error(lineno, format!("expected 'key = value', got '{}'", trimmed)))?;
        let option = trimmed[..pos].trim_end();
        if option.is_empty() {
            return Err(parse_error(lineno, "empty option name"));
        }
        let value = trimmed[pos + 1..].trim();
        let section = current_section
            .clone()
            .ok_or_else(|| parse_error(lineno, "option before any section header"))?;
        if !seen_options.insert((section.clone(), option.to_string())) {
            return Err(parse_error(
                lineno,
                format!("duplicate option '{}' in section '{}'", option, section),
            ));
        }
        flush(config, &mut pending);
        pending = Some(Pending {
            section,
            option: option.to_string(),
            value: value.to_string(),
        });
    }
    flush(config, &mut pending);
    Ok(())
}

fn flush(config: &mut Config, pending: &mut Option<Pending>) {
    if let Some(p) = pending.take() {
        config.ensure_section(&p.section).set(&p.option, &p.value);
    }
}
