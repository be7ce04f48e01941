//! `${...}` value interpolation
//!
//! Resolves references to other options, including the default section's
//! options, by chasing substitutions until no reference remains. `${key}`
//! resolves in the requesting section's merged view (section overlaid on
//! defaults), `${section:key}` in another section's merged view, and `$$`
//! escapes a literal dollar. Errors are detected before any
//! partially-substituted output is returned.

use super::document::Config;
use super::error::ConfigError;

fn syntax_error(section: &str, option: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InterpolationSyntax {
        section: section.to_string(),
        option: option.to_string(),
        message: message.into(),
    }
}

/// Resolve one option in the context of `section`, chasing references
/// transitively. `stack` holds the (section, option) pairs currently
/// being resolved; revisiting one is a circular reference.
pub(crate) fn resolve_option(
    config: &Config,
    section: &str,
    option: &str,
    stack: &mut Vec<(String, String)>,
) -> Result<String, ConfigError> {
    let raw = config.get_raw(section, option)?;
    let key = (section.to_string(), option.to_string());
    if stack.contains(&key) {
        return Err(ConfigError::CircularReference {
            section: section.to_string(),
            option: option.to_string(),
        });
    }
    stack.push(key);
    let resolved = resolve_value(config, section, option, raw, stack);
    stack.pop();
    resolved
}

fn resolve_value(
    config: &Config,
    section: &str,
    option: &str,
    value: &str,
    stack: &mut Vec<(String, String)>,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if let Some(after) = tail.strip_prefix('$') {
            out.push('$');
            rest = after;
        } else if let Some(after) = tail.strip_prefix('{') {
            let end = after
                .find('}')
                .ok_or_else(|| syntax_error(section, option, "unterminated '${' reference"))?;
            let reference = &after[..end];
            let resolved = match reference.split_once(':') {
                Some((ref_section, ref_option)) => {
                    if ref_section.is_empty() || ref_option.is_empty() {
                        return Err(syntax_error(
                            section,
                            option,
                            format!("malformed reference '${{{}}}'", reference),
                        ));
                    }
                    resolve_option(config, ref_section, ref_option, stack)?
                }
                None => {
                    if reference.is_empty() {
                        return Err(syntax_error(section, option, "empty '${}' reference"));
                    }
                    resolve_option(config, section, reference, stack)?
                }
            };
            out.push_str(&resolved);
            rest = &after[end + 1..];
        } else {
            return Err(syntax_error(
                section,
                option,
                "'$' must be followed by '$' or '{'",
            ));
        }
    }
    out.push_str(rest);
    Ok(out)
}
