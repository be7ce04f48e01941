//! Prefix add/del option merging
//!
//! Collapses options named `<prefix>_add_*` and `<prefix>_del_*` into a
//! single `<prefix>` option, so layered config sources can each
//! contribute additions and removals to a list-valued setting without
//! knowing about each other. Operates on raw values only; fragment
//! values are never interpolated here.

use globset::{Glob, GlobMatcher};
use indexmap::IndexSet;
use std::collections::BTreeSet;

use super::document::Section;
use super::error::ConfigError;

const ADD_MARKER: &str = "_add_";
const DEL_MARKER: &str = "_del_";

/// Final value of a merged option from its explicit value and its
/// add/del fragment values. An explicit value always wins unchanged;
/// otherwise the result is the sorted set difference of the
/// whitespace-split add and del tokens, joined with newlines.
pub fn resolve_fragments(
    explicit: Option<&str>,
    add_values: &[String],
    del_values: &[String],
) -> String {
    if let Some(value) = explicit {
        return value.to_string();
    }
    let mut add: BTreeSet<&str> = BTreeSet::new();
    for value in add_values {
        add.extend(value.split_whitespace());
    }
    let mut del: BTreeSet<&str> = BTreeSet::new();
    for value in del_values {
        del.extend(value.split_whitespace());
    }
    add.difference(&del)
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse the `<prefix>_add_*`/`<prefix>_del_*` options of a section
/// into `<prefix>`.
///
/// If `<prefix>` is already set explicitly it is left untouched. Either
/// way every matched fragment option is deleted afterwards, so authored
/// fragments are discarded silently when an explicit value made them
/// moot. The match lists are snapshotted before any mutation.
pub fn merge_option_prefix(section: &mut Section, prefix: &str) -> Result<(), ConfigError> {
    let add_opts = matching_options(section, prefix, ADD_MARKER)?;
    let del_opts = matching_options(section, prefix, DEL_MARKER)?;

    let explicit = section.get(prefix).map(str::to_string);
    let add_values: Vec<String> = values_of(section, &add_opts);
    let del_values: Vec<String> = values_of(section, &del_opts);
    let merged = resolve_fragments(explicit.as_deref(), &add_values, &del_values);
    if explicit.is_none() {
        section.set(prefix, &merged);
    }

    for name in add_opts.iter().chain(del_opts.iter()) {
        section.remove(name);
    }
    Ok(())
}

/// Prefixes that have at least one add/del fragment in the section, in
/// first-appearance order
pub fn fragment_prefixes(section: &Section) -> Vec<String> {
    let mut prefixes: IndexSet<String> = IndexSet::new();
    for name in section.option_names() {
        let add_pos = name.find(ADD_MARKER);
        let del_pos = name.find(DEL_MARKER);
        let pos = match (add_pos, del_pos) {
            (Some(a), Some(d)) => a.min(d),
            (Some(a), None) => a,
            (None, Some(d)) => d,
            (None, None) => continue,
        };
        if pos > 0 {
            prefixes.insert(name[..pos].to_string());
        }
    }
    prefixes.into_iter().collect()
}

fn suffix_matcher(prefix: &str, marker: &str) -> Result<GlobMatcher, ConfigError> {
    let pattern = format!("{}{}*", globset::escape(prefix), marker);
    Ok(Glob::new(&pattern)?.compile_matcher())
}

fn matching_options(
    section: &Section,
    prefix: &str,
    marker: &str,
) -> Result<Vec<String>, ConfigError> {
    let matcher = suffix_matcher(prefix, marker)?;
    Ok(section
        .option_names()
        .filter(|name| matcher.is_match(name))
        .map(str::to_string)
        .collect())
}

fn values_of(section: &Section, options: &[String]) -> Vec<String> {
    options
        .iter()
        .filter_map(|name| section.get(name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(options: &[(&str, &str)]) -> Section {
        let mut section = Section::new();
        for (name, value) in options {
            section.set(name, value);
        }
        section
    }

    #[test]
    fn test_merge_add_and_del_fragments() {
        let mut sect = section(&[
            ("packages_add_a", "foo bar"),
            ("packages_add_b", "baz"),
            ("packages_del_a", "bar"),
        ]);
        merge_option_prefix(&mut sect, "packages").unwrap();
        assert_eq!(sect.get("packages"), Some("baz\nfoo"));
        assert!(!sect.contains("packages_add_a"));
        assert!(!sect.contains("packages_add_b"));
        assert!(!sect.contains("packages_del_a"));
    }

    #[test]
    fn test_explicit_value_wins_but_fragments_go() {
        let mut sect = section(&[("packages", "explicit"), ("packages_add_a", "x")]);
        merge_option_prefix(&mut sect, "packages").unwrap();
        assert_eq!(sect.get("packages"), Some("explicit"));
        assert!(!sect.contains("packages_add_a"));
    }

    #[test]
    fn test_no_fragments_yields_empty_option() {
        let mut sect = section(&[("other", "x")]);
        merge_option_prefix(&mut sect, "packages").unwrap();
        assert_eq!(sect.get("packages"), Some(""));
    }

    #[test]
    fn test_duplicate_tokens_collapse() {
        let mut sect = section(&[
            ("packages_add_a", "foo foo bar"),
            ("packages_add_b", "bar"),
        ]);
        merge_option_prefix(&mut sect, "packages").unwrap();
        assert_eq!(sect.get("packages"), Some("bar\nfoo"));
    }

    #[test]
    fn test_whitespace_only_fragments_contribute_nothing() {
        let mut sect = section(&[("packages_add_a", "  \t "), ("packages_add_b", "foo")]);
        merge_option_prefix(&mut sect, "packages").unwrap();
        assert_eq!(sect.get("packages"), Some("foo"));
    }

    #[test]
    fn test_del_of_absent_token_is_harmless() {
        let mut sect = section(&[("packages_add_a", "foo"), ("packages_del_a", "bar baz")]);
        merge_option_prefix(&mut sect, "packages").unwrap();
        assert_eq!(sect.get("packages"), Some("foo"));
    }

    #[test]
    fn test_merge_twice_is_a_noop() {
        let mut sect = section(&[("packages_add_a", "foo bar")]);
        merge_option_prefix(&mut sect, "packages").unwrap();
        let first = sect.get("packages").map(str::to_string);
        merge_option_prefix(&mut sect, "packages").unwrap();
        assert_eq!(sect.get("packages").map(str::to_string), first);
    }

    #[test]
    fn test_prefix_matching_is_case_sensitive() {
        let mut sect = section(&[("Packages_add_a", "foo")]);
        merge_option_prefix(&mut sect, "packages").unwrap();
        assert_eq!(sect.get("packages"), Some(""));
        assert_eq!(sect.get("Packages_add_a"), Some("foo"));
    }

    #[test]
    fn test_distinct_prefixes_do_not_mix() {
        let mut sect = section(&[
            ("packages_add_a", "foo"),
            ("debs_add_a", "bar"),
        ]);
        merge_option_prefix(&mut sect, "packages").unwrap();
        assert_eq!(sect.get("packages"), Some("foo"));
        assert_eq!(sect.get("debs_add_a"), Some("bar"));
    }

    #[test]
    fn test_fragments_are_not_interpolated() {
        let mut sect = section(&[("packages_add_a", "${base} foo")]);
        merge_option_prefix(&mut sect, "packages").unwrap();
        assert_eq!(sect.get("packages"), Some("${base}\nfoo"));
    }

    #[test]
    fn test_empty_suffix_matches() {
        let mut sect = section(&[("packages_add_", "foo")]);
        merge_option_prefix(&mut sect, "packages").unwrap();
        assert_eq!(sect.get("packages"), Some("foo"));
        assert!(!sect.contains("packages_add_"));
    }

    #[test]
    fn test_resolve_fragments_explicit_wins() {
        let value = resolve_fragments(
            Some("explicit"),
            &["foo".to_string()],
            &["foo".to_string()],
        );
        assert_eq!(value, "explicit");
    }

    #[test]
    fn test_resolve_fragments_sorted_difference() {
        let value = resolve_fragments(
            None,
            &["zed alpha".to_string(), "mid".to_string()],
            &["mid".to_string()],
        );
        assert_eq!(value, "alpha\nzed");
    }

    #[test]
    fn test_fragment_prefixes_discovery() {
        let sect = section(&[
            ("packages_add_a", "foo"),
            ("packages_del_b", "bar"),
            ("debs_add_x", "baz"),
            ("plain", "v"),
        ]);
        assert_eq!(fragment_prefixes(&sect), vec!["packages", "debs"]);
    }

    #[test]
    fn test_fragment_prefixes_uses_first_marker() {
        let sect = section(&[("a_add_b_del_c", "x")]);
        assert_eq!(fragment_prefixes(&sect), vec!["a"]);
    }
}
