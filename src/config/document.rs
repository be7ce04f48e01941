//! Configuration document model
//!
//! An INI-style document: insertion-ordered sections of string options,
//! with a distinguished default section whose options are visible as
//! fallback values in every other section. Values are stored raw;
//! interpolation happens on read and never rewrites stored text.

use indexmap::IndexMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::defaults::{BUILDDIR, DEFAULT_SECTION, SYSCONFDIR};
use super::error::ConfigError;
use super::{interpolate, merge, parser};

/// A named group of configuration options with raw string values
#[derive(Debug, Clone, Default)]
pub struct Section {
    options: IndexMap<String, String>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of an option, if set in this section
    pub fn get(&self, option: &str) -> Option<&str> {
        self.options.get(option).map(String::as_str)
    }

    pub fn set(&mut self, option: &str, value: &str) {
        self.options.insert(option.to_string(), value.to_string());
    }

    /// Remove an option, returning its raw value if it was present
    pub fn remove(&mut self, option: &str) -> Option<String> {
        self.options.shift_remove(option)
    }

    pub fn contains(&self, option: &str) -> bool {
        self.options.contains_key(option)
    }

    /// Option names in insertion order
    pub fn option_names(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// A contributing config file recorded during loading
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSource {
    /// Path the file was read from
    pub path: PathBuf,

    /// SHA-256 digest of the raw file bytes
    pub digest: String,
}

/// The configuration document
///
/// Built once from builtin defaults plus an ordered series of config
/// files, optionally rewritten by the prefix merge pass, then read-only.
#[derive(Debug, Default)]
pub struct Config {
    defaults: Section,
    sections: IndexMap<String, Section>,
    sources: Vec<ConfigSource>,
}

impl Config {
    /// An empty document with no defaults seeded
    pub fn new() -> Self {
        Self::default()
    }

    /// A document whose default section carries the builtin builder paths,
    /// so config files can write `${builddir}`-style references
    pub fn with_defaults() -> Self {
        let mut config = Self::new();
        config.defaults.set("builddir", BUILDDIR);
        config.defaults.set("sysconfdir", SYSCONFDIR);
        config
    }

    /// Merge one INI text into the document. Later reads override
    /// earlier ones per option.
    pub fn read_str(&mut self, text: &str) -> Result<(), ConfigError> {
        parser::parse_into(self, text)
    }

    /// Read each existing file in order, merging later files over earlier
    /// ones, and record a provenance entry per contributing file.
    ///
    /// Missing files are skipped; unreadable or unparseable files are
    /// errors. Returns the paths actually read.
    pub fn read_files<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Vec<PathBuf>, ConfigError> {
        let mut loaded = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }
            let bytes = fs::read(path)?;
            let digest = hex::encode(Sha256::digest(&bytes));
            let text = String::from_utf8(bytes)
                .map_err(|e| ConfigError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
            parser::parse_into(self, &text).map_err(|e| match e {
                ConfigError::Parse { line, message } => ConfigError::Parse {
                    line,
                    message: format!("{}: {}", path.display(), message),
                },
                other => other,
            })?;
            self.sources.push(ConfigSource {
                path: path.to_path_buf(),
                digest,
            });
            loaded.push(path.to_path_buf());
        }
        Ok(loaded)
    }

    /// The default section
    pub fn defaults(&self) -> &Section {
        &self.defaults
    }

    /// Files that contributed to this document, in read order
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Section by name; the default-section name resolves to the
    /// default section itself
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.section_view(name).ok()
    }

    /// Names of the non-default sections, in insertion order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Create an empty section if it does not exist
    pub fn add_section(&mut self, name: &str) {
        self.ensure_section(name);
    }

    /// Set an option's raw value. The section must exist.
    pub fn set(&mut self, section: &str, option: &str, value: &str) -> Result<(), ConfigError> {
        self.section_mut(section)?.set(option, value);
        Ok(())
    }

    /// Store a boolean in shell style `true`/`false`
    pub fn set_boolean(
        &mut self,
        section: &str,
        option: &str,
        value: bool,
    ) -> Result<(), ConfigError> {
        let text = if value { "true" } else { "false" };
        self.set(section, option, text)
    }

    /// Resolved value of an option: the default section's options are
    /// overlaid under the section's own (section wins), then `${...}`
    /// references are substituted transitively.
    pub fn get(&self, section: &str, option: &str) -> Result<String, ConfigError> {
        let mut stack = Vec::new();
        interpolate::resolve_option(self, section, option, &mut stack)
    }

    /// Literal stored value of an option, never substituted. Falls back
    /// to the default section like resolved reads do.
    pub fn get_raw(&self, section: &str, option: &str) -> Result<&str, ConfigError> {
        let view = self.section_view(section)?;
        if let Some(value) = view.get(option) {
            return Ok(value);
        }
        if let Some(value) = self.defaults.get(option) {
            return Ok(value);
        }
        Err(ConfigError::UnknownOption {
            section: section.to_string(),
            option: option.to_string(),
        })
    }

    /// Resolved value parsed with the shell boolean vocabulary:
    /// `1/yes/true/on` and `0/no/false/off`, case-insensitive
    pub fn get_boolean(&self, section: &str, option: &str) -> Result<bool, ConfigError> {
        let value = self.get(section, option)?;
        if ["1", "yes", "true", "on"]
            .iter()
            .any(|t| value.eq_ignore_ascii_case(t))
        {
            return Ok(true);
        }
        if ["0", "no", "false", "off"]
            .iter()
            .any(|t| value.eq_ignore_ascii_case(t))
        {
            return Ok(false);
        }
        Err(ConfigError::InvalidBoolean {
            section: section.to_string(),
            option: option.to_string(),
            value,
        })
    }

    /// The `(option, value)` pairs whose keys come from the section
    /// itself, never from the default section, with values resolved
    /// against the merged view so interpolation can still reach
    /// default-defined variables.
    pub fn items_no_default(&self, section: &str) -> Result<Vec<(String, String)>, ConfigError> {
        let view = self.section_view(section)?;
        let mut items = Vec::with_capacity(view.len());
        for name in view.option_names() {
            let mut stack = Vec::new();
            let value = interpolate::resolve_option(self, section, name, &mut stack)?;
            items.push((name.to_string(), value));
        }
        Ok(items)
    }

    /// Raw flavor of [`items_no_default`](Self::items_no_default)
    pub fn items_no_default_raw(
        &self,
        section: &str,
    ) -> Result<Vec<(String, String)>, ConfigError> {
        let view = self.section_view(section)?;
        let mut items = Vec::with_capacity(view.len());
        for name in view.option_names() {
            let value = self.get_raw(section, name)?;
            items.push((name.to_string(), value.to_string()));
        }
        Ok(items)
    }

    /// Collapse `<prefix>_add_*`/`<prefix>_del_*` fragment options of a
    /// section into `<prefix>`. See [`merge::merge_option_prefix`].
    pub fn merge_option_prefix(&mut self, section: &str, prefix: &str) -> Result<(), ConfigError> {
        let sect = self.section_mut(section)?;
        merge::merge_option_prefix(sect, prefix)
    }

    /// Render the resolved document as INI text. Embedded newlines are
    /// written as tab-indented continuation lines.
    pub fn to_ini_string(&self) -> Result<String, ConfigError> {
        let mut out = String::new();
        let mut names = vec![DEFAULT_SECTION];
        names.extend(self.section_names());
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("[{}]\n", name));
            for (option, value) in self.items_no_default(name)? {
                out.push_str(&format!("{} = {}\n", option, value.replace('\n', "\n\t")));
            }
        }
        Ok(out)
    }

    /// Render the resolved document and its provenance as JSON
    pub fn to_json(&self) -> Result<serde_json::Value, ConfigError> {
        let mut sections = serde_json::Map::new();
        let mut names = vec![DEFAULT_SECTION];
        names.extend(self.section_names());
        for name in names {
            let mut options = serde_json::Map::new();
            for (option, value) in self.items_no_default(name)? {
                options.insert(option, serde_json::Value::String(value));
            }
            sections.insert(name.to_string(), serde_json::Value::Object(options));
        }
        Ok(serde_json::json!({
            "sections": sections,
            "sources": self.sources,
        }))
    }

    pub(crate) fn section_view(&self, name: &str) -> Result<&Section, ConfigError> {
        if name == DEFAULT_SECTION {
            return Ok(&self.defaults);
        }
        self.sections
            .get(name)
            .ok_or_else(|| ConfigError::UnknownSection(name.to_string()))
    }

    fn section_mut(&mut self, name: &str) -> Result<&mut Section, ConfigError> {
        if name == DEFAULT_SECTION {
            return Ok(&mut self.defaults);
        }
        self.sections
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownSection(name.to_string()))
    }

    pub(crate) fn ensure_section(&mut self, name: &str) -> &mut Section {
        if name == DEFAULT_SECTION {
            return &mut self.defaults;
        }
        self.sections.entry(name.to_string()).or_default()
    }
}
