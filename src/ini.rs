//! INI documents in the dialect used by `gallery.ini` and `album.ini`.
//!
//! The format follows the classic `configparser` conventions photographers
//! already know from hand-edited config files:
//!
//! ```text
//! [album]
//! title = Summer in Lisbon
//! date: 2017-05-15
//!
//! [photos]
//! DSC_0001.JPG = Tram 28| climbing up to Alfama
//! DSC_0002.JPG
//! ```
//!
//! ## Key normalization
//!
//! Option keys are lowercased so `Title` and `title` are the same key, except
//! keys containing a `.`: those are file names in the `[photos]` section and
//! keep their exact case. Lookups go through the same normalization.
//!
//! ## Ordering
//!
//! Sections and options are stored in file order. The order of the `[photos]`
//! section is the display order of an album, so nothing here may reorder it.
//!
//! ## Accepted syntax
//!
//! - `key = value` and `key: value`, split at the first delimiter, both sides trimmed
//! - bare `key` lines (option present, no value)
//! - full-line comments starting with `#` or `;`
//! - lines indented deeper than an option with a value continue that value;
//!   blank lines between continuation lines stay in the value

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IniError {
    #[error("line {line}: option {key:?} appears before any [section] header")]
    MissingSectionHeader { line: usize, key: String },
    #[error("line {line}: malformed section header {text:?}")]
    MalformedSection { line: usize, text: String },
    #[error("line {line}: section [{section}] already defined")]
    DuplicateSection { line: usize, section: String },
    #[error("line {line}: option {key:?} already defined in [{section}]")]
    DuplicateOption {
        line: usize,
        section: String,
        key: String,
    },
}

/// Normalize an option key: file names (anything with a `.`) keep their case,
/// every other key is lowercased.
pub fn normalize_key(key: &str) -> String {
    if key.contains('.') {
        key.to_string()
    } else {
        key.to_lowercase()
    }
}

/// One `[name]` block with its options in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, Option<String>)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Options in file order. Bare keys yield `None`.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let key = normalize_key(key);
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Value of an option. Returns `None` both for missing and bare keys.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = normalize_key(key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Set an option, replacing an existing value in place or appending.
    pub fn set(&mut self, key: &str, value: Option<String>) {
        let key = normalize_key(key);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ini {
    sections: Vec<Section>,
}

impl Ini {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, IniError> {
        let mut ini = Ini::new();
        // Option a continuation line would extend, and the indent of its line.
        let mut last_option: Option<(usize, usize)> = None;
        // Blank lines seen inside the current value, kept only if it continues.
        let mut pending_blanks = 0;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();

            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }
            if trimmed.is_empty() {
                let has_value = last_option.is_some_and(|(option_idx, _)| {
                    ini.sections
                        .last()
                        .is_some_and(|s| s.entries[option_idx].1.is_some())
                });
                if has_value {
                    pending_blanks += 1;
                } else {
                    last_option = None;
                }
                continue;
            }

            let indent = raw.len() - raw.trim_start().len();
            if let Some((option_idx, option_indent)) = last_option
                && indent > option_indent
                && let Some(section) = ini.sections.last_mut()
                && let Some(value) = section.entries[option_idx].1.as_mut()
            {
                for _ in 0..=pending_blanks {
                    value.push('\n');
                }
                value.push_str(trimmed);
                pending_blanks = 0;
                continue;
            }
            pending_blanks = 0;

            if trimmed.starts_with('[') {
                let Some(name) = trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                else {
                    return Err(IniError::MalformedSection {
                        line: line_no,
                        text: trimmed.to_string(),
                    });
                };
                if ini.section(name).is_some() {
                    return Err(IniError::DuplicateSection {
                        line: line_no,
                        section: name.to_string(),
                    });
                }
                ini.sections.push(Section::new(name));
                last_option = None;
                continue;
            }

            let (key, value) = split_option(trimmed);
            let key = normalize_key(key);
            let Some(section) = ini.sections.last_mut() else {
                return Err(IniError::MissingSectionHeader { line: line_no, key });
            };
            if section.entries.iter().any(|(k, _)| *k == key) {
                return Err(IniError::DuplicateOption {
                    line: line_no,
                    section: section.name.clone(),
                    key,
                });
            }
            section.entries.push((key, value.map(String::from)));
            last_option = Some((section.entries.len() - 1, indent));
        }

        Ok(ini)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Value of `key` in `section`, if both exist and the option has a value.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Get a section for editing, creating it at the end if missing.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        let pos = match self.sections.iter().position(|s| s.name == name) {
            Some(pos) => pos,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[pos]
    }
}

/// Split `key = value` / `key: value` at whichever delimiter comes first.
fn split_option(line: &str) -> (&str, Option<&str>) {
    match line.find(['=', ':']) {
        Some(pos) => (line[..pos].trim(), Some(line[pos + 1..].trim())),
        None => (line, None),
    }
}

impl fmt::Display for Ini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in section.entries() {
                match value {
                    Some(v) => writeln!(f, "{} = {}", key, v.replace('\n', "\n    "))?,
                    None => writeln!(f, "{}", key)?,
                }
            }
        }
        Ok(())
    }
}
