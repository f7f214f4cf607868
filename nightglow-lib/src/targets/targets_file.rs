use super::Target;
use crate::Result;
use camino::Utf8Path;
use core::fmt::Formatter;
use ohno::IntoAppError;
use serde::de::{Error as _, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fs;

/// File name used when no targets path is given
pub const DEFAULT_TARGETS_FILE: &str = "targets.json";

/// Example targets file written by `nightglow init`, embedded from `sample_targets.json`
pub const SAMPLE_TARGETS_JSON: &str = include_str!("../../sample_targets.json");

/// A country key and its not-yet-interpreted entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEntry {
    pub country: String,
    value: serde_json::Value,
}

impl TargetEntry {
    /// Interpret this entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is malformed; see [`Target::from_json`]
    pub fn parse(&self) -> Result<Target> {
        Target::from_json(&self.country, &self.value)
    }
}

/// The targets file, in the order its countries were written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetsFile {
    entries: Vec<TargetEntry>,
}

impl TargetsFile {
    /// Read and parse a targets file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON object, or repeats a country
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading targets file '{path}'"))?;
        let targets = Self::from_json_str(&text).into_app_err_with(|| format!("parsing targets file '{path}'"))?;

        log::debug!("loaded {} target(s) from '{path}'", targets.len());
        Ok(targets)
    }

    /// Parse targets from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object or repeats a country
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    #[must_use]
    pub fn entries(&self) -> &[TargetEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for TargetsFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TargetsVisitor)
    }
}

struct TargetsVisitor;

impl<'de> Visitor<'de> for TargetsVisitor {
    type Value = TargetsFile;

    fn expecting(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "an object mapping country names to targets")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));

        while let Some((country, value)) = map.next_entry::<String, serde_json::Value>()? {
            if !seen.insert(country.clone()) {
                return Err(A::Error::custom(format!("country '{country}' is listed more than once")));
            }
            entries.push(TargetEntry { country, value });
        }

        Ok(TargetsFile { entries })
    }
}
