//! The command catalog: documented signatures, descriptions and examples.
//!
//! Entries come from a static JSON file generated from the official command
//! documentation (the same `{signature, commandBase, ...}` records the doc
//! scraper emits). The catalog is loaded once, indexed by lowercased base
//! name, and read-only for the process lifetime — safe to share across
//! threads without locking.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One worked example attached to a catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CommandExample {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub command: String,
}

/// One documented command overload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEntry {
    /// Raw signature text, e.g. `Circle( <Point>, <Number> )`
    #[serde(default)]
    pub signature: String,
    /// Canonical command name shared by all overloads
    #[serde(default)]
    pub command_base: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<CommandExample>,
    #[serde(default)]
    pub note: String,
}

/// Index over the full catalog: lowercased base name → entries in catalog
/// order. Multiple entries under one name are overloads.
#[derive(Debug, Default)]
pub struct CommandCatalog {
    entries: Vec<SignatureEntry>,
    index: HashMap<String, Vec<usize>>,
}

lazy_static! {
    static ref BUILTIN: CommandCatalog = CommandCatalog::from_json(include_str!(
        "../data/commands.json"
    ))
    .expect("built-in command catalog is valid JSON");
}

impl CommandCatalog {
    /// The catalog shipped with the crate, parsed once on first access.
    pub fn builtin() -> &'static CommandCatalog {
        &BUILTIN
    }

    /// Build the index from an already-deserialized entry list.
    pub fn from_entries(entries: Vec<SignatureEntry>) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            index
                .entry(entry.command_base.to_lowercase())
                .or_default()
                .push(i);
        }
        CommandCatalog { entries, index }
    }

    /// Parse a JSON array of catalog records and build the index.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<SignatureEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    pub fn is_valid_command(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    /// All documented overloads for a command, in catalog order.
    /// Empty when the name is unknown.
    pub fn signatures(&self, name: &str) -> Vec<&SignatureEntry> {
        self.index
            .get(&name.to_lowercase())
            .map(|ids| ids.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// Full documentation entries for a command, for help rendering.
    /// `None` when the name is unknown.
    pub fn help(&self, name: &str) -> Option<Vec<&SignatureEntry>> {
        let sigs = self.signatures(name);
        if sigs.is_empty() {
            None
        } else {
            Some(sigs)
        }
    }

    /// Canonical command names (first letter capitalized), deduplicated,
    /// in catalog order.
    pub fn all_command_names(&self) -> Vec<String> {
        let mut seen = HashMap::new();
        let mut names = Vec::new();
        for entry in &self.entries {
            let key = entry.command_base.to_lowercase();
            if seen.insert(key, ()).is_none() {
                names.push(capitalize(&entry.command_base));
            }
        }
        names
    }

    /// Case-insensitive substring search over base names and descriptions,
    /// capped at 20 results.
    pub fn search(&self, query: &str) -> Vec<&SignatureEntry> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                e.command_base.to_lowercase().contains(&query)
                    || e.description.to_lowercase().contains(&query)
            })
            .take(20)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
