//! Section sources owned by the host.
//!
//! A `SourceSet` maps preview paths (`/HeroSection.tsx`) to file content.
//! Sections are kept in their configured order and mounted before the entry
//! file (`/App.tsx`) that aggregates them. The patcher searches the entry
//! first, then the sections.
//!
//! Content is only ever replaced whole; the host is the single writer.

pub mod fallback;
pub mod loader;
pub mod patch;

use rustc_hash::FxHashMap;

use crate::utils::hash;

pub use loader::{LoadReport, load_sections};
pub use patch::{PatchOutcome, patch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    files: FxHashMap<String, String>,
    /// Section paths in configured order (entry excluded)
    order: Vec<String>,
    entry: String,
}

impl SourceSet {
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            ..Self::default()
        }
    }

    /// Entry file path (e.g., "/App.tsx").
    #[inline]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Add or replace a file. New section paths go to the end of the list.
    pub fn insert(&mut self, path: impl Into<String>, code: impl Into<String>) {
        let path = path.into();
        if path != self.entry && !self.files.contains_key(&path) {
            self.order.push(path.clone());
        }
        self.files.insert(path, code.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Replace the content of a known file. Returns whether anything changed.
    pub fn set(&mut self, path: &str, code: impl Into<String>) -> bool {
        let code = code.into();
        match self.files.get_mut(path) {
            Some(current) if *current != code => {
                *current = code;
                true
            }
            _ => false,
        }
    }

    /// Paths in mount order: sections as configured, then the entry file
    /// that aggregates them.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .map(String::as_str)
            .chain(self.present_entry())
    }

    /// Paths in patch search order: the entry file first, then the sections.
    pub fn search_order(&self) -> impl Iterator<Item = &str> {
        self.present_entry()
            .into_iter()
            .chain(self.order.iter().map(String::as_str))
    }

    fn present_entry(&self) -> Option<&str> {
        Some(self.entry.as_str()).filter(|e| self.files.contains_key(*e))
    }

    /// `(path, code)` pairs in mount order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.paths()
            .filter_map(|path| self.files.get(path).map(|code| (path, code.as_str())))
    }

    /// Raw path → content map, as consumed by the renderer.
    #[inline]
    pub fn files(&self) -> &FxHashMap<String, String> {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All files as one JSON object in mount order, the unit the store persists.
    pub fn bundle(&self) -> String {
        let map: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(path, code)| (path.to_string(), serde_json::Value::from(code)))
            .collect();
        serde_json::Value::Object(map).to_string()
    }

    /// Short content hash over every file, for change detection in logs.
    pub fn fingerprint(&self) -> String {
        hash::fingerprint(&self.bundle())
    }
}

/// Aggregating entry component that renders `names` in order.
pub fn entry_source(names: &[String]) -> String {
    let mut code = String::from("import React from 'react';\n");
    for name in names {
        code.push_str(&format!("import {name} from './{name}';\n"));
    }
    code.push_str("\nexport default function App() {\n  return (\n    <div className=\"min-h-screen\">\n");
    for name in names {
        code.push_str(&format!("      <{name} />\n"));
    }
    code.push_str("    </div>\n  );\n}");
    code
}
