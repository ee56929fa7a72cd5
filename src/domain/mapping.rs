use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Explicit renames applied while flattening the full struct.
///
/// Keys are either a normalized source path (`mainFull.capacity`, array
/// indices removed) or a bare field name; values are output names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    entries: BTreeMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// `key: value` per line; blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Self {
        let mut mapping = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                mapping.insert(key.trim(), value.trim());
            }
        }
        mapping
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Later entries win.
    pub fn merge(&mut self, other: &BTreeMap<String, String>) {
        for (key, value) in other {
            self.insert(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Output name for a field, trying the normalized path before the bare name.
    pub fn resolve(&self, source_path: &str, field_name: &str) -> Option<&str> {
        self.entries
            .get(&normalize_path(source_path))
            .or_else(|| self.entries.get(field_name))
            .map(String::as_str)
    }
}

impl From<BTreeMap<String, String>> for FieldMapping {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

/// `otherFull[1].capacity[0]` → `otherFull.capacity`
pub fn normalize_path(path: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\[\d+\]").expect("valid index regex"));
    re.replace_all(path, "").into_owned()
}
