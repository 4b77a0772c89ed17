use indexmap::IndexMap;

/// Builtin names that can never be shadowed by an alias.
pub const RESERVED_NAMES: &[&str] = &[
    "showpid", "pwd", "cd", "jobs", "kill", "fg", "diff", "alias", "unalias", "quit",
];

/// Name→replacement mapping, iterated in insertion order. Redefining a name
/// keeps its position.
#[derive(Debug, Default)]
pub struct AliasTable {
    entries: IndexMap<String, String>,
}

/// An alias name: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, replacement: &str) {
        self.entries.insert(name.to_owned(), replacement.to_owned());
    }

    /// Removes an alias, preserving the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.shift_remove(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
