//! Bounded alias table and directory stack.
//!
//! Both collections have a fixed capacity and reject new entries once
//! full; nothing is evicted and nothing is reported.

/// Default capacity for the alias table and the directory stack.
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
struct Alias {
    name: String,
    expansion: String,
}

/// Fixed-capacity alias table with first-free-slot allocation.
///
/// Removing an entry frees its slot without compacting, so iteration
/// order follows slot order, not definition order. Names are unique among
/// live entries.
#[derive(Debug)]
pub struct AliasTable {
    slots: Vec<Option<Alias>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Define or overwrite an alias. Returns false when the table is full
    /// and the definition was dropped.
    pub fn define(&mut self, name: &str, expansion: &str) -> bool {
        if let Some(alias) = self.slots.iter_mut().flatten().find(|a| a.name == name) {
            alias.expansion = expansion.to_string();
            return true;
        }
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(Alias {
                    name: name.to_string(),
                    expansion: expansion.to_string(),
                });
                true
            }
            None => false,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.slots
            .iter()
            .flatten()
            .find(|a| a.name == name)
            .map(|a| a.expansion.as_str())
    }

    /// Remove an alias; unknown names are ignored.
    pub fn remove(&mut self, name: &str) {
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|a| a.name == name) {
                *slot = None;
                return;
            }
        }
    }

    /// Live `(name, expansion)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.slots
            .iter()
            .flatten()
            .map(|a| (a.name.as_str(), a.expansion.as_str()))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-capacity stack of directories recorded by `pushd`.
#[derive(Debug)]
pub struct DirStack {
    entries: Vec<String>,
    capacity: usize,
}

impl DirStack {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Push a directory; a full stack silently drops it.
    pub fn push(&mut self, dir: String) {
        if self.entries.len() < self.capacity {
            self.entries.push(dir);
        }
    }

    pub fn pop(&mut self) -> Option<String> {
        self.entries.pop()
    }

    /// Entries from most recently pushed to oldest.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().rev().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DirStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_lookup_remove() {
        let mut table = AliasTable::new();
        assert!(table.define("ll", "ls -la"));
        assert_eq!(table.lookup("ll"), Some("ls -la"));

        table.remove("ll");
        assert_eq!(table.lookup("ll"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_redefine_overwrites_in_place() {
        let mut table = AliasTable::new();
        table.define("g", "git");
        table.define("g", "git status");
        assert_eq!(table.lookup("g"), Some("git status"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_removed_slot_is_reused() {
        let mut table = AliasTable::new();
        table.define("a", "1");
        table.define("b", "2");
        table.define("c", "3");
        table.remove("b");
        table.define("d", "4");

        let order: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["a", "d", "c"]);
    }

    #[test]
    fn test_full_table_drops_definitions() {
        let mut table = AliasTable::new();
        for i in 0..DEFAULT_CAPACITY {
            assert!(table.define(&format!("a{}", i), "x"));
        }
        assert!(!table.define("one-too-many", "x"));
        assert_eq!(table.len(), DEFAULT_CAPACITY);
        assert_eq!(table.lookup("one-too-many"), None);
    }

    #[test]
    fn test_stack_push_pop_order() {
        let mut stack = DirStack::new();
        stack.push("/one".to_string());
        stack.push("/two".to_string());

        let newest: Vec<&str> = stack.iter_newest_first().collect();
        assert_eq!(newest, vec!["/two", "/one"]);

        assert_eq!(stack.pop(), Some("/two".to_string()));
        assert_eq!(stack.pop(), Some("/one".to_string()));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_full_stack_drops_entries() {
        let mut stack = DirStack::with_capacity(2);
        stack.push("/one".to_string());
        stack.push("/two".to_string());
        stack.push("/three".to_string());
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.iter_newest_first().next(), Some("/two"));
    }
}
