//! Domain entities: core data structures

use std::collections::HashMap;

/// A decoded `NAME=value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub value: String,
}

impl Assignment {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Staging area for a load: `name -> value` in first-insertion order.
///
/// Re-inserting an existing name replaces its value but keeps its position,
/// so the commit order is the order in which names were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadQueue {
    entries: Vec<Assignment>,
    by_name: HashMap<String, usize>,
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an assignment, overwriting any earlier value for the same name.
    /// Returns the value it replaced.
    pub fn insert(&mut self, assignment: Assignment) -> Option<String> {
        match self.by_name.get(&assignment.name).copied() {
            Some(idx) => Some(std::mem::replace(
                &mut self.entries[idx].value,
                assignment.value,
            )),
            None => {
                self.by_name
                    .insert(assignment.name.clone(), self.entries.len());
                self.entries.push(assignment);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&idx| self.entries[idx].value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.entries.iter()
    }
}

impl IntoIterator for LoadQueue {
    type Item = Assignment;
    type IntoIter = std::vec::IntoIter<Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_first_position() {
        let mut queue = LoadQueue::new();
        queue.insert(Assignment::new("A", "1"));
        queue.insert(Assignment::new("B", "2"));
        let replaced = queue.insert(Assignment::new("A", "3"));

        assert_eq!(replaced.as_deref(), Some("1"));
        assert_eq!(queue.len(), 2);
        let order: Vec<_> = queue.iter().map(|a| (a.name.as_str(), a.value.as_str())).collect();
        assert_eq!(order, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn get_returns_latest_value() {
        let mut queue = LoadQueue::new();
        assert!(queue.is_empty());
        queue.insert(Assignment::new("NAME", "first"));
        queue.insert(Assignment::new("NAME", "second"));

        assert_eq!(queue.get("NAME"), Some("second"));
        assert_eq!(queue.get("OTHER"), None);
    }
}
