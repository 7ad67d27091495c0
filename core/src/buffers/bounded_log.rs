use serde::Serialize;

use crate::prelude::{GuardError, GuardResult};

/// Append-only log with a fixed capacity that refuses entries once full.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct BoundedLog<T> {
    entries: Vec<T>,
    #[serde(skip)]
    max_capacity: usize,
    #[serde(skip)]
    label: &'static str,
}

impl<T> BoundedLog<T> {
    pub fn with_capacity(label: &'static str, max_capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(max_capacity),
            max_capacity,
            label,
        }
    }

    /// A log that already holds `first`. Capacity is raised to one if needed.
    pub fn starting_with(label: &'static str, max_capacity: usize, first: T) -> Self {
        let max_capacity = max_capacity.max(1);
        let mut entries = Vec::with_capacity(max_capacity);
        entries.push(first);
        Self {
            entries,
            max_capacity,
            label,
        }
    }

    /// Appends an entry, or hands back an error and drops it when the log is full.
    pub fn push(&mut self, entry: T) -> GuardResult<()> {
        if self.entries.len() >= self.max_capacity {
            return Err(GuardError::CapacityExhausted(format!(
                "{} full ({} entries)",
                self.label, self.max_capacity
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.entries.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max_capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
