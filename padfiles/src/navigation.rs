//! Back/forward history of visited locations

use crate::gateway::Location;

/// Visited locations and a cursor. Never empty; `index` always points at
/// an entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    entries: Vec<Location>,
    index: usize,
}

impl History {
    pub fn new(start: Location) -> Self {
        Self { entries: vec![start], index: 0 }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    /// Go somewhere new, dropping any forward entries. Returns false when
    /// `to` is already current.
    pub fn navigate(&mut self, to: Location) -> bool {
        if *self.current() == to {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(to);
        self.index = self.entries.len() - 1;
        true
    }

    pub fn back(&mut self) -> Option<&Location> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Location> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}
