use crate::router::route::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub route: Route,
    pub fragment: String,
}

impl HistoryEntry {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            fragment: route.fragment(),
        }
    }
}

/// Linear navigation history with a cursor, like a browser tab.
/// Pushing after going back drops the forward entries.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    pub fn push(&mut self, route: Route) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(HistoryEntry::new(route));
        self.cursor = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> Option<Route> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(|entry| entry.route)
    }

    pub fn forward(&mut self) -> Option<Route> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).map(|entry| entry.route)
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_fragment(&self, fragment: &str) -> bool {
        self.entries.iter().any(|entry| entry.fragment == fragment)
    }
}
