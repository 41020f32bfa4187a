//! Navigation history
//!
//! Every transition that did not come from a history move pushes its URL with
//! an empty state object. Back and forward move the cursor without pushing.

/// Host navigation history
pub trait History: Send {
    /// Record `url` as the new current entry without reloading
    fn push_state(&mut self, url: &str);

    /// Path of the current entry
    fn pathname(&self) -> String;

    /// Number of entries in the stack
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Step back one entry and return the new path
    fn go_back(&mut self) -> Option<String>;

    /// Step forward one entry and return the new path
    fn go_forward(&mut self) -> Option<String>;
}

/// In-process history stack for headless hosts and tests
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    /// Index of the current entry
    position: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            position: 0,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl History for MemoryHistory {
    fn push_state(&mut self, url: &str) {
        // Pushing drops any forward entries, as browsers do
        self.entries.truncate(self.position + 1);
        self.entries.push(url.to_string());
        self.position = self.entries.len() - 1;
    }

    fn pathname(&self) -> String {
        self.entries
            .get(self.position)
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn go_back(&mut self) -> Option<String> {
        if self.position > 0 {
            self.position -= 1;
            self.entries.get(self.position).cloned()
        } else {
            None
        }
    }

    fn go_forward(&mut self) -> Option<String> {
        if self.position + 1 < self.entries.len() {
            self.position += 1;
            self.entries.get(self.position).cloned()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_back() {
        let mut history = MemoryHistory::new("/");
        history.push_state("/about");
        history.push_state("/collections");
        assert_eq!(history.len(), 3);
        assert_eq!(history.pathname(), "/collections");

        assert_eq!(history.go_back().as_deref(), Some("/about"));
        assert_eq!(history.go_back().as_deref(), Some("/"));
        assert_eq!(history.go_back(), None);
        assert_eq!(history.pathname(), "/");
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = MemoryHistory::new("/");
        history.push_state("/about");
        history.go_back();
        history.push_state("/collections");

        assert_eq!(history.entries(), ["/", "/collections"]);
        assert_eq!(history.go_forward(), None);
    }

    #[test]
    fn test_forward_after_back() {
        let mut history = MemoryHistory::new("/");
        history.push_state("/about");
        history.go_back();

        assert_eq!(history.go_forward().as_deref(), Some("/about"));
        assert_eq!(history.pathname(), "/about");
        assert_eq!(history.len(), 2);
    }
}
