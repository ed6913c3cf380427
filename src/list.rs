// Session state: the ordered items, the unsaved-changes flag and the name of
// the file the list is associated with. Positions are 1-based here because
// that's what the user sees; conversion to vector indices happens inside.

use anyhow::{ensure, Result};

/// Result of a move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Moved {
    /// Source and destination were equal; nothing changed.
    Unchanged,
    Item(String),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListSession {
    items: Vec<String>,
    needs_save: bool,
    filename: Option<String>,
}

impl ListSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when the list differs from what was last loaded or saved.
    pub fn needs_save(&self) -> bool {
        self.needs_save
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Label shown in the menu header.
    pub fn label(&self) -> &str {
        self.filename().unwrap_or("Unsaved list")
    }

    /// Numbered listing, one `N. item` line per item.
    pub fn numbered(&self) -> Vec<String> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| format!("{}. {}", idx + 1, item))
            .collect()
    }

    pub fn add(&mut self, item: String) {
        self.items.push(item);
        self.needs_save = true;
    }

    /// Insert before `position`; `len() + 1` appends.
    pub fn insert(&mut self, position: usize, item: String) -> Result<()> {
        ensure!(
            (1..=self.items.len() + 1).contains(&position),
            "insert position {position} outside 1..={}",
            self.items.len() + 1
        );
        self.items.insert(position - 1, item);
        self.needs_save = true;
        Ok(())
    }

    pub fn remove(&mut self, position: usize) -> Result<String> {
        self.check_position(position)?;
        let item = self.items.remove(position - 1);
        self.needs_save = true;
        Ok(item)
    }

    /// Take the item at `from` out of the list, then insert it at `to`.
    /// `to` refers to positions after the removal, so moving the first of
    /// three items to position 3 puts it last.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<Moved> {
        self.check_position(from)?;
        self.check_position(to)?;
        if from == to {
            return Ok(Moved::Unchanged);
        }
        let item = self.items.remove(from - 1);
        self.items.insert(to - 1, item.clone());
        self.needs_save = true;
        Ok(Moved::Item(item))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.needs_save = true;
    }

    /// Swap in a freshly loaded list. The session is clean afterwards.
    pub fn replace(&mut self, items: Vec<String>, filename: &str) {
        self.items = items;
        self.filename = Some(filename.to_string());
        self.needs_save = false;
    }

    /// Record a successful save under `filename`.
    pub fn mark_saved(&mut self, filename: &str) {
        self.filename = Some(filename.to_string());
        self.needs_save = false;
    }

    fn check_position(&self, position: usize) -> Result<()> {
        ensure!(
            (1..=self.items.len()).contains(&position),
            "position {position} outside 1..={}",
            self.items.len()
        );
        Ok(())
    }
}
