use crate::limits::LOCAL_PICKER_MAX_ITEMS;
use crate::models::{ItemReference, SelectionResult};

/// In-progress multi-select over enumerated local media
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSelection {
    limit: u32,
    selected: Vec<ItemReference>,
}

impl Default for LocalSelection {
    fn default() -> Self {
        Self::new(LOCAL_PICKER_MAX_ITEMS)
    }
}

impl LocalSelection {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            selected: Vec::new(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, item: &ItemReference) -> bool {
        self.selected.contains(item)
    }

    /// Deselects a selected item; otherwise selects it if the limit allows.
    /// Returns whether the item is selected afterwards.
    pub fn toggle(&mut self, item: &ItemReference) -> bool {
        if let Some(pos) = self.selected.iter().position(|s| s == item) {
            self.selected.remove(pos);
            return false;
        }
        if (self.selected.len() as u64) < u64::from(self.limit) {
            self.selected.push(item.clone());
            return true;
        }
        log::debug!("Selection limit {} reached, ignoring {}", self.limit, item);
        false
    }

    /// Hands out the selection in the order items were picked and starts over
    pub fn submit(&mut self) -> SelectionResult {
        std::mem::take(&mut self.selected).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> ItemReference {
        ItemReference::from(s)
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(LocalSelection::default().limit(), 100);
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut selection = LocalSelection::new(5);
        assert!(selection.toggle(&uri("a")));
        assert!(selection.contains(&uri("a")));
        assert!(!selection.toggle(&uri("a")));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_limit_blocks_additions_but_not_removals() {
        let mut selection = LocalSelection::new(2);
        selection.toggle(&uri("a"));
        selection.toggle(&uri("b"));
        assert!(!selection.toggle(&uri("c")));
        assert_eq!(selection.len(), 2);

        selection.toggle(&uri("a"));
        assert!(selection.toggle(&uri("c")));
    }

    #[test]
    fn test_submit_keeps_pick_order_and_clears() {
        let mut selection = LocalSelection::new(10);
        for s in ["c", "a", "b"] {
            selection.toggle(&uri(s));
        }
        let result = selection.submit();
        assert_eq!(result.into_vec(), vec![uri("c"), uri("a"), uri("b")]);
        assert!(selection.is_empty());
        assert!(selection.submit().is_empty());
    }
}
