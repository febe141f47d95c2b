use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    static ref DEFAULT_NODE_STATE: NodeState = NodeState::default();
}

/// Presentation state of one node of the tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeState {
    pub auto_expand: bool,
    pub expanded: bool,
    pub alerts_expanded: bool,
    /// Text that matched the current search query, used for highlighting
    pub search_matched: Option<String>,
}

/// Presentation state keyed by entity id, kept apart from the process data.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    nodes: HashMap<String, NodeState>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> &NodeState {
        self.nodes.get(id).unwrap_or(&*DEFAULT_NODE_STATE)
    }

    fn node_mut(&mut self, id: &str) -> &mut NodeState {
        self.nodes.entry(id.to_owned()).or_default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.get(id).expanded
    }

    pub fn is_alerts_expanded(&self, id: &str) -> bool {
        self.get(id).alerts_expanded
    }

    pub fn search_matched(&self, id: &str) -> Option<&str> {
        self.get(id).search_matched.as_deref()
    }

    /// Returns the new expanded state
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        let node = self.node_mut(id);
        node.expanded = !node.expanded;
        node.expanded
    }

    pub fn set_expanded(&mut self, id: &str, expanded: bool) {
        self.node_mut(id).expanded = expanded;
    }

    /// Returns the new alerts expanded state
    pub fn toggle_alerts_expanded(&mut self, id: &str) -> bool {
        let node = self.node_mut(id);
        node.alerts_expanded = !node.alerts_expanded;
        node.alerts_expanded
    }

    /// Marks a node as expanded by default. Only the first call expands it, so
    /// a node the user collapsed afterwards stays collapsed.
    pub fn set_auto_expand(&mut self, id: &str) {
        let node = self.node_mut(id);
        if !node.auto_expand {
            node.auto_expand = true;
            node.expanded = true;
        }
    }

    pub fn set_search_match(&mut self, id: &str, matched: &str) {
        self.node_mut(id).search_matched = Some(matched.to_owned());
    }

    pub fn clear_search_matches(&mut self) {
        for node in self.nodes.values_mut() {
            node.search_matched = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_node_reads_as_default() {
        let ui = UiState::new();
        assert_eq!(ui.get("unknown"), &NodeState::default());
        assert!(!ui.is_expanded("unknown"));
        assert_eq!(ui.search_matched("unknown"), None);
    }

    #[test]
    fn test_toggles() {
        let mut ui = UiState::new();

        assert!(ui.toggle_expanded("a"));
        assert!(ui.is_expanded("a"));
        assert!(!ui.toggle_expanded("a"));

        assert!(ui.toggle_alerts_expanded("a"));
        assert!(ui.is_alerts_expanded("a"));
        assert!(!ui.is_expanded("a"));
    }

    #[test]
    fn test_auto_expand_only_once() {
        let mut ui = UiState::new();

        ui.set_auto_expand("leader");
        assert!(ui.get("leader").auto_expand);
        assert!(ui.is_expanded("leader"));

        ui.set_expanded("leader", false);
        ui.set_auto_expand("leader");
        assert!(!ui.is_expanded("leader"));
    }

    #[test]
    fn test_clear_search_matches() {
        let mut ui = UiState::new();
        ui.set_search_match("a", "vi");
        ui.set_expanded("a", true);

        ui.clear_search_matches();
        assert_eq!(ui.search_matched("a"), None);
        assert!(ui.is_expanded("a"));
    }
}
