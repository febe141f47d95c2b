use crate::process_map::ProcessMap;
use crate::ui_state::UiState;

/// Expand the session leader by default as soon as it has children.
pub fn auto_expand_process_tree(map: &ProcessMap, ui: &mut UiState, root_entity_id: &str) {
    if let Some(leader) = map.get(root_entity_id) {
        if !leader.children.is_empty() {
            ui.set_auto_expand(root_entity_id);
        }
    }
}

/// Expand every ancestor of `id` so that it shows up in the flattened tree.
pub fn expand_to(map: &ProcessMap, ui: &mut UiState, id: &str) {
    for ancestor in map.ancestors(id) {
        ui.set_expanded(&ancestor, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_expand_leader_with_children() {
        let mut map = ProcessMap::new();
        map.get_or_insert("leader");
        let mut ui = UiState::new();

        auto_expand_process_tree(&map, &mut ui, "leader");
        assert!(!ui.get("leader").auto_expand);

        map.get_or_insert("leader").children.push("child".into());
        map.get_or_insert("child").parent = Some("leader".into());
        auto_expand_process_tree(&map, &mut ui, "leader");
        assert!(ui.get("leader").auto_expand);
        assert!(ui.is_expanded("leader"));
        assert!(!ui.is_expanded("child"));
    }

    #[test]
    fn test_expand_to_only_touches_ancestors() {
        let mut map = ProcessMap::new();
        map.get_or_insert("leader").children = vec!["a".into(), "b".into()];
        map.get_or_insert("a").parent = Some("leader".into());
        map.get_or_insert("b").parent = Some("leader".into());
        map.get_or_insert("a").children.push("a1".into());
        map.get_or_insert("a1").parent = Some("a".into());
        let mut ui = UiState::new();

        expand_to(&map, &mut ui, "a1");

        assert!(ui.is_expanded("leader"));
        assert!(ui.is_expanded("a"));
        assert!(!ui.is_expanded("a1"));
        assert!(!ui.is_expanded("b"));
    }
}
