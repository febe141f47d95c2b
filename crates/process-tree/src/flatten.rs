use std::collections::HashSet;

use crate::config::TreeConfig;
use crate::process_map::ProcessMap;
use crate::tree::children;
use crate::ui_state::UiState;

/// Rows a list renderer should show, in order, with their depth below the root.
///
/// Pre-order walk from `root_entity_id` that only descends into expanded
/// nodes. A process reached twice (possible when colliding entity ids form a
/// cycle) is listed once. `group_leaders_only` filters the children of the
/// root only, deeper levels are always complete.
pub fn flatten_tree_with_depth(
    map: &ProcessMap,
    ui: &UiState,
    root_entity_id: &str,
    group_leaders_only: bool,
) -> Vec<(String, usize)> {
    let mut flattened = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![(root_entity_id.to_owned(), 0)];

    while let Some((id, depth)) = stack.pop() {
        if !map.contains(&id) || !visited.insert(id.clone()) {
            continue;
        }

        if ui.is_expanded(&id) {
            let filtered = group_leaders_only && id == root_entity_id;
            let children = children(map, ui, &id, filtered);
            stack.extend(
                children
                    .iter()
                    .rev()
                    .map(|child| (child.id.clone(), depth + 1)),
            );
        }
        flattened.push((id, depth));
    }

    flattened
}

pub fn flatten_tree(
    map: &ProcessMap,
    ui: &UiState,
    root_entity_id: &str,
    group_leaders_only: bool,
) -> Vec<String> {
    flatten_tree_with_depth(map, ui, root_entity_id, group_leaders_only)
        .into_iter()
        .map(|(id, _)| id)
        .collect()
}

/// Height of the row for `id`, including its visible subtree when expanded.
///
/// The session leader's row never includes its children, which are listed as
/// rows of their own. Below the leader every child counts, the group leader
/// filter does not apply there.
pub fn process_height(
    map: &ProcessMap,
    ui: &UiState,
    id: &str,
    is_session_leader: bool,
    config: &TreeConfig,
) -> u32 {
    let mut visited = HashSet::new();
    height_inner(map, ui, id, is_session_leader, config, &mut visited)
}

fn height_inner(
    map: &ProcessMap,
    ui: &UiState,
    id: &str,
    is_session_leader: bool,
    config: &TreeConfig,
    visited: &mut HashSet<String>,
) -> u32 {
    let Some(process) = map.get(id) else {
        return 0;
    };
    if !visited.insert(id.to_owned()) {
        return 0;
    }

    let alerts_height = if ui.is_alerts_expanded(id) {
        process.alerts().len() as u32 * config.alert_detail_height + config.alert_detail_padding
    } else {
        0
    };
    let self_height = config.node_base_height + alerts_height;

    if !ui.is_expanded(id) || is_session_leader {
        return self_height;
    }

    children(map, ui, id, false)
        .iter()
        .fold(self_height, |height, child| {
            height + height_inner(map, ui, &child.id, false, config, visited)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventAction, EventKind, EventMeta, ProcessEvent, ProcessFields};

    const ROOT: &str = "root";

    /// root -> a -> (a1, a2), root -> b
    fn sample_map() -> ProcessMap {
        let mut map = ProcessMap::new();
        for (id, parent, start) in [
            (ROOT, None, "2021-11-23T15:25:00.000Z"),
            ("a", Some(ROOT), "2021-11-23T15:25:01.000Z"),
            ("b", Some(ROOT), "2021-11-23T15:25:05.000Z"),
            ("a1", Some("a"), "2021-11-23T15:25:02.000Z"),
            ("a2", Some("a"), "2021-11-23T15:25:03.000Z"),
        ] {
            let process = map.get_or_insert(id);
            process.parent = parent.map(str::to_owned);
            process.events.push(ProcessEvent {
                event: EventMeta {
                    action: EventAction::Exec,
                    ..Default::default()
                },
                process: ProcessFields {
                    entity_id: id.into(),
                    start: Some(start.parse().unwrap()),
                    ..Default::default()
                },
                ..Default::default()
            });
            if let Some(parent) = parent {
                map.get_or_insert(parent).children.push(id.to_owned());
            }
        }
        map
    }

    fn add_alerts(map: &mut ProcessMap, id: &str, count: usize) {
        let process = map.get_mut(id).unwrap();
        for _ in 0..count {
            let mut alert = process.events[0].clone();
            alert.event.kind = EventKind::Signal;
            process.events.push(alert);
        }
    }

    #[test]
    fn test_flatten_collapsed_root() {
        let map = sample_map();
        let ui = UiState::new();

        assert_eq!(flatten_tree(&map, &ui, ROOT, false), vec![ROOT]);
    }

    #[test]
    fn test_flatten_follows_expansion() {
        let map = sample_map();
        let mut ui = UiState::new();
        ui.set_expanded(ROOT, true);

        assert_eq!(flatten_tree(&map, &ui, ROOT, false), vec![ROOT, "a", "b"]);

        ui.set_expanded("a", true);
        insta::assert_debug_snapshot!(flatten_tree_with_depth(&map, &ui, ROOT, false), @r###"
        [
            (
                "root",
                0,
            ),
            (
                "a",
                1,
            ),
            (
                "a1",
                2,
            ),
            (
                "a2",
                2,
            ),
            (
                "b",
                1,
            ),
        ]
        "###);

        // collapsing an ancestor hides the expanded descendant
        ui.set_expanded(ROOT, false);
        assert_eq!(flatten_tree(&map, &ui, ROOT, false), vec![ROOT]);
    }

    #[test]
    fn test_flatten_unknown_root() {
        let map = sample_map();
        assert!(flatten_tree(&map, &UiState::new(), "missing", false).is_empty());
    }

    #[test]
    fn test_flatten_survives_cycle() {
        let mut map = sample_map();
        map.get_mut("a1").unwrap().children.push("a".into());
        let mut ui = UiState::new();
        for id in [ROOT, "a", "a1"] {
            ui.set_expanded(id, true);
        }

        assert_eq!(
            flatten_tree(&map, &ui, ROOT, false),
            vec![ROOT, "a", "a1", "a2", "b"]
        );
        assert_eq!(
            process_height(&map, &ui, "a", false, &TreeConfig::default()),
            24 * 3
        );
    }

    #[test]
    fn test_height_with_alerts() {
        let mut map = sample_map();
        add_alerts(&mut map, "b", 2);
        let mut ui = UiState::new();
        let config = TreeConfig::default();

        assert_eq!(process_height(&map, &ui, "b", false, &config), 24);
        ui.toggle_alerts_expanded("b");
        assert_eq!(
            process_height(&map, &ui, "b", false, &config),
            24 + 2 * 32 + 8
        );
    }

    #[test]
    fn test_height_expansion_adds_children_exactly() {
        let mut map = sample_map();
        add_alerts(&mut map, "a1", 1);
        let mut ui = UiState::new();
        ui.toggle_alerts_expanded("a1");
        let config = TreeConfig::default();

        let collapsed = process_height(&map, &ui, "a", false, &config);
        let children_height: u32 = ["a1", "a2"]
            .iter()
            .map(|id| process_height(&map, &ui, id, false, &config))
            .sum();

        ui.toggle_expanded("a");
        let expanded = process_height(&map, &ui, "a", false, &config);
        assert_eq!(expanded, collapsed + children_height);

        ui.toggle_expanded("a");
        assert_eq!(process_height(&map, &ui, "a", false, &config), collapsed);
    }

    #[test]
    fn test_session_leader_height_excludes_children() {
        let map = sample_map();
        let mut ui = UiState::new();
        ui.set_expanded(ROOT, true);
        let config = TreeConfig::default();

        assert_eq!(process_height(&map, &ui, ROOT, true, &config), 24);
        assert_eq!(process_height(&map, &ui, ROOT, false, &config), 24 * 3);
    }
}
