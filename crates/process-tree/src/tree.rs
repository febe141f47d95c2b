use std::collections::HashMap;

use itertools::Itertools;
use log::debug;

use crate::events::ProcessEvent;
use crate::process::{Process, sort_processes};
use crate::process_map::{ProcessMap, update_process_map};
use crate::ui_state::UiState;

/// Next insertion index per parent for children attached by a backward page,
/// so that they land before forward children while keeping their own order.
type BackwardCursors = HashMap<String, usize>;

fn attach_child(
    map: &mut ProcessMap,
    parent_id: &str,
    child_id: &str,
    backward: bool,
    cursors: &mut BackwardCursors,
) {
    let parent = map.get_or_insert(parent_id);
    if parent.children.iter().any(|id| id == child_id) {
        return;
    }

    if backward {
        let index = cursors.entry(parent_id.to_owned()).or_insert(0);
        parent.children.insert(*index, child_id.to_owned());
        *index += 1;
    } else {
        parent.children.push(child_id.to_owned());
    }
}

fn is_resolvable(map: &ProcessMap, parent_id: &str, root_entity_id: &str) -> bool {
    parent_id == root_entity_id || map.contains(parent_id)
}

/// Link the processes referenced by `events` to their parents.
///
/// The events must already be recorded in `map`. A process whose parent is
/// unknown is kept in `orphans` until a later call resolves it.
pub fn build_process_tree(
    map: &mut ProcessMap,
    events: &[ProcessEvent],
    orphans: &mut Vec<String>,
    root_entity_id: &str,
    backward: bool,
) {
    let mut cursors = BackwardCursors::new();

    for event in events {
        let entity_id = event.process.entity_id.as_str();
        if entity_id.is_empty() || entity_id == root_entity_id {
            continue;
        }

        let Some(process) = map.get_mut(entity_id) else {
            continue;
        };
        if process.parent.is_none() {
            process.parent = event
                .parent_entity_id()
                .filter(|parent_id| *parent_id != entity_id)
                .map(str::to_owned);
        }

        match process.parent.clone() {
            Some(parent_id) if is_resolvable(map, &parent_id, root_entity_id) => {
                attach_child(map, &parent_id, entity_id, backward, &mut cursors);
            }
            _ => {
                if !orphans.iter().any(|id| id == entity_id) {
                    debug!("Parent of {entity_id} is not loaded yet, keeping it as an orphan");
                    orphans.push(entity_id.to_owned());
                }
            }
        }
    }

    let pending = std::mem::take(orphans);
    for orphan_id in pending {
        let parent_id = map
            .get(&orphan_id)
            .and_then(|process| process.parent.clone());

        match parent_id {
            Some(parent_id) if is_resolvable(map, &parent_id, root_entity_id) => {
                debug!("Resolved orphan {orphan_id} under {parent_id}");
                attach_child(map, &parent_id, &orphan_id, backward, &mut cursors);
            }
            _ => orphans.push(orphan_id),
        }
    }
}

/// Merge one page of events: record them, then link the tree.
pub fn process_new_events(
    map: &mut ProcessMap,
    events: &[ProcessEvent],
    orphans: &mut Vec<String>,
    root_entity_id: &str,
    backward: bool,
) {
    update_process_map(map, events);
    build_process_tree(map, events, orphans, root_entity_id, backward);
}

/// Children of `id` ordered by start time.
///
/// With `group_leaders_only`, children that stay in the session's process
/// group are hidden unless they carry alerts or match the current search.
pub fn children<'a>(
    map: &'a ProcessMap,
    ui: &UiState,
    id: &str,
    group_leaders_only: bool,
) -> Vec<&'a Process> {
    let Some(process) = map.get(id) else {
        return Vec::new();
    };

    process
        .children
        .iter()
        .filter_map(|child_id| map.get(child_id))
        .filter(|child| !group_leaders_only || is_group_leader_or_notable(child, ui))
        .sorted_by(|a, b| sort_processes(a, b))
        .collect()
}

fn is_group_leader_or_notable(child: &Process, ui: &UiState) -> bool {
    if child.has_alerts() || ui.search_matched(&child.id).is_some() {
        return true;
    }

    let process = &child.details().process;
    match &process.session {
        Some(session) => process.pgid != session.pgid,
        None => true,
    }
}
