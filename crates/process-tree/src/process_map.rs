use std::collections::{HashMap, HashSet};

use log::{trace, warn};

use crate::events::{EventAction, ProcessEvent};
use crate::process::Process;

/// Processes keyed by entity id, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessMap {
    processes: HashMap<String, Process>,
    order: Vec<String>,
}

impl ProcessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.processes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Process> {
        self.processes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Process> {
        self.processes.get_mut(id)
    }

    /// Get the process for `id`, creating an empty one if it is unknown
    pub fn get_or_insert(&mut self, id: &str) -> &mut Process {
        if !self.processes.contains_key(id) {
            self.order.push(id.to_owned());
        }
        self.processes
            .entry(id.to_owned())
            .or_insert_with(|| Process::new(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> + '_ {
        self.order.iter().filter_map(|id| self.processes.get(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Entity ids from the parent of `id` up to the furthest known ancestor
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([id.to_owned()]);
        let mut current = self.get(id).and_then(|process| process.parent.clone());

        while let Some(parent_id) = current {
            if !seen.insert(parent_id.clone()) {
                break;
            }
            current = self.get(&parent_id).and_then(|process| process.parent.clone());
            if self.contains(&parent_id) {
                ancestors.push(parent_id);
            }
        }

        ancestors
    }
}

/// Append each event to the process it belongs to, creating processes on
/// first sight. Events are recorded in the order given.
pub fn update_process_map(map: &mut ProcessMap, events: &[ProcessEvent]) {
    for event in events {
        let entity_id = event.process.entity_id.as_str();
        let process = map.get_or_insert(entity_id);

        if matches!(event.event.action, EventAction::Fork | EventAction::Exec)
            && process.has_details()
        {
            let known_pid = process.details().process.pid;
            if known_pid != event.process.pid {
                warn!(
                    "Entity {entity_id} reported pid {} but was recorded with pid {known_pid}, merging both lifecycles",
                    event.process.pid
                );
            }
        }

        trace!("Recording {:?} event for {entity_id}", event.event.action);
        process.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventMeta, ProcessFields};

    fn event(entity_id: &str, action: EventAction, pid: i32) -> ProcessEvent {
        ProcessEvent {
            event: EventMeta {
                action,
                ..Default::default()
            },
            process: ProcessFields {
                entity_id: entity_id.into(),
                pid,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_update_process_map_groups_by_entity() {
        let mut map = ProcessMap::new();
        let events = vec![
            event("b", EventAction::Fork, 2),
            event("a", EventAction::Fork, 1),
            event("b", EventAction::Exec, 2),
            event("b", EventAction::Exit, 2),
        ];

        update_process_map(&mut map, &events);

        assert_eq!(map.ids().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.get("b").unwrap().events.len(), 3);
        assert_eq!(map.get("a").unwrap().events.len(), 1);
        for event in &events {
            assert!(map.get(&event.process.entity_id).unwrap().events.contains(event));
        }
    }

    #[test]
    fn test_missing_process_fields_are_kept() {
        let mut map = ProcessMap::new();
        let event = ProcessEvent::default();

        update_process_map(&mut map, std::slice::from_ref(&event));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("").unwrap().events, vec![event]);
    }

    #[test_log::test]
    fn test_pid_collision_is_merged() {
        let mut map = ProcessMap::new();

        update_process_map(
            &mut map,
            &[event("a", EventAction::Exec, 1), event("a", EventAction::Exec, 9)],
        );

        let process = map.get("a").unwrap();
        assert_eq!(process.events.len(), 2);
        assert_eq!(process.details().process.pid, 9);
    }

    #[test]
    fn test_ancestors() {
        let mut map = ProcessMap::new();
        map.get_or_insert("root");
        map.get_or_insert("mid").parent = Some("root".into());
        map.get_or_insert("leaf").parent = Some("mid".into());

        assert_eq!(map.ancestors("leaf"), vec!["mid", "root"]);
        assert!(map.ancestors("root").is_empty());
    }

    #[test]
    fn test_ancestors_stops_on_cycle() {
        let mut map = ProcessMap::new();
        map.get_or_insert("a").parent = Some("b".into());
        map.get_or_insert("b").parent = Some("a".into());

        assert_eq!(map.ancestors("a"), vec!["b"]);
    }
}
