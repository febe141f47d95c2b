use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::TreeConfig;
use crate::events::{EventKind, ProcessEvent, ProcessEventsPage};
use crate::expand::{auto_expand_process_tree, expand_to};
use crate::flatten::{flatten_tree, flatten_tree_with_depth, process_height};
use crate::process::Process;
use crate::process_map::ProcessMap;
use crate::search::search_process_tree;
use crate::tree::{children, process_new_events};
use crate::ui_state::UiState;

/// Where a page sits relative to the pages already merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Older events, fetched while paging back from the loaded window
    Backward,
    Forward,
}

/// Derived views of a session, borrowed from its [`SessionTree`]
#[derive(Debug)]
pub struct SessionView<'a> {
    pub session_leader: &'a Process,
    pub process_map: &'a ProcessMap,
    pub orphans: Vec<&'a Process>,
    pub search_results: Vec<&'a Process>,
    pub flattened: Vec<&'a Process>,
}

/// Process tree of one session, built incrementally from event pages.
///
/// Merging needs `&mut self`, so pages are always merged one at a time.
/// See [`spawn_merger`](crate::spawn_merger) to feed pages from several
/// threads.
#[derive(Debug, Clone)]
pub struct SessionTree {
    session_entity_id: String,
    config: TreeConfig,
    group_leaders_only: bool,
    process_map: ProcessMap,
    ui: UiState,
    orphans: Vec<String>,
    /// Cursors of the merged pages, in merge order
    processed_cursors: Vec<String>,
    leader_seeded: bool,
    search_query: Option<String>,
    search_results: Vec<String>,
    jump_to: Option<String>,
}

impl SessionTree {
    pub fn new(session_entity_id: impl Into<String>, config: TreeConfig) -> Self {
        let session_entity_id = session_entity_id.into();
        let mut process_map = ProcessMap::new();
        process_map.get_or_insert(&session_entity_id);

        Self {
            session_entity_id,
            config,
            group_leaders_only: false,
            process_map,
            ui: UiState::new(),
            orphans: Vec::new(),
            processed_cursors: Vec::new(),
            leader_seeded: false,
            search_query: None,
            search_results: Vec::new(),
            jump_to: None,
        }
    }

    pub fn session_entity_id(&self) -> &str {
        &self.session_entity_id
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn process_map(&self) -> &ProcessMap {
        &self.process_map
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn orphan_ids(&self) -> &[String] {
        &self.orphans
    }

    pub fn search_result_ids(&self) -> &[String] {
        &self.search_results
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    pub fn loaded_pages(&self) -> usize {
        self.processed_cursors.len()
    }

    pub fn group_leaders_only(&self) -> bool {
        self.group_leaders_only
    }

    pub fn set_group_leaders_only(&mut self, group_leaders_only: bool) {
        self.group_leaders_only = group_leaders_only;
    }

    pub fn session_leader(&self) -> &Process {
        self.process_map
            .get(&self.session_entity_id)
            .expect("the session leader is inserted on creation")
    }

    /// The real leader event may sit outside of the loaded window, so the
    /// leader starts with the entry leader snapshot of the first regular event.
    /// Only the first merged page is considered, later pages never seed it.
    fn seed_leader(&mut self, page: &ProcessEventsPage) {
        self.leader_seeded = true;

        let fake_leader_event = page
            .events
            .iter()
            .find(|event| event.event.kind == EventKind::Event)
            .and_then(|event| {
                let entry = event.process.entry.as_ref()?;
                Some(ProcessEvent {
                    process: event.process.overlaid_with(entry),
                    ..event.clone()
                })
            });

        match fake_leader_event {
            Some(event) => {
                debug!(
                    "Seeding session leader {} from the entry leader",
                    self.session_entity_id
                );
                self.process_map
                    .get_or_insert(&self.session_entity_id)
                    .events
                    .push(event);
            }
            None => debug!(
                "First page of {} has no entry leader snapshot",
                self.session_entity_id
            ),
        }
    }

    fn merge(&mut self, page: &ProcessEventsPage, direction: Direction) -> bool {
        if self.processed_cursors.contains(&page.cursor) {
            debug!("Page {} was already merged, skipping it", page.cursor);
            return false;
        }

        if !self.leader_seeded {
            self.seed_leader(page);
        }

        process_new_events(
            &mut self.process_map,
            &page.events,
            &mut self.orphans,
            &self.session_entity_id,
            direction == Direction::Backward,
        );
        self.processed_cursors.push(page.cursor.clone());

        debug!(
            "Merged {direction:?} page {} ({} events), {} processes, {} orphans",
            page.cursor,
            page.events.len(),
            self.process_map.len(),
            self.orphans.len()
        );
        true
    }

    /// Merge a single page. Returns false if the page was already merged.
    pub fn merge_page(&mut self, page: &ProcessEventsPage, direction: Direction) -> bool {
        let merged = self.merge(page, direction);
        if merged {
            self.refresh();
        }
        merged
    }

    /// Merge every page not seen yet, given the complete list of loaded pages
    /// ordered oldest first. New pages positioned before the count of pages
    /// already merged were fetched backward.
    pub fn apply_pages(&mut self, pages: &[ProcessEventsPage]) {
        let previously_processed = self.processed_cursors.len();
        let mut merged = 0;

        for (index, page) in pages.iter().enumerate() {
            let direction = if index < previously_processed {
                Direction::Backward
            } else {
                Direction::Forward
            };
            if self.merge(page, direction) {
                merged += 1;
            }
        }

        if merged > 0 {
            info!(
                "Merged {merged} new pages into session {}",
                self.session_entity_id
            );
            self.refresh();
        }
    }

    pub fn set_search_query(&mut self, query: Option<&str>) {
        self.search_query = query.map(str::to_owned);
        self.refresh();
    }

    /// Select the process of `event` once its page is loaded
    pub fn set_jump_to(&mut self, event: Option<&ProcessEvent>) {
        self.jump_to = event.map(|event| event.process.entity_id.clone());
        if let Some(target) = self.jump_target().map(|process| process.id.clone()) {
            expand_to(&self.process_map, &mut self.ui, &target);
        }
    }

    /// The jump target, available when exactly the page before and the page
    /// after the jump point are loaded.
    pub fn jump_target(&self) -> Option<&Process> {
        if self.processed_cursors.len() != 2 {
            return None;
        }
        self.jump_to
            .as_deref()
            .and_then(|entity_id| self.process_map.get(entity_id))
    }

    /// The process to highlight: the jump target, else the first search result
    pub fn selected(&self) -> Option<&Process> {
        self.jump_target().or_else(|| {
            self.search_results
                .first()
                .and_then(|entity_id| self.process_map.get(entity_id))
        })
    }

    /// Recompute the derived state after pages or the query changed
    fn refresh(&mut self) {
        self.search_results = search_process_tree(
            &self.process_map,
            &mut self.ui,
            self.search_query.as_deref(),
        );
        auto_expand_process_tree(&self.process_map, &mut self.ui, &self.session_entity_id);

        if let Some(selected) = self.selected().map(|process| process.id.clone()) {
            expand_to(&self.process_map, &mut self.ui, &selected);
        }
    }

    pub fn toggle_expanded(&mut self, entity_id: &str) -> bool {
        self.ui.toggle_expanded(entity_id)
    }

    pub fn toggle_alerts_expanded(&mut self, entity_id: &str) -> bool {
        self.ui.toggle_alerts_expanded(entity_id)
    }

    pub fn expand_all(&mut self) {
        let ids: Vec<String> = self.process_map.ids().map(str::to_owned).collect();
        for id in ids {
            self.ui.set_expanded(&id, true);
        }
    }

    /// Visible children of a process. The group leader filter only thins out
    /// the session leader's direct children.
    pub fn children(&self, entity_id: &str) -> Vec<&Process> {
        let filtered = self.group_leaders_only && entity_id == self.session_entity_id;
        children(&self.process_map, &self.ui, entity_id, filtered)
    }

    pub fn height(&self, entity_id: &str) -> u32 {
        process_height(
            &self.process_map,
            &self.ui,
            entity_id,
            entity_id == self.session_entity_id,
            &self.config,
        )
    }

    pub fn flattened_with_depth(&self) -> Vec<(&Process, usize)> {
        flatten_tree_with_depth(
            &self.process_map,
            &self.ui,
            &self.session_entity_id,
            self.group_leaders_only,
        )
        .into_iter()
        .filter_map(|(id, depth)| self.process_map.get(&id).map(|process| (process, depth)))
        .collect()
    }

    fn resolve<'a>(&'a self, ids: &[String]) -> Vec<&'a Process> {
        ids.iter()
            .filter_map(|id| self.process_map.get(id))
            .collect()
    }

    pub fn view(&self) -> SessionView<'_> {
        let flattened = flatten_tree(
            &self.process_map,
            &self.ui,
            &self.session_entity_id,
            self.group_leaders_only,
        );

        SessionView {
            session_leader: self.session_leader(),
            process_map: &self.process_map,
            orphans: self.resolve(&self.orphans),
            search_results: self.resolve(&self.search_results),
            flattened: self.resolve(&flattened),
        }
    }
}
