//! Process tree of a recorded terminal session, built from paginated process
//! lifecycle events.

pub mod artifact;
pub mod config;
pub mod events;
pub mod expand;
pub mod feed;
pub mod flatten;
pub mod process;
pub mod process_map;
pub mod search;
pub mod session;
pub mod tree;
pub mod ui_state;

pub use artifact::{ArtifactExt, SnapshotNode, TreeSnapshot};
pub use config::TreeConfig;
pub use events::{
    AlertPayload, EventAction, EventKind, ProcessEvent, ProcessEventsPage, ProcessFields,
    ProcessSnapshot, User,
};
pub use expand::{auto_expand_process_tree, expand_to};
pub use feed::{PageFeed, spawn_merger};
pub use flatten::{flatten_tree, flatten_tree_with_depth, process_height};
pub use process::{AlertLevel, Process, sort_processes};
pub use process_map::{ProcessMap, update_process_map};
pub use search::{search_process_tree, searchable_text};
pub use session::{Direction, SessionTree, SessionView};
pub use tree::{build_process_tree, children, process_new_events};
pub use ui_state::{NodeState, UiState};
