use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::session::SessionTree;

pub trait ArtifactExt
where
    Self: Sized + Serialize,
{
    fn name() -> &'static str {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or_default()
    }

    fn encode_to_writer<W: std::io::Write>(&self, mut writer: W) -> anyhow::Result<()> {
        let encoded = rmp_serde::to_vec_named(self)?;
        writer.write_all(&encoded)?;
        Ok(())
    }

    fn save_file_to<P: AsRef<Path>>(&self, folder: P, filename: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(folder.as_ref())?;
        let file = std::fs::File::create(folder.as_ref().join(filename))?;
        self.encode_to_writer(file)?;

        debug!("Saved {} to {:?}", Self::name(), folder.as_ref());
        Ok(())
    }

    fn save_to<P: AsRef<Path>>(&self, folder: P) -> anyhow::Result<()> {
        self.save_file_to(folder, &format!("{}.msgpack", Self::name()))
    }

    fn save_json_to<P: AsRef<Path>>(&self, folder: P) -> anyhow::Result<()> {
        std::fs::create_dir_all(folder.as_ref())?;
        let path = folder.as_ref().join(format!("{}.json", Self::name()));
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, self)?;

        debug!("Saved {} to {}", Self::name(), path.display());
        Ok(())
    }
}

/// One visible row of the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub entity_id: String,
    pub parent: Option<String>,
    pub depth: usize,
    pub pid: i32,
    pub executable: String,
    pub command_line: String,
    pub alerts: usize,
    pub user_entered: bool,
    pub exited: bool,
    pub exit_code: Option<i32>,
    pub search_matched: Option<String>,
}

/// Serializable picture of the flattened tree, as last rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub session_entity_id: String,
    pub loaded_pages: usize,
    pub nodes: Vec<SnapshotNode>,
    pub orphans: Vec<String>,
    pub search_results: Vec<String>,
}

impl ArtifactExt for TreeSnapshot {}

impl From<&SessionTree> for TreeSnapshot {
    fn from(session: &SessionTree) -> Self {
        let nodes = session
            .flattened_with_depth()
            .into_iter()
            .map(|(process, depth)| {
                let details = &process.details().process;
                SnapshotNode {
                    entity_id: process.id.clone(),
                    parent: process.parent.clone(),
                    depth,
                    pid: details.pid,
                    executable: details.executable.clone(),
                    command_line: process.command_line(),
                    alerts: process.alerts().len(),
                    user_entered: process.is_user_entered(),
                    exited: process.has_exited(),
                    exit_code: process.exit_code(),
                    search_matched: session.ui().search_matched(&process.id).map(str::to_owned),
                }
            })
            .collect();

        TreeSnapshot {
            session_entity_id: session.session_entity_id().to_owned(),
            loaded_pages: session.loaded_pages(),
            nodes,
            orphans: session.orphan_ids().to_vec(),
            search_results: session.search_result_ids().to_vec(),
        }
    }
}
