use std::path::{Path, PathBuf};

use crate::cli::{SessionArgs, build_session};
use crate::config::SessionViewConfig;
use crate::pages::expand_path;
use crate::prelude::*;
use clap::{Args, ValueEnum};
use process_tree::{ArtifactExt, SessionTree, TreeSnapshot};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Msgpack,
    Json,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Directory the snapshot is written to
    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    pub format: ExportFormat,

    /// Expand every process before taking the snapshot
    #[arg(long)]
    pub expand_all: bool,
}

pub fn export_snapshot(session: &SessionTree, output: &Path, format: ExportFormat) -> Result<()> {
    let snapshot = TreeSnapshot::from(session);
    match format {
        ExportFormat::Msgpack => snapshot.save_to(output),
        ExportFormat::Json => snapshot.save_json_to(output),
    }
    .with_context(|| format!("Failed to export the tree snapshot to {}", output.display()))?;

    info!(
        "Exported {} rows of session {} to {}",
        snapshot.nodes.len(),
        snapshot.session_entity_id,
        output.display()
    );
    Ok(())
}

pub fn run(args: ExportArgs, config: &SessionViewConfig) -> Result<()> {
    let mut session = build_session(&args.session, config)?;
    if args.expand_all {
        session.expand_all();
    }

    export_snapshot(&session, &expand_path(&args.output), args.format)
}
