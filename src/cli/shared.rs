use std::path::PathBuf;

use crate::VERSION;
use crate::config::SessionViewConfig;
use crate::pages::{fold_alerts, load_event, load_pages};
use crate::prelude::*;
use clap::Args;
use process_tree::{Direction, SessionTree};

/// Arguments shared by every command that builds a session tree
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Entity id of the session leader, the root of the tree
    #[arg(long = "session", env = "SESSIONVIEW_SESSION_ENTITY_ID")]
    pub session_entity_id: String,

    /// Page files, oldest first. A file holds a single page or a list of pages
    #[arg(required = true)]
    pub pages: Vec<PathBuf>,

    /// Alerts page files fetched alongside the pages, one alerts page per events page
    #[arg(long)]
    pub alerts: Vec<PathBuf>,

    /// Page files fetched afterwards by paging back from the first page, oldest first
    #[arg(long)]
    pub previous: Vec<PathBuf>,

    /// Alerts page files fetched alongside the previous pages
    #[arg(long)]
    pub previous_alerts: Vec<PathBuf>,

    /// Only show the children that lead their own process group
    #[arg(long)]
    pub group_leaders_only: bool,

    /// File holding a single event whose process should be selected
    #[arg(long)]
    pub jump_to: Option<PathBuf>,

    /// Search the working directory and arguments of every process
    #[arg(long)]
    pub search: Option<String>,
}

/// Build the session tree out of the page files, merging the previous pages last
pub fn build_session(args: &SessionArgs, config: &SessionViewConfig) -> Result<SessionTree> {
    debug!("sessionview v{VERSION}");

    let pages = fold_alerts(load_pages(&args.pages)?, load_pages(&args.alerts)?)?;
    if pages.is_empty() {
        bail!("No process events page found in the given files");
    }

    let mut session = SessionTree::new(&args.session_entity_id, config.tree.clone());
    session.set_group_leaders_only(args.group_leaders_only || config.display.group_leaders_only);
    if let Some(path) = &args.jump_to {
        let event = load_event(path)?;
        session.set_jump_to(Some(&event));
    }
    session.apply_pages(&pages);

    let previous = fold_alerts(
        load_pages(&args.previous)?,
        load_pages(&args.previous_alerts)?,
    )?;
    // Each backward page lands before the ones already merged
    for page in previous.iter().rev() {
        session.merge_page(page, Direction::Backward);
    }

    if session.search_query() != args.search.as_deref() {
        session.set_search_query(args.search.as_deref());
    }

    if !session.orphan_ids().is_empty() {
        warn!(
            "{} processes have no known parent yet, load previous pages to attach them",
            session.orphan_ids().len()
        );
    }

    Ok(session)
}
