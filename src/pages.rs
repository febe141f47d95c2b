use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::prelude::*;
use process_tree::{ProcessEvent, ProcessEventsPage};
use serde::Deserialize;

/// A page file holds either a single page or the list of pages of one fetch
#[derive(Deserialize)]
#[serde(untagged)]
enum PageFile {
    Many(Vec<ProcessEventsPage>),
    One(ProcessEventsPage),
}

pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let path = expand_path(path);
    fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Load the pages of every file, keeping the order of the files
pub fn load_pages(paths: &[PathBuf]) -> Result<Vec<ProcessEventsPage>> {
    let mut pages = Vec::new();

    for path in paths {
        let content = read_file(path)?;
        let file: PageFile = serde_json::from_slice(&content).with_context(|| {
            format!("Failed to parse process events page at {}", path.display())
        })?;

        match file {
            PageFile::Many(many) => pages.extend(many),
            PageFile::One(page) => pages.push(page),
        }
    }

    debug!("Loaded {} pages from {} files", pages.len(), paths.len());
    Ok(pages)
}

/// Fold the i-th alerts page into the i-th events page. Without alerts the
/// pages still get their events ordered by timestamp.
pub fn fold_alerts(
    pages: Vec<ProcessEventsPage>,
    alerts: Vec<ProcessEventsPage>,
) -> Result<Vec<ProcessEventsPage>> {
    if alerts.is_empty() {
        return Ok(pages
            .into_iter()
            .map(|page| page.merged_with_alerts(Vec::new()))
            .collect());
    }
    ensure!(
        alerts.len() == pages.len(),
        "Got {} alerts pages for {} events pages, each events page needs its alerts page",
        alerts.len(),
        pages.len()
    );

    Ok(pages
        .into_iter()
        .zip(alerts)
        .map(|(page, alerts)| page.merged_with_alerts(alerts.events))
        .collect())
}

pub fn load_event(path: &Path) -> Result<ProcessEvent> {
    let content = read_file(path)?;
    serde_json::from_slice(&content)
        .with_context(|| format!("Failed to parse process event at {}", path.display()))
}
