use crate::cli::{SessionArgs, build_session};
use crate::config::SessionViewConfig;
use crate::prelude::*;
use clap::Args;
use process_tree::{SessionTree, searchable_text};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Tabled, Debug, PartialEq)]
struct SearchRow {
    #[tabled(rename = "Entity id")]
    entity_id: String,
    #[tabled(rename = "Pid")]
    pid: i32,
    #[tabled(rename = "Searched text")]
    text: String,
    #[tabled(rename = "Match")]
    matched: String,
}

fn search_rows(session: &SessionTree) -> Vec<SearchRow> {
    session
        .view()
        .search_results
        .into_iter()
        .map(|process| SearchRow {
            entity_id: process.id.clone(),
            pid: process.details().process.pid,
            text: searchable_text(process),
            matched: session
                .ui()
                .search_matched(&process.id)
                .unwrap_or_default()
                .to_owned(),
        })
        .collect()
}

fn build_table(rows: &[SearchRow]) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::BOLD));
    table.to_string()
}

pub fn run(args: SearchArgs, config: &SessionViewConfig) -> Result<()> {
    if args.session.search.as_deref().is_none_or(str::is_empty) {
        bail!("A non-empty --search query is required");
    }

    let session = build_session(&args.session, config)?;
    let rows = search_rows(&session);
    if rows.is_empty() {
        info!("No process matches {:?}", args.session.search.unwrap_or_default());
        return Ok(());
    }

    println!("{}", build_table(&rows));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use process_tree::{ProcessEventsPage, TreeConfig};

    const SESSION_LEADER: &str = "3d0192c6-7c54-5ee6-a110-3539a7cf42bc";
    const MOCK_EVENTS: &str = include_str!("../../crates/process-tree/testdata/mock_events.json");

    #[test]
    fn test_search_rows() {
        let page: ProcessEventsPage = serde_json::from_str(MOCK_EVENTS).unwrap();
        let mut session = SessionTree::new(SESSION_LEADER, TreeConfig::default());
        session.apply_pages(&[page]);
        session.set_search_query(Some("CONFIG"));

        let rows = search_rows(&session);

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.pid == 3535));
        assert!(rows.iter().all(|row| row.matched == "config"));
        assert_eq!(rows[0].text, "/home/vagrant vi cmd/config.ini");
    }

    #[test]
    fn test_build_table() {
        let rows = vec![SearchRow {
            entity_id: "a".into(),
            pid: 1,
            text: "/ ls".into(),
            matched: "ls".into(),
        }];

        let table = build_table(&rows);

        assert!(table.contains("Entity id"));
        assert!(table.contains("/ ls"));
    }
}
