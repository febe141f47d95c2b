use log::{debug, warn};
use regex::RegexBuilder;

use crate::process::Process;
use crate::process_map::ProcessMap;
use crate::ui_state::UiState;

/// Text matched by the search: working directory followed by the arguments
pub fn searchable_text(process: &Process) -> String {
    let details = &process.details().process;
    format!("{} {}", details.working_directory, details.args.join(" "))
}

/// Case-insensitive substring search over every process of the map.
///
/// Matches are returned in map insertion order and get the matched text
/// recorded for highlighting. Every other highlight is cleared, so an empty
/// or missing query resets the search.
pub fn search_process_tree(
    map: &ProcessMap,
    ui: &mut UiState,
    query: Option<&str>,
) -> Vec<String> {
    ui.clear_search_matches();

    let Some(query) = query.filter(|query| !query.is_empty()) else {
        return Vec::new();
    };

    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(err) => {
            warn!("Could not search for {query:?}: {err}");
            return Vec::new();
        }
    };

    let results: Vec<String> = map
        .iter()
        .filter(|process| !process.id.is_empty() && process.has_details())
        .filter_map(|process| {
            let text = searchable_text(process);
            let matched = pattern.find(&text)?;
            ui.set_search_match(&process.id, matched.as_str());
            Some(process.id.clone())
        })
        .collect();

    debug!("Search for {query:?} matched {} processes", results.len());
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ProcessEvent, ProcessFields};
    use rstest::rstest;

    fn map_with(processes: &[(&str, &str, &[&str])]) -> ProcessMap {
        let mut map = ProcessMap::new();
        for (id, working_directory, args) in processes {
            map.get_or_insert(id).events.push(ProcessEvent {
                process: ProcessFields {
                    entity_id: id.to_string(),
                    working_directory: working_directory.to_string(),
                    args: args.iter().map(|arg| arg.to_string()).collect(),
                    ..Default::default()
                },
                ..Default::default()
            });
        }
        map
    }

    #[rstest]
    #[case::lowercase("config", Some("config"))]
    #[case::uppercase("CONFIG", Some("config"))]
    #[case::mixed_case_text("readme", Some("README"))]
    #[case::spans_directory_and_args("vagrant vi", Some("vagrant vi"))]
    #[case::no_match("emacs", None)]
    fn test_search_match(#[case] query: &str, #[case] expected: Option<&str>) {
        let map = map_with(&[("vi", "/home/vagrant", &["vi", "cmd/config.ini", "README"])]);
        let mut ui = UiState::new();

        let results = search_process_tree(&map, &mut ui, Some(query));

        assert_eq!(results.len(), expected.is_some() as usize);
        assert_eq!(ui.search_matched("vi"), expected);
    }

    #[test]
    fn test_search_order_and_reset() {
        let map = map_with(&[
            ("bash", "/home/vagrant", &["bash"]),
            ("ls", "/tmp", &["ls", "-la"]),
            ("cat", "/tmp", &["cat", "notes"]),
        ]);
        let mut ui = UiState::new();

        let results = search_process_tree(&map, &mut ui, Some("/tmp"));
        assert_eq!(results, vec!["ls", "cat"]);
        assert_eq!(ui.search_matched("ls"), Some("/tmp"));

        let results = search_process_tree(&map, &mut ui, Some("bash"));
        assert_eq!(results, vec!["bash"]);
        assert_eq!(ui.search_matched("ls"), None);
        assert_eq!(ui.search_matched("cat"), None);

        assert!(search_process_tree(&map, &mut ui, Some("")).is_empty());
        assert_eq!(ui.search_matched("bash"), None);
        assert!(search_process_tree(&map, &mut ui, None).is_empty());
    }

    #[test]
    fn test_search_skips_placeholders() {
        let mut map = map_with(&[("ls", "/tmp", &["ls"])]);
        map.get_or_insert("pending");
        let mut ui = UiState::new();

        assert_eq!(search_process_tree(&map, &mut ui, Some(" ")), vec!["ls"]);
    }

    #[test]
    fn test_query_is_literal() {
        let map = map_with(&[("ls", "/tmp", &["ls", "*.rs"])]);
        let mut ui = UiState::new();

        assert_eq!(search_process_tree(&map, &mut ui, Some("*.rs")), vec!["ls"]);
        assert!(search_process_tree(&map, &mut ui, Some("l.")).is_empty());
    }
}
