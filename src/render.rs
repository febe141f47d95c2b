use std::fmt::Display;

use console::Style;
use itertools::Itertools;
use process_tree::{Process, SessionTree};

fn paint(style: Style, text: impl Display, color: bool) -> String {
    style.force_styling(color).apply_to(text).to_string()
}

/// Highlight the first occurrence of `matched` inside `text`
fn highlight(text: &str, matched: Option<&str>, color: bool) -> String {
    let Some((start, matched)) = matched.and_then(|matched| {
        text.to_lowercase()
            .find(&matched.to_lowercase())
            .map(|start| (start, matched))
    }) else {
        return text.to_owned();
    };
    let end = start + matched.len();
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return text.to_owned();
    }

    format!(
        "{}{}{}",
        &text[..start],
        paint(Style::new().black().on_yellow(), &text[start..end], color),
        &text[end..]
    )
}

pub fn render_process(
    session: &SessionTree,
    process: &Process,
    depth: usize,
    color: bool,
) -> String {
    let details = &process.details().process;
    let marker = if session.children(&process.id).is_empty() {
        " "
    } else if session.ui().is_expanded(&process.id) {
        "▾"
    } else {
        "▸"
    };
    let command = if details.args.is_empty() {
        details.executable.clone()
    } else {
        process.command_line()
    };

    let mut line = format!(
        "{}{marker} [{}] {}",
        "  ".repeat(depth),
        details.pid,
        highlight(&command, session.ui().search_matched(&process.id), color)
    );

    if process.is_user_entered() {
        line.push(' ');
        line.push_str(&paint(Style::new().cyan(), "(user)", color));
    }
    let alerts = process.alerts().len();
    if alerts > 0 {
        let label = if alerts == 1 { "alert" } else { "alerts" };
        line.push(' ');
        line.push_str(&paint(
            Style::new().red().bold(),
            format!("{alerts} {label}"),
            color,
        ));
    }
    if let Some(exit_code) = process.exit_code() {
        line.push(' ');
        line.push_str(&paint(Style::new().dim(), format!("exit {exit_code}"), color));
    } else if process.has_exited() {
        line.push(' ');
        line.push_str(&paint(Style::new().dim(), "exited", color));
    }

    line
}

/// Render the visible rows of the tree, then the orphans
pub fn render_tree(session: &SessionTree, color: bool) -> String {
    let mut output = session
        .flattened_with_depth()
        .into_iter()
        .map(|(process, depth)| render_process(session, process, depth, color))
        .join("\n");

    let orphans = session.view().orphans;
    if !orphans.is_empty() {
        output.push_str("\n\n");
        output.push_str(&paint(Style::new().yellow().bold(), "Orphans", color));
        for orphan in orphans {
            output.push('\n');
            output.push_str(&render_process(session, orphan, 1, color));
        }
    }

    output
}
