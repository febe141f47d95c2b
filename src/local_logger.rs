use std::env;

use crate::prelude::*;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

pub const SESSIONVIEW_LOG_ENV: &str = "SESSIONVIEW_LOG";

pub const SESSIONVIEW_U8_COLOR_CODE: u8 = 39; // #00AFFF

fn get_log_level() -> log::LevelFilter {
    env::var(SESSIONVIEW_LOG_ENV)
        .ok()
        .and_then(|log_level| log_level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info)
}

/// Logs go to stderr, stdout only carries the rendered output
pub fn init_local_logger() -> Result<()> {
    let config = ConfigBuilder::new()
        .set_time_level(log::LevelFilter::Debug)
        .build();

    TermLogger::init(
        get_log_level(),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize the logger")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case(Some("debug"), log::LevelFilter::Debug)]
    #[case(Some("TRACE"), log::LevelFilter::Trace)]
    #[case(Some("not-a-level"), log::LevelFilter::Info)]
    #[case(None, log::LevelFilter::Info)]
    fn test_log_level_from_env(#[case] value: Option<&str>, #[case] expected: log::LevelFilter) {
        temp_env::with_var(SESSIONVIEW_LOG_ENV, value, || {
            assert_eq!(get_log_level(), expected);
        });
    }
}
