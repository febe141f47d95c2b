use crate::{
    cli::{export, search, tree},
    config::SessionViewConfig,
    local_logger::{SESSIONVIEW_U8_COLOR_CODE, init_local_logger},
    prelude::*,
};
use clap::{
    Parser, Subcommand,
    builder::{Styles, styling},
};

fn create_styles() -> Styles {
    styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(
            styling::Ansi256Color(SESSIONVIEW_U8_COLOR_CODE).on_default() | styling::Effects::BOLD,
        )
        .placeholder(styling::AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Explore the process tree of a recorded terminal session",
    styles = create_styles()
)]
pub struct Cli {
    /// The configuration name to use
    /// If provided, the configuration will be loaded from ~/.config/sessionview/{config-name}.yaml
    /// Otherwise, loads from ~/.config/sessionview/config.yaml
    #[arg(long, env = "SESSIONVIEW_CONFIG_NAME", global = true)]
    pub config_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the process tree of a session
    #[command(alias = "t")]
    Tree(Box<tree::TreeArgs>),
    /// List the processes matching a search query
    #[command(alias = "s")]
    Search(Box<search::SearchArgs>),
    /// Write a snapshot of the visible tree to a directory
    Export(Box<export::ExportArgs>),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_local_logger()?;
    let config = SessionViewConfig::load(cli.config_name.as_deref())?;

    match cli.command {
        Commands::Tree(args) => tree::run(*args, &config)?,
        Commands::Search(args) => search::run(*args, &config)?,
        Commands::Export(args) => export::run(*args, &config)?,
    }
    Ok(())
}
