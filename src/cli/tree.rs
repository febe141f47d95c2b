use crate::cli::{SessionArgs, build_session};
use crate::config::SessionViewConfig;
use crate::prelude::*;
use crate::render::render_tree;
use clap::Args;

#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Expand every process instead of only the session leader and the selection
    #[arg(long)]
    pub expand_all: bool,

    /// Disable colors in the output
    #[arg(long)]
    pub no_color: bool,
}

pub fn run(args: TreeArgs, config: &SessionViewConfig) -> Result<()> {
    let mut session = build_session(&args.session, config)?;
    if args.expand_all {
        session.expand_all();
    }

    let color = !(args.no_color || config.display.no_color) && console::colors_enabled();
    println!("{}", render_tree(&session, color));

    if let Some(selected) = session.selected() {
        info!("Selected process {}", selected.id);
    }

    Ok(())
}
