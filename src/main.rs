mod app;
mod cli;
mod config;
mod local_logger;
mod pages;
mod prelude;
mod render;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let res = crate::app::run();
    if let Err(err) = res {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
