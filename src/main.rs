mod app;
mod cli;
mod commands;
mod desktop;
mod error;
mod history;
mod index;
mod launch;
mod matcher;
mod models;
mod names;
mod store;
mod watch;
mod xdg;

use clap::Parser;
use cli::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let code = app::run(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
