mod action;
mod cli;
mod config;
mod error;
mod settings;

use self::{cli::Cli, error::CommandError};

fn main() {
    if let Err(err) = Cli::default().run() {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
