use std::{io::Write, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use snafu::ResultExt;
use tokio::runtime::Runtime;

use crate::{
    config::Config,
    error::{self, Error},
};

#[derive(Parser)]
#[command(name = clipnest_base::DAEMON_PROGRAM_NAME, author, version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    subcommand: Option<Commands>,

    #[clap(
        long = "config",
        short = 'c',
        env = "CLIPNESTD_CONFIG_FILE_PATH",
        help = "Specify a configuration file"
    )]
    config_file: Option<PathBuf>,

    #[clap(
        long = "history-file",
        env = "CLIPNESTD_HISTORY_FILE_PATH",
        help = "Specify a history file"
    )]
    history_file_path: Option<PathBuf>,

    #[clap(
        long = "max-history",
        env = "CLIPNESTD_MAX_HISTORY",
        help = "Specify the number of unpinned entries to keep"
    )]
    max_history: Option<usize>,

    #[clap(long = "no-ocr", help = "Do not recognize text in captured images")]
    no_ocr: bool,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    #[clap(about = "Print version information")]
    Version,

    #[clap(about = "Output shell completion code for the specified shell (bash, zsh, fish)")]
    Completions { shell: clap_complete::Shell },

    #[clap(about = "Output default configuration")]
    DefaultConfig,
}

impl Default for Cli {
    #[inline]
    fn default() -> Self { Self::parse() }
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        match self.subcommand {
            Some(Commands::Version) => std::io::stdout()
                .write_all(Self::command().render_long_version().as_bytes())
                .context(error::WriteStdoutSnafu),
            Some(Commands::Completions { shell }) => {
                let mut app = Self::command();
                let bin_name = app.get_name().to_string();
                clap_complete::generate(shell, &mut app, bin_name, &mut std::io::stdout());
                Ok(())
            }
            Some(Commands::DefaultConfig) => {
                let config_text = toml::to_string_pretty(&Config::default())
                    .context(error::SerializeConfigSnafu)?;
                std::io::stdout().write_all(config_text.as_bytes()).context(error::WriteStdoutSnafu)
            }
            None => {
                let config = self.load_config()?;
                run_clipnestd(config)
            }
        }
    }

    fn load_config(&self) -> Result<Config, Error> {
        let config_file = &self.config_file.clone().unwrap_or_else(Config::default_path);
        let mut config = Config::load(config_file)?;

        if let Some(history_file_path) = &self.history_file_path {
            config.history_file_path = history_file_path.clone();
        }

        if let Some(max_history) = self.max_history.filter(|&n| n > 0) {
            config.max_history = max_history;
        }

        if self.no_ocr {
            config.ocr.enable = false;
        }

        Ok(config)
    }
}

fn run_clipnestd(config: Config) -> Result<(), Error> {
    config.log.registry();
    let config = clipnest_server::Config::from(config);

    tracing::info!(
        "{} is initializing, pid: {}",
        clipnest_base::DAEMON_PROGRAM_NAME,
        std::process::id()
    );

    tracing::info!("Initializing Tokio runtime");

    let exit_status = match Runtime::new().context(error::InitializeTokioRuntimeSnafu) {
        Ok(runtime) => {
            runtime.block_on(clipnest_server::serve_with_shutdown(config)).map_err(Error::from)
        }
        Err(err) => Err(err),
    };

    tracing::info!("{} is shutdown", clipnest_base::DAEMON_PROGRAM_NAME);
    exit_status
}
