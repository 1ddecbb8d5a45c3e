use std::{io::Write, path::PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clipnest_preview::url;
use snafu::{OptionExt, ResultExt};
use tokio::runtime::Runtime;

use crate::{
    action::{self, Context},
    config::Config,
    error::{self, Error},
    settings::{self, ThemeCommands},
};

#[derive(Parser)]
#[clap(name = clipnest_base::CTL_PROGRAM_NAME, author, version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    commands: Option<Commands>,

    #[clap(
        long = "config",
        short = 'c',
        env = "CLIPNESTCTL_CONFIG_FILE_PATH",
        help = "Specify a configuration file"
    )]
    config_file: Option<PathBuf>,

    #[clap(
        long = "history-file",
        env = "CLIPNESTCTL_HISTORY_FILE_PATH",
        help = "Specify a history file"
    )]
    history_file_path: Option<PathBuf>,

    #[clap(
        long = "settings-file",
        env = "CLIPNESTCTL_SETTINGS_FILE_PATH",
        help = "Specify a window settings file"
    )]
    settings_file_path: Option<PathBuf>,

    #[clap(long = "log-level", env = "CLIPNESTCTL_LOG_LEVEL", help = "Specify a log level")]
    log_level: Option<tracing::Level>,
}

/// An entry picked by its position in the (filtered) listing.
#[derive(Args, Clone, Debug)]
pub struct Selection {
    #[clap(help = "Index of the entry as printed by `list`")]
    index: usize,

    #[clap(long = "filter", short = 'f', help = "Filter used when the index was listed")]
    filter: Option<String>,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    #[clap(about = "Print version information")]
    Version,

    #[clap(about = "Output shell completion code for the specified shell (bash, zsh, fish)")]
    Completions { shell: clap_complete::Shell },

    #[clap(about = "Output default configuration")]
    DefaultConfig,

    #[clap(aliases = &["ls", "search"], about = "Print history, pinned entries first")]
    List {
        #[clap(long = "filter", short = 'f', help = "Show only texts containing this")]
        filter: Option<String>,
    },

    #[clap(about = "Print the entry at <index>")]
    Show(Selection),

    #[clap(aliases = &["unpin"], about = "Pin or unpin the entry at <index>")]
    Pin(Selection),

    #[clap(aliases = &["rm", "remove", "del"], about = "Delete the entry at <index>")]
    Delete(Selection),

    #[clap(aliases = &["remove-all"], about = "Delete all entries, pinned ones included")]
    Clear,

    #[clap(aliases = &["count", "len"], about = "Print length of clipboard history")]
    Length,

    #[clap(about = "Copy the entry at <index> into the clipboard")]
    Copy(Selection),

    #[clap(about = "Copy the text recognized in the image at <index>")]
    CopyOcr(Selection),

    #[clap(
        aliases = &["open"],
        about = "Copy the entry at <index>, open it if it is a URL or copy the text of an image"
    )]
    Activate(Selection),

    #[clap(about = "Write the image at <index> to a PNG file")]
    SaveImage {
        #[clap(flatten)]
        selection: Selection,

        #[clap(long = "file", help = "Output file, a temporary file by default")]
        file_path: Option<PathBuf>,
    },

    #[clap(about = "Open the image at <index> with the opener program")]
    OpenImage(Selection),

    #[clap(aliases = &["google"], about = "Search the web for the text at <index>")]
    WebSearch {
        #[clap(flatten)]
        selection: Selection,

        #[clap(long = "print-only", help = "Print the search URL without opening it")]
        print_only: bool,
    },

    #[clap(about = "Preview the entry at <index>, fetching title and screenshot of URLs")]
    Preview {
        #[clap(flatten)]
        selection: Selection,

        #[clap(long = "no-screenshot", help = "Do not render a screenshot of URLs")]
        no_screenshot: bool,
    },

    #[clap(about = "Manage the window theme")]
    Theme {
        #[clap(subcommand)]
        command: ThemeCommands,
    },

    #[clap(about = "Lock the window position")]
    Lock,

    #[clap(about = "Unlock the window position")]
    Unlock,

    #[clap(about = "Print or set the window geometry, e.g. 800x500 or 800x500+10+10")]
    Geometry { geometry: Option<String> },
}

impl Default for Cli {
    fn default() -> Self { Self::parse() }
}

impl Cli {
    fn load_config(&self) -> Config {
        let mut config =
            Config::load_or_default(self.config_file.clone().unwrap_or_else(Config::default_path));
        if let Some(path) = &self.history_file_path {
            config.history_file_path.clone_from(path);
        }
        if let Some(path) = &self.settings_file_path {
            config.settings_file_path.clone_from(path);
        }
        if let Some(log_level) = self.log_level {
            config.log.level = log_level;
        }
        config
    }

    pub fn run(self) -> Result<(), Error> {
        match self.commands {
            Some(Commands::Version) => {
                return std::io::stdout()
                    .write_all(Self::command().render_long_version().as_bytes())
                    .context(error::WriteStdoutSnafu);
            }
            Some(Commands::Completions { shell }) => {
                let mut app = Self::command();
                let bin_name = app.get_name().to_string();
                clap_complete::generate(shell, &mut app, bin_name, &mut std::io::stdout());
                return Ok(());
            }
            Some(Commands::DefaultConfig) => {
                let config_text = toml::to_string_pretty(&Config::default())
                    .context(error::SerializeConfigSnafu)?;
                return std::io::stdout()
                    .write_all(config_text.as_bytes())
                    .context(error::WriteStdoutSnafu);
            }
            _ => {}
        }

        let config = self.load_config();
        config.log.registry();
        let commands = self.commands.unwrap_or(Commands::List { filter: None });

        Runtime::new()
            .context(error::InitializeTokioRuntimeSnafu)?
            .block_on(run_command(Context::new(config), commands))
    }
}

#[allow(clippy::too_many_lines)]
async fn run_command(ctx: Context, commands: Commands) -> Result<(), Error> {
    let config = ctx.config();
    match commands {
        Commands::List { filter } => {
            let history = ctx.history().await?;
            for line in action::list_lines(history.store(), filter.as_deref(), config.preview_length)
            {
                println!("{line}");
            }
        }
        Commands::Show(Selection { index, filter }) => {
            let history = ctx.history().await?;
            let entry = action::select(history.store(), index, filter.as_deref())?;
            match entry.as_text() {
                Some(text) => println!("{text}"),
                None => {
                    println!("{}", entry.basic_information());
                    if let Some(ocr_text) = entry.ocr_text() {
                        println!("{ocr_text}");
                    }
                }
            }
        }
        Commands::Pin(Selection { index, filter }) => {
            let (_lock, mut history) = ctx.history_for_update().await?;
            let id = action::select(history.store(), index, filter.as_deref())?.id();
            match history.toggle_pin(id).await? {
                Some(true) => println!("Pinned item"),
                Some(false) => println!("Unpinned item"),
                None => return Err(Error::NoSuchEntry { index }),
            }
        }
        Commands::Delete(Selection { index, filter }) => {
            let (_lock, mut history) = ctx.history_for_update().await?;
            let id = action::select(history.store(), index, filter.as_deref())?.id();
            let _entry = history.delete(id).await?.context(error::NoSuchEntrySnafu { index })?;
            println!("Deleted item");
        }
        Commands::Clear => {
            let (_lock, mut history) = ctx.history_for_update().await?;
            history.clear().await?;
            println!("History cleared");
        }
        Commands::Length => {
            println!("{}", ctx.history().await?.store().len());
        }
        Commands::Copy(Selection { index, filter }) => {
            let history = ctx.history().await?;
            let entry = action::select(history.store(), index, filter.as_deref())?;
            match (entry.as_text(), entry.image_data()) {
                (Some(text), _) => ctx.copy_text(text).await?,
                (None, Some(png)) => ctx.copy_image(png).await?,
                (None, None) => return Err(Error::NoSuchEntry { index }),
            }
        }
        Commands::CopyOcr(Selection { index, filter }) => {
            let history = ctx.history().await?;
            let entry = action::select(history.store(), index, filter.as_deref())?;
            if entry.image_data().is_none() {
                return Err(Error::NotAnImage { index });
            }
            let ocr_text = entry.ocr_text().context(error::NoOcrTextSnafu { index })?;
            ctx.copy_text(ocr_text).await?;
        }
        Commands::Activate(Selection { index, filter }) => {
            let history = ctx.history().await?;
            let entry = action::select(history.store(), index, filter.as_deref())?;
            ctx.activate(entry).await?;
        }
        Commands::SaveImage { selection: Selection { index, filter }, file_path } => {
            let history = ctx.history().await?;
            let entry = action::select(history.store(), index, filter.as_deref())?;
            let png = entry.image_data().context(error::NotAnImageSnafu { index })?;
            let path = action::save_image(png, file_path).await?;
            println!("{}", path.display());
        }
        Commands::OpenImage(Selection { index, filter }) => {
            let history = ctx.history().await?;
            let entry = action::select(history.store(), index, filter.as_deref())?;
            let png = entry.image_data().context(error::NotAnImageSnafu { index })?;
            let path = action::save_image(png, None).await?;
            println!("Opening image...");
            ctx.open(&path.to_string_lossy()).await?;
        }
        Commands::WebSearch { selection: Selection { index, filter }, print_only } => {
            let history = ctx.history().await?;
            let entry = action::select(history.store(), index, filter.as_deref())?;
            let text = entry.as_text().context(error::NotATextSnafu { index })?;
            let search_url = url::web_search_url(text);
            println!("{search_url}");
            if !print_only {
                ctx.open(&search_url).await?;
            }
        }
        Commands::Preview { selection: Selection { index, filter }, no_screenshot } => {
            let history = ctx.history().await?;
            let entry = action::select(history.store(), index, filter.as_deref())?;
            ctx.preview(entry, !no_screenshot).await?;
        }
        Commands::Theme { command } => {
            for line in settings::run_theme(command, &config.settings_file_path).await? {
                println!("{line}");
            }
        }
        Commands::Lock => println!("{}", settings::set_locked(true, &config.settings_file_path).await?),
        Commands::Unlock => {
            println!("{}", settings::set_locked(false, &config.settings_file_path).await?);
        }
        Commands::Geometry { geometry } => {
            println!("{}", settings::geometry(geometry, &config.settings_file_path).await?);
        }
        Commands::Version | Commands::Completions { .. } | Commands::DefaultConfig => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::Cli;

    #[test]
    fn test_command() { Cli::command().debug_assert(); }
}
