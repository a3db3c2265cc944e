use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_keyword, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "vacancy-etl")]
#[command(about = "Collects job vacancies from hh.ru and superjob.ru and reports on them")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Directory holding one JSON file per keyword")]
    pub data_dir: Option<String>,

    #[arg(long, help = "Maximum number of pages requested from each board")]
    pub pages: Option<usize>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive keyword prompt and report menu (default)
    Menu,
    /// Fetch vacancies for a keyword from every board and save them
    Search { keyword: String },
    /// Salary statistics and the best-paid vacancy
    Stats { keyword: String },
    /// Best-paid vacancies
    Top {
        keyword: String,
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Most recently published vacancies
    Recent {
        keyword: String,
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// A random selection of vacancies
    Random {
        keyword: String,
        #[arg(short, long)]
        n: Option<usize>,
    },
}

impl CliConfig {
    /// File configuration (or defaults) with command-line overrides applied.
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::from_env(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if let Some(pages) = self.pages {
            config.fetch.pages_count = pages;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Menu)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Some(Command::Search { keyword })
            | Some(Command::Stats { keyword })
            | Some(Command::Top { keyword, .. })
            | Some(Command::Recent { keyword, .. })
            | Some(Command::Random { keyword, .. }) => validate_keyword(keyword),
            Some(Command::Menu) | None => Ok(()),
        }
    }
}
