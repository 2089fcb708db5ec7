use crate::models::SortKey;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "github-portfolio")]
#[command(about = "GitHub Portfolio - Renders a profile and its repositories as a portfolio page")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// GitHub account to show
    #[arg(long, env = "GITHUB_USERNAME", default_value = "rhamenator")]
    pub username: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API", default_value = "https://api.github.com")]
    pub api_base: String,

    /// Optional API token, raises the rate limit
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Where the theme preference is stored
    #[arg(long, env = "PORTFOLIO_THEME_FILE", default_value = ".portfolio-theme.json")]
    pub theme_file: PathBuf,

    /// Use the dark theme when no preference has been saved
    #[arg(long, env = "PORTFOLIO_PREFER_DARK")]
    pub prefer_dark: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the portfolio page and JSON API
    Serve {
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Fetch once and write a static HTML page
    Render {
        #[arg(long, value_enum, default_value_t = SortKey::Updated)]
        sort: SortKey,

        #[arg(long, short, default_value = "index.html")]
        output: PathBuf,
    },
    /// Show or flip the saved theme preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    Show,
    Toggle,
}
