use clap::Parser;
use colored::*;
use github_portfolio::cli::{Cli, Command, ThemeAction};
use github_portfolio::error::Result;
use github_portfolio::github::{GitHubClient, GitHubConfig};
use github_portfolio::loader::load_into;
use github_portfolio::models::Theme;
use github_portfolio::page::{render_page, PageContext};
use github_portfolio::server::{serve, AppState};
use github_portfolio::theme::ThemeStore;
use github_portfolio::view::{PanelState, PortfolioView};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();
    let system_theme = cli.prefer_dark.then_some(Theme::Dark);
    let themes = ThemeStore::new(cli.theme_file.clone());

    let config = GitHubConfig {
        api_base: cli.api_base.clone(),
        token: cli.token.clone(),
        ..Default::default()
    };

    match cli.command {
        Command::Serve { port } => {
            println!("{}", "GitHub Portfolio Server".bold().green());
            println!("{}\n", "=".repeat(50).dimmed());
            println!("👤 Account: {}", cli.username.cyan());
            println!("📡 Listening on port {}", port);
            println!("\nPress Ctrl+C to stop the server\n");

            let state = AppState {
                client: Arc::new(GitHubClient::new(config)?),
                username: cli.username,
                view: Arc::new(RwLock::new(PortfolioView::default())),
                themes,
                system_theme,
            };

            tokio::select! {
                result = serve(state, port) => result?,
                _ = tokio::signal::ctrl_c() => {
                    println!("\n🛑 Shutting down server...");
                }
            }
        }
        Command::Render { sort, output } => {
            let client = GitHubClient::new(config)?;
            let mut view = PortfolioView::new(sort);
            load_into(&client, &cli.username, &mut view).await;

            let theme = themes.current(system_theme).await?;
            let cards = view.cards();
            let html = render_page(&PageContext::from_view(&view, &cards, &cli.username, theme));
            std::fs::write(&output, html)?;

            match view.repo_panel() {
                PanelState::Failed(message) => {
                    eprintln!("{} {}", "⚠️ Repositories failed to load:".yellow(), message);
                }
                _ => println!("✅ Rendered {} repositories", cards.len()),
            }
            println!("📄 Wrote {}", output.display());
        }
        Command::Theme { action } => {
            let theme = match action {
                ThemeAction::Show => themes.current(system_theme).await?,
                ThemeAction::Toggle => themes.toggle(system_theme).await?,
            };
            println!("{} {}", theme.icon(), theme);
        }
    }

    Ok(())
}
