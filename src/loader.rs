use crate::github::GitHubClient;
use crate::view::PortfolioView;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Fetches the profile and the repositories concurrently and applies each
/// result on its own. Failures are logged and never escape: a failed profile
/// leaves the profile empty, a failed repository fetch puts the grid in its
/// error state.
pub async fn load_into(client: &GitHubClient, username: &str, view: &mut PortfolioView) {
    view.begin_loading();

    let (profile, repositories) = tokio::join!(
        client.fetch_profile(username),
        client.fetch_repositories(username)
    );

    match profile {
        Ok(profile) => {
            info!(username, followers = profile.followers, "Loaded profile");
            view.set_profile(profile);
        }
        Err(e) => error!(username, error = %e, "Error loading user data"),
    }

    match repositories {
        Ok(repositories) => {
            info!(username, count = repositories.len(), "Loaded repositories");
            view.replace_repositories(repositories);
        }
        Err(e) => {
            error!(username, error = %e, "Error loading repositories");
            view.fail(e.to_string());
        }
    }
}

/// Loads into a shared view from a background task.
///
/// The view is marked loading up front and each panel is written as soon as its
/// own response arrives, so a request that never completes leaves only its panel
/// loading.
pub fn spawn_load(
    client: Arc<GitHubClient>,
    username: String,
    view: Arc<RwLock<PortfolioView>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        view.write().await.begin_loading();

        let profile_task = async {
            match client.fetch_profile(&username).await {
                Ok(profile) => {
                    info!(username = %username, "Loaded profile");
                    view.write().await.set_profile(profile);
                }
                Err(e) => error!(username = %username, error = %e, "Error loading user data"),
            }
        };

        let repositories_task = async {
            match client.fetch_repositories(&username).await {
                Ok(repositories) => {
                    info!(username = %username, count = repositories.len(), "Loaded repositories");
                    view.write().await.replace_repositories(repositories);
                }
                Err(e) => {
                    error!(username = %username, error = %e, "Error loading repositories");
                    view.write().await.fail(e.to_string());
                }
            }
        };

        tokio::join!(profile_task, repositories_task);
    })
}
