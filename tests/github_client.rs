mod common;

use common::{closed_address, MockGitHub, Reply};
use github_portfolio::error::PortfolioError;
use github_portfolio::github::{GitHubClient, GitHubConfig};
use github_portfolio::models::Visibility;
use std::time::Duration;

#[tokio::test]
async fn test_github_client_creation() {
    let client = GitHubClient::new(GitHubConfig::default());
    assert!(client.is_ok());
}

#[tokio::test]
async fn test_fetch_profile() {
    let mock = MockGitHub::start(Reply::Ok, Reply::Ok).await;
    let profile = mock
        .client()
        .fetch_profile("octocat")
        .await
        .expect("Failed to fetch profile");

    assert_eq!(profile.login, "octocat");
    assert_eq!(profile.display_name(), "Octo Cat");
    assert_eq!(profile.public_repos, 3);
    assert_eq!(profile.followers, 120);
    assert_eq!(profile.following, 7);
    assert_eq!(profile.html_url, "https://github.com/octocat");
    assert_eq!(mock.requests(), vec!["/users/octocat".to_string()]);
}

#[tokio::test]
async fn test_fetch_repositories_requests_one_full_page() {
    let mock = MockGitHub::start(Reply::Ok, Reply::Ok).await;
    let repos = mock
        .client()
        .fetch_repositories("octocat")
        .await
        .expect("Failed to fetch repositories");

    assert_eq!(mock.requests(), vec!["/users/octocat/repos?per_page=100&sort=updated".to_string()]);
    assert_eq!(repos.len(), 3);

    let atlas = repos.iter().find(|r| r.name == "Atlas").unwrap();
    assert_eq!(atlas.stars, 40);
    assert_eq!(atlas.forks, 6);
    assert!(atlas.is_fork);
    assert!(atlas.description.is_none());

    // No visibility field, falls back to the private flag
    let cinder = repos.iter().find(|r| r.name == "cinder").unwrap();
    assert_eq!(cinder.visibility, Visibility::Public);
    assert!(cinder.language.is_none());
}

#[tokio::test]
async fn test_repository_not_found() {
    let mock = MockGitHub::start(Reply::Status(404), Reply::Status(404)).await;
    let result = mock.client().fetch_profile("ghost").await;

    match result.unwrap_err() {
        PortfolioError::NotFound(_) => {}
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock = MockGitHub::start(Reply::Ok, Reply::Status(502)).await;
    let result = mock.client().fetch_repositories("octocat").await;

    match result.unwrap_err() {
        PortfolioError::ApiError(message) => assert!(message.contains("502")),
        other => panic!("Expected ApiError, got: {:?}", other),
    }
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_rate_limited() {
    let mock = MockGitHub::start(Reply::RateLimited, Reply::Ok).await;
    let result = mock.client().fetch_profile("octocat").await;

    assert!(matches!(result, Err(PortfolioError::RateLimitExceeded(_))));
}

#[tokio::test]
async fn test_invalid_json() {
    let mock = MockGitHub::start(Reply::Ok, Reply::Garbage).await;
    let result = mock.client().fetch_repositories("octocat").await;

    assert!(matches!(result, Err(PortfolioError::JsonError(_))));
}

#[tokio::test]
async fn test_transport_failure() {
    let client = GitHubClient::new(GitHubConfig {
        api_base: closed_address().await,
        token: None,
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let result = client.fetch_profile("octocat").await;
    assert!(matches!(result, Err(PortfolioError::NetworkError(_))));
}

#[tokio::test]
#[ignore = "Requires network access to api.github.com"]
async fn test_fetch_live_profile() {
    let client = GitHubClient::new(GitHubConfig {
        token: std::env::var("GITHUB_TOKEN").ok(),
        ..Default::default()
    })
    .expect("Failed to create client");

    let profile = client.fetch_profile("octocat").await.expect("Failed to fetch profile");
    assert_eq!(profile.login, "octocat");

    let repos = client.fetch_repositories("octocat").await.expect("Failed to fetch repositories");
    assert!(!repos.is_empty());
    assert!(repos.len() <= 100);
}
