#![allow(dead_code)]

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use github_portfolio::github::{GitHubClient, GitHubConfig};
use github_portfolio::models::{Repository, Visibility};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the fake API answers one endpoint
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Ok,
    Status(u16),
    RateLimited,
    Garbage,
    Hang,
}

#[derive(Clone)]
struct MockState {
    profile: Reply,
    repos: Reply,
    requests: Arc<Mutex<Vec<String>>>,
}

/// A local stand-in for the GitHub REST API
pub struct MockGitHub {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockGitHub {
    pub async fn start(profile: Reply, repos: Reply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            profile,
            repos,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/users/:username", get(user_handler))
            .route("/users/:username/repos", get(repos_handler))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockGitHub {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn client(&self) -> GitHubClient {
        GitHubClient::new(GitHubConfig {
            api_base: self.base_url.clone(),
            token: None,
            timeout: Duration::from_secs(5),
        })
        .expect("Failed to create client")
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn user_handler(State(state): State<MockState>, Path(username): Path<String>) -> Response {
    state.requests.lock().unwrap().push(format!("/users/{}", username));
    reply(state.profile, sample_profile_json(&username)).await
}

async fn repos_handler(
    State(state): State<MockState>,
    Path(username): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    state.requests.lock().unwrap().push(format!(
        "/users/{}/repos?{}",
        username,
        query.unwrap_or_default()
    ));
    reply(state.repos, sample_repos_json(&username)).await
}

async fn reply(kind: Reply, body: serde_json::Value) -> Response {
    match kind {
        Reply::Ok => Json(body).into_response(),
        Reply::Status(code) => {
            (StatusCode::from_u16(code).unwrap(), "upstream failure").into_response()
        }
        Reply::RateLimited => (
            StatusCode::FORBIDDEN,
            [
                ("X-RateLimit-Remaining", "0"),
                ("X-RateLimit-Limit", "60"),
                ("X-RateLimit-Reset", "1700000000"),
            ],
            "API rate limit exceeded",
        )
            .into_response(),
        Reply::Garbage => (StatusCode::OK, "this is not json").into_response(),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Json(body).into_response()
        }
    }
}

pub fn sample_profile_json(username: &str) -> serde_json::Value {
    json!({
        "login": username,
        "id": 42,
        "name": "Octo Cat",
        "bio": "Builds <things>",
        "avatar_url": format!("https://avatars.example.com/{}", username),
        "html_url": format!("https://github.com/{}", username),
        "public_repos": 3,
        "followers": 120,
        "following": 7
    })
}

pub fn sample_repos_json(username: &str) -> serde_json::Value {
    json!([
        {
            "name": "beacon",
            "html_url": format!("https://github.com/{}/beacon", username),
            "description": "Signals & <noise>",
            "language": "Rust",
            "stargazers_count": 5,
            "forks_count": 1,
            "fork": false,
            "updated_at": "2024-03-01T10:00:00Z",
            "private": false,
            "visibility": "public"
        },
        {
            "name": "Atlas",
            "html_url": format!("https://github.com/{}/Atlas", username),
            "description": null,
            "language": "Zig",
            "stargazers_count": 40,
            "forks_count": 6,
            "fork": true,
            "updated_at": "2023-11-20T08:30:00Z",
            "private": false,
            "visibility": "public"
        },
        {
            "name": "cinder",
            "html_url": format!("https://github.com/{}/cinder", username),
            "description": "Ash tooling",
            "language": null,
            "stargazers_count": 12,
            "forks_count": 0,
            "fork": false,
            "updated_at": "2024-05-15T00:00:00Z",
            "private": false
        }
    ])
}

/// Repository updated at midnight UTC on `updated` (`YYYY-MM-DD`)
pub fn repo(name: &str, stars: u32, updated: &str) -> Repository {
    let updated_at = NaiveDate::parse_from_str(updated, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();

    Repository {
        name: name.to_string(),
        description: None,
        language: None,
        stars,
        forks: 0,
        is_fork: false,
        updated_at,
        html_url: format!("https://github.com/octo/{}", name),
        visibility: Visibility::Public,
    }
}

/// Address nothing listens on
pub async fn closed_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
