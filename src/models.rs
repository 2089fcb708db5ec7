use crate::types::{GitHubRepo, GitHubUser};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Repository as shown on the portfolio. Never edited after it is fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u32,
    pub forks: u32,
    pub is_fork: bool,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
    pub visibility: Visibility,
}

impl From<GitHubRepo> for Repository {
    fn from(repo: GitHubRepo) -> Self {
        let visibility = match repo.visibility.as_deref() {
            Some("private") | Some("internal") => Visibility::Private,
            Some(_) => Visibility::Public,
            None if repo.private => Visibility::Private,
            None => Visibility::Public,
        };

        Repository {
            name: repo.name,
            description: repo.description,
            language: repo.language,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            is_fork: repo.fork,
            updated_at: repo.updated_at,
            html_url: repo.html_url,
            visibility,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn label(&self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Private => "Private",
        }
    }
}

/// Account holder profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: String,
    pub public_repos: u32,
    pub followers: u32,
    pub following: u32,
    pub html_url: String,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.login)
    }
}

impl From<GitHubUser> for Profile {
    fn from(user: GitHubUser) -> Self {
        Profile {
            login: user.login,
            name: user.name,
            bio: user.bio,
            avatar_url: user.avatar_url,
            public_repos: user.public_repos,
            followers: user.followers,
            following: user.following,
            html_url: user.html_url,
        }
    }
}

/// Ordering criterion for the repository grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Updated,
    Stars,
    Name,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Updated, SortKey::Stars, SortKey::Name];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Updated => "updated",
            SortKey::Stars => "stars",
            SortKey::Name => "name",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Updated => "Recently Updated",
            SortKey::Stars => "Most Stars",
            SortKey::Name => "Name",
        }
    }
}

/// Unknown values behave like `updated`.
impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "stars" => SortKey::Stars,
            "name" => SortKey::Name,
            _ => SortKey::Updated,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Icon of the toggle control, showing the theme it switches to.
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rate limit state reported by the last API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: DateTime<Utc>,
    pub is_limited: bool,
}
