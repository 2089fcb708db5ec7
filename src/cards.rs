//! Repository ordering and card view-models.
//!
//! Everything here is pure: the same repositories and [`SortKey`] always give the
//! same card sequence, which is what the page and the JSON API render from.

use crate::models::{Repository, SortKey};
use chrono::{DateTime, Utc};
use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::warn;

pub const NO_DESCRIPTION: &str = "No description provided";
pub const NEUTRAL_COLOR: &str = "#858585";

// Colors from GitHub's linguist palette
const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#3178c6"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("C", "#555555"),
    ("C#", "#178600"),
    ("PHP", "#4F5D95"),
    ("Ruby", "#701516"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Swift", "#ffac45"),
    ("Kotlin", "#A97BFF"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("Shell", "#89e051"),
    ("Vue", "#41b883"),
    ("React", "#61dafb"),
    ("Dart", "#00B4AB"),
    ("Scala", "#c22d40"),
    ("R", "#198CE7"),
    ("Objective-C", "#438eff"),
    ("Perl", "#0298c3"),
    ("Lua", "#000080"),
    ("Haskell", "#5e5086"),
    ("Elixir", "#6e4a7e"),
    ("Clojure", "#db5855"),
    ("Julia", "#a270ba"),
    ("MATLAB", "#e16737"),
];

/// Display color for a language, [`NEUTRAL_COLOR`] when it is not in the table.
pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(NEUTRAL_COLOR)
}

/// Escapes text for use in HTML content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Name order of the repository grid: Unicode collation with the root locale
/// at tertiary strength. Punctuation sorts before digits, digits before letters,
/// and a lowercase letter before its uppercase form.
pub struct NameCollator {
    collator: Option<Collator>,
}

impl NameCollator {
    pub fn new() -> Self {
        match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(collator) => Self {
                collator: Some(collator),
            },
            Err(e) => {
                warn!(error = %e, "Root collation data unavailable, sorting names by code point");
                Self { collator: None }
            }
        }
    }

    /// Total order: names the collator ranks equal fall back to code points.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b).then_with(|| a.cmp(b)),
            None => a.cmp(b),
        }
    }
}

impl Default for NameCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off comparison. Sorting builds a single [`NameCollator`] instead.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    NameCollator::new().compare(a, b)
}

/// Orders repositories by `key`. Ties keep their input order.
pub fn sort_repositories(repos: &[Repository], key: SortKey) -> Vec<&Repository> {
    let mut sorted: Vec<&Repository> = repos.iter().collect();
    match key {
        SortKey::Stars => sorted.sort_by(|a, b| b.stars.cmp(&a.stars)),
        SortKey::Name => {
            let collator = NameCollator::new();
            sorted.sort_by(|a, b| collator.compare(&a.name, &b.name));
        }
        SortKey::Updated => sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
    }
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageBadge {
    pub name: String,
    pub color: String,
}

/// Card view-model. Text fields are already HTML-escaped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoCard {
    pub name: String,
    pub url: String,
    pub description: String,
    pub description_is_placeholder: bool,
    pub language: Option<LanguageBadge>,
    pub stars: u32,
    pub forks: u32,
    pub is_fork: bool,
    pub visibility: String,
    pub updated_at: DateTime<Utc>,
}

pub fn to_card(repo: &Repository) -> RepoCard {
    let (description, description_is_placeholder) = match &repo.description {
        Some(text) => (escape_html(text), false),
        None => (NO_DESCRIPTION.to_string(), true),
    };

    RepoCard {
        name: escape_html(&repo.name),
        url: escape_html(&repo.html_url),
        description,
        description_is_placeholder,
        language: repo.language.as_deref().map(|language| LanguageBadge {
            name: escape_html(language),
            color: language_color(language).to_string(),
        }),
        stars: repo.stars,
        forks: repo.forks,
        is_fork: repo.is_fork,
        visibility: repo.visibility.label().to_string(),
        updated_at: repo.updated_at,
    }
}

pub fn render_cards(repos: &[Repository], key: SortKey) -> Vec<RepoCard> {
    sort_repositories(repos, key).into_iter().map(to_card).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn known_and_unknown_language_colors() {
        assert_eq!(language_color("Rust"), "#dea584");
        assert_eq!(language_color("C"), "#555555");
        assert_eq!(language_color("Zig"), NEUTRAL_COLOR);
        // Lookup is exact, like the palette keys
        assert_eq!(language_color("rust"), NEUTRAL_COLOR);
    }

    #[test]
    fn name_order_follows_root_collation() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("my_tool", "my-tool"), Ordering::Less);
        assert_eq!(compare_names("my-tool", "my2"), Ordering::Less);
        assert_eq!(compare_names("my2", "myb"), Ordering::Less);
        assert_eq!(compare_names("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("ab", "a"), Ordering::Greater);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }
}
