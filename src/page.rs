use crate::cards::{escape_html, RepoCard};
use crate::models::{Profile, SortKey, Theme};
use crate::view::{PanelState, PanelVisibility, PortfolioView};
use chrono::{Datelike, Utc};

/// Inputs of one page render
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub username: &'a str,
    pub theme: Theme,
    pub sort_key: SortKey,
    pub profile: Option<&'a Profile>,
    pub visibility: PanelVisibility,
    pub cards: &'a [RepoCard],
    pub error: Option<&'a str>,
    pub year: i32,
}

impl<'a> PageContext<'a> {
    pub fn from_view(
        view: &'a PortfolioView,
        cards: &'a [RepoCard],
        username: &'a str,
        theme: Theme,
    ) -> Self {
        let error = match view.repo_panel() {
            PanelState::Failed(message) => Some(message.as_str()),
            _ => None,
        };

        Self {
            username,
            theme,
            sort_key: view.sort_key(),
            profile: view.profile(),
            visibility: view.visibility(),
            cards,
            error,
            year: Utc::now().year(),
        }
    }
}

fn display(visible: bool, shown: &str) -> String {
    if visible {
        format!("display: {}", shown)
    } else {
        "display: none".to_string()
    }
}

/// Repaint period of the background rain
pub const MATRIX_INTERVAL_MS: u32 = 35;
pub const MATRIX_FONT_SIZE: u32 = 14;
pub const MATRIX_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%^&*()_+-=[]{}|;:,.<>?\
アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン";

/// Glyph color of the background rain for a theme
pub fn matrix_color(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "#88cc88",
        Theme::Dark => "#00ff41",
    }
}

// Placeholders are filled by `render_matrix_script`
const MATRIX_SCRIPT: &str = r#"<script>
(function () {
  const canvas = document.getElementById('matrixCanvas');
  const ctx = canvas.getContext('2d');
  const chars = Array.from(__CHARS__);
  const fontSize = __FONT_SIZE__;
  let drops = [];

  function resize() {
    canvas.width = window.innerWidth;
    canvas.height = window.innerHeight;
    const columns = Math.floor(canvas.width / fontSize);
    while (drops.length < columns) {
      drops.push(Math.random() * -100);
    }
    drops.length = columns;
  }

  function draw() {
    ctx.fillStyle = 'rgba(0, 0, 0, 0.05)';
    ctx.fillRect(0, 0, canvas.width, canvas.height);
    const theme = document.documentElement.getAttribute('data-theme');
    ctx.fillStyle = theme === 'light' ? '__LIGHT__' : '__DARK__';
    ctx.font = fontSize + 'px monospace';
    for (let i = 0; i < drops.length; i++) {
      const char = chars[Math.floor(Math.random() * chars.length)];
      const y = drops[i] * fontSize;
      ctx.fillText(char, i * fontSize, y);
      if (y > canvas.height && Math.random() > 0.975) {
        drops[i] = 0;
      }
      drops[i]++;
    }
  }

  resize();
  window.addEventListener('resize', resize);
  setInterval(draw, __INTERVAL__);
})();
</script>
"#;

/// Inline script driving the decorative canvas. Independent of fetch state.
pub fn render_matrix_script() -> String {
    // JSON string literals are valid JavaScript string literals
    let chars = serde_json::Value::from(MATRIX_CHARS)
        .to_string()
        .replace("</", "<\\/");

    MATRIX_SCRIPT
        .replace("__CHARS__", &chars)
        .replace("__FONT_SIZE__", &MATRIX_FONT_SIZE.to_string())
        .replace("__LIGHT__", matrix_color(Theme::Light))
        .replace("__DARK__", matrix_color(Theme::Dark))
        .replace("__INTERVAL__", &MATRIX_INTERVAL_MS.to_string())
}

fn render_profile(username: &str, profile: Option<&Profile>) -> String {
    let count = |value: Option<u32>| {
        value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let fallback_url = format!("https://github.com/{}", username);

    let name = profile.map(Profile::display_name).unwrap_or(username);
    let bio = profile.and_then(|p| p.bio.as_deref()).unwrap_or("");
    let avatar = profile.map(|p| p.avatar_url.as_str()).unwrap_or("");
    let link = profile.map(|p| p.html_url.as_str()).unwrap_or(&fallback_url);

    format!(
        r#"<section class="profile">
  <img id="profileAvatar" class="profile-avatar" src="{avatar}" alt="{name}">
  <h1 class="profile-name">{name}</h1>
  <p class="profile-bio">{bio}</p>
  <div class="profile-stats">
    <span><strong id="repoCount">{repos}</strong> repositories</span>
    <span><strong id="followerCount">{followers}</strong> followers</span>
    <span><strong id="followingCount">{following}</strong> following</span>
  </div>
  <a id="profileLink" href="{link}" target="_blank" rel="noopener noreferrer">View on GitHub</a>
</section>
"#,
        avatar = escape_html(avatar),
        name = escape_html(name),
        bio = escape_html(bio),
        repos = count(profile.map(|p| p.public_repos)),
        followers = count(profile.map(|p| p.followers)),
        following = count(profile.map(|p| p.following)),
        link = escape_html(link),
    )
}

fn render_sort_select(active: SortKey) -> String {
    let mut html = String::from(r#"<form method="get" action="/"><select id="sortSelect" name="sort" onchange="this.form.submit()">"#);
    for key in SortKey::ALL {
        let selected = if key == active { " selected" } else { "" };
        html.push_str(&format!(r#"<option value="{}"{}>{}</option>"#, key, selected, key.label()));
    }
    html.push_str("</select></form>\n");
    html
}

/// Card markup. Card fields are escaped already and go in as is.
pub fn render_card(card: &RepoCard) -> String {
    let description_class = if card.description_is_placeholder {
        r#"class="repo-description placeholder""#
    } else {
        r#"class="repo-description""#
    };
    let language = card
        .language
        .as_ref()
        .map(|badge| {
            format!(
                r#"<div class="repo-language"><span class="language-color" style="background-color: {}"></span><span>{}</span></div>"#,
                badge.color, badge.name
            )
        })
        .unwrap_or_default();
    let fork = if card.is_fork {
        r#"<span class="repo-meta-item" title="Forked repository">🔄 Fork</span>"#
    } else {
        ""
    };

    format!(
        r#"<div class="repo-card">
  <div class="repo-header">
    <span class="repo-icon">📦</span>
    <div class="repo-title">
      <a href="{url}" target="_blank" rel="noopener noreferrer" class="repo-name">{name}</a>
      <span class="repo-visibility">{visibility}</span>
    </div>
  </div>
  <p {description_class}>{description}</p>
  <div class="repo-meta">
    {language}
    <div class="repo-stats">
      <div class="stat-item" title="Stars">⭐ {stars}</div>
      <div class="stat-item" title="Forks">🔱 {forks}</div>
    </div>
    {fork}
  </div>
</div>
"#,
        url = card.url,
        name = card.name,
        visibility = card.visibility,
        description = card.description,
        stars = card.stars,
        forks = card.forks,
    )
}

pub fn render_page(ctx: &PageContext<'_>) -> String {
    let grid: String = ctx.cards.iter().map(render_card).collect();
    let error = ctx.error.map(escape_html).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en" data-theme="{theme}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Portfolio</title>
</head>
<body>
<canvas id="matrixCanvas" aria-hidden="true"></canvas>
<header>
  <form method="post" action="/theme/toggle"><button id="themeToggle" type="submit"><span class="theme-icon">{icon}</span></button></form>
</header>
<main>
{profile}<section class="repositories">
{select}<div id="loadingState" style="{loading}">Loading repositories...</div>
<div id="errorState" style="{error_display}">Failed to load repositories. {error}</div>
<div id="repoGrid" style="{grid_display}">
{grid}</div>
</section>
</main>
<footer>&copy; <span id="currentYear">{year}</span> <span id="footerName">{title}</span></footer>
{matrix}</body>
</html>
"#,
        theme = ctx.theme,
        title = escape_html(ctx.profile.map(Profile::display_name).unwrap_or(ctx.username)),
        icon = ctx.theme.icon(),
        profile = render_profile(ctx.username, ctx.profile),
        select = render_sort_select(ctx.sort_key),
        loading = display(ctx.visibility.loading, "block"),
        error_display = display(ctx.visibility.error, "block"),
        error = error,
        grid_display = display(ctx.visibility.grid, "grid"),
        grid = grid,
        year = ctx.year,
        matrix = render_matrix_script(),
    )
}
