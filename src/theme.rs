use crate::error::{PortfolioError, Result};
use crate::models::Theme;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Theme used when neither a saved nor a system preference exists
pub const DEFAULT_THEME: Theme = Theme::Light;

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

/// Stores the single theme preference as a small JSON file.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Saved preference, `None` if nothing has been saved yet.
    pub async fn load(&self) -> Result<Option<Theme>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved theme preference");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let file: ThemeFile = serde_json::from_str(&contents).map_err(|e| {
            PortfolioError::InvalidTheme(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(Some(file.theme))
    }

    pub async fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string(&ThemeFile { theme })?;
        tokio::fs::write(&self.path, contents).await?;
        info!(path = %self.path.display(), %theme, "Saved theme preference");
        Ok(())
    }

    /// Theme in effect given the system preference.
    pub async fn current(&self, system: Option<Theme>) -> Result<Theme> {
        Ok(resolve(self.load().await?, system))
    }

    /// Flips the theme in effect and saves the result as the preference.
    pub async fn toggle(&self, system: Option<Theme>) -> Result<Theme> {
        let next = self.current(system).await?.toggled();
        self.save(next).await?;
        Ok(next)
    }
}

/// Saved preference wins, then the system preference, then [`DEFAULT_THEME`].
pub fn resolve(saved: Option<Theme>, system: Option<Theme>) -> Theme {
    saved.or(system).unwrap_or(DEFAULT_THEME)
}
