use crate::cards::{render_cards, RepoCard};
use crate::models::{Profile, Repository, SortKey};
use serde::{Deserialize, Serialize};

/// Status of the repository grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum PanelState {
    Loading,
    Ready,
    Failed(String),
}

/// Which of the three repository blocks are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelVisibility {
    pub loading: bool,
    pub error: bool,
    pub grid: bool,
}

/// Everything the page renders from. Handlers share one instance behind a lock.
#[derive(Debug, Clone)]
pub struct PortfolioView {
    repositories: Vec<Repository>,
    sort_key: SortKey,
    repo_panel: PanelState,
    profile: Option<Profile>,
}

impl Default for PortfolioView {
    fn default() -> Self {
        Self::new(SortKey::default())
    }
}

impl PortfolioView {
    pub fn new(sort_key: SortKey) -> Self {
        Self {
            repositories: Vec::new(),
            sort_key,
            repo_panel: PanelState::Loading,
            profile: None,
        }
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    pub fn repo_panel(&self) -> &PanelState {
        &self.repo_panel
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    pub fn begin_loading(&mut self) {
        self.repo_panel = PanelState::Loading;
    }

    /// Swaps in a freshly fetched list. The old list is dropped, never merged.
    pub fn replace_repositories(&mut self, repositories: Vec<Repository>) {
        self.repositories = repositories;
        self.repo_panel = PanelState::Ready;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.repo_panel = PanelState::Failed(message.into());
    }

    pub fn visibility(&self) -> PanelVisibility {
        match self.repo_panel {
            PanelState::Loading => PanelVisibility {
                loading: true,
                error: false,
                grid: false,
            },
            PanelState::Ready => PanelVisibility {
                loading: false,
                error: false,
                grid: true,
            },
            PanelState::Failed(_) => PanelVisibility {
                loading: false,
                error: true,
                grid: false,
            },
        }
    }

    /// Cards in display order. Empty unless the grid is visible.
    pub fn cards(&self) -> Vec<RepoCard> {
        match self.repo_panel {
            PanelState::Ready => render_cards(&self.repositories, self.sort_key),
            _ => Vec::new(),
        }
    }
}
