use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use zenoh_leaderboard::Username;

/// Player identity kept between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: Username,
}

impl Profile {
    pub fn new(username: Username) -> Self {
        Self { username }
    }

    /// `$XDG_CONFIG_HOME/z_tetris/profile.json`, or `~/.config/...`
    pub fn default_path() -> Option<PathBuf> {
        let base = match std::env::var_os("XDG_CONFIG_HOME") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
        };
        Some(base.join("z_tetris").join("profile.json"))
    }

    /// Read a saved profile; `Ok(None)` when there is none yet
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        let profile = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse profile {}", path.display()))?;
        Ok(Some(profile))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write profile {}", path.display()))?;
        Ok(())
    }
}

/// Username from the first-run prompt; an empty answer means the default
pub fn username_from_answer(answer: &str) -> zenoh_leaderboard::Result<Username> {
    if answer.trim().is_empty() {
        Ok(Username::default())
    } else {
        Username::new(answer)
    }
}
