use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use ai2d_core::game_id::GameId;
use ai2d_core::generated::GeneratedGame;

/// Subdirectory of the static root holding generated scripts.
pub const GAMES_DIR: &str = "games";
/// Subdirectory of the static root holding template documents.
pub const LOGIC_DIR: &str = "game_logic";

/// Failure reading or writing a stored game.
#[derive(Debug)]
pub enum StoreError {
    NotFound,
    InvalidJson(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::InvalidJson(e) => write!(f, "invalid JSON: {e}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e)
        }
    }
}

/// Flat-file store for generated games: one `<id>.json` template document
/// and one `<id>.js` script per game, under the static root so both are also
/// reachable through `/static`.
///
/// Files are never locked or pruned. Two writers for the same id race and
/// the last one wins.
#[derive(Debug, Clone)]
pub struct GameStore {
    games_dir: PathBuf,
    logic_dir: PathBuf,
}

impl GameStore {
    /// Open the store rooted at `static_root`, creating both directories if
    /// they do not exist.
    pub fn open(static_root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = static_root.as_ref();
        let store = Self {
            games_dir: root.join(GAMES_DIR),
            logic_dir: root.join(LOGIC_DIR),
        };
        std::fs::create_dir_all(&store.games_dir)?;
        std::fs::create_dir_all(&store.logic_dir)?;
        Ok(store)
    }

    pub fn script_path(&self, id: &GameId) -> PathBuf {
        self.games_dir.join(format!("{id}.js"))
    }

    pub fn logic_path(&self, id: &GameId) -> PathBuf {
        self.logic_dir.join(format!("{id}.json"))
    }

    /// URL path the template document is served under.
    pub fn public_logic_path(id: &GameId) -> String {
        format!("/static/{LOGIC_DIR}/{id}.json")
    }

    /// URL path the script is served under.
    pub fn public_script_path(id: &GameId) -> String {
        format!("/static/{GAMES_DIR}/{id}.js")
    }

    /// Write the template document, then the script. A failure on the second
    /// write leaves the first in place.
    pub async fn save(&self, game: &GeneratedGame) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&game.template).map_err(StoreError::InvalidJson)?;
        tokio::fs::write(self.logic_path(&game.id), json)
            .await
            .map_err(StoreError::Io)?;
        tokio::fs::write(self.script_path(&game.id), game.script())
            .await
            .map_err(StoreError::Io)?;
        Ok(())
    }

    /// Read and parse a stored template document.
    pub async fn load_logic<T: DeserializeOwned>(&self, id: &GameId) -> Result<T, StoreError> {
        let bytes = tokio::fs::read(self.logic_path(id)).await?;
        serde_json::from_slice(&bytes).map_err(StoreError::InvalidJson)
    }

    pub async fn has_script(&self, id: &GameId) -> bool {
        tokio::fs::try_exists(self.script_path(id))
            .await
            .unwrap_or(false)
    }

    /// Number of stored scripts.
    pub async fn count(&self) -> std::io::Result<usize> {
        let mut entries = tokio::fs::read_dir(&self.games_dir).await?;
        let mut n = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().is_some_and(|ext| ext == "js") {
                n += 1;
            }
        }
        Ok(n)
    }
}
