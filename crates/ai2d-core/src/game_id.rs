use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of digest bytes kept in an id.
const ID_BYTES: usize = 16;

/// Length of the hex form of an id.
pub const ID_LEN: usize = ID_BYTES * 2;

/// Identifier naming the stored artifacts of one generated game.
///
/// Derived from the SHA-256 digest of the prompt, truncated to 128 bits and
/// hex-encoded. Identical prompts produce identical ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameId(String);

impl GameId {
    pub fn from_prompt(prompt: &str) -> Self {
        let digest = Sha256::digest(prompt.as_bytes());
        Self(hex::encode(&digest[..ID_BYTES]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rejected id string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGameId(pub String);

impl fmt::Display for InvalidGameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid game id: {:?}", self.0)
    }
}

impl std::error::Error for InvalidGameId {}

impl FromStr for GameId {
    type Err = InvalidGameId;

    /// Accepts exactly `ID_LEN` lowercase hex digits, so a parsed id is always
    /// safe to use as a file name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == ID_LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidGameId(s.to_string()))
        }
    }
}

impl TryFrom<String> for GameId {
    type Error = InvalidGameId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GameId> for String {
    fn from(id: GameId) -> Self {
        id.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
