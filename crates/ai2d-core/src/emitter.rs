use serde::Serialize;

use crate::template::GameTemplate;

/// The fixed Phaser.js scripts the generator can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptPayload {
    TicTacToe,
    Snake,
    Pong,
    Breakout,
    /// Generic collect-the-items game for templates no other payload claims.
    Collector,
}

impl ScriptPayload {
    /// Dispatch on the template's category tag and display name.
    pub fn for_template(template: &GameTemplate) -> Self {
        let name = template.name.as_str();
        match template.game_type.as_str() {
            "turnBased" if name == "Tic-Tac-Toe" => Self::TicTacToe,
            "continuous" if name.contains("Snake") => Self::Snake,
            "realtime" if name.contains("Pong") => Self::Pong,
            "continuous" if name.contains("Breakout") => Self::Breakout,
            _ => Self::Collector,
        }
    }

    /// Script source text.
    pub fn source(self) -> &'static str {
        match self {
            Self::TicTacToe => include_str!("../assets/scripts/tic_tac_toe.js"),
            Self::Snake => include_str!("../assets/scripts/snake.js"),
            Self::Pong => include_str!("../assets/scripts/pong.js"),
            Self::Breakout => include_str!("../assets/scripts/breakout.js"),
            Self::Collector => include_str!("../assets/scripts/collector.js"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TicTacToe => "tic_tac_toe",
            Self::Snake => "snake",
            Self::Pong => "pong",
            Self::Breakout => "breakout",
            Self::Collector => "collector",
        }
    }
}

/// Emit the script for a template.
pub fn emit(template: &GameTemplate) -> &'static str {
    ScriptPayload::for_template(template).source()
}
