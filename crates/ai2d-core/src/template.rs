use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// The closed set of games the generator knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    TicTacToe,
    Snake,
    Pong,
    Breakout,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::TicTacToe,
        GameKind::Snake,
        GameKind::Pong,
        GameKind::Breakout,
    ];

    /// Short key the template is stored under.
    pub fn key(self) -> &'static str {
        match self {
            Self::TicTacToe => "tic",
            Self::Snake => "snake",
            Self::Pong => "pong",
            Self::Breakout => "breakout",
        }
    }

    /// Look up a kind by its template key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// The catalog template for this kind.
    pub fn template(self) -> &'static GameTemplate {
        let catalog = &*CATALOG;
        match self {
            Self::TicTacToe => &catalog[0],
            Self::Snake => &catalog[1],
            Self::Pong => &catalog[2],
            Self::Breakout => &catalog[3],
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn default_game_type() -> String {
    "continuous".to_string()
}

/// JSON description of a game: a category tag, a display name, a
/// description, and free-form nested configuration (rules, controls, assets).
///
/// Only the three fields the emitter dispatches on are typed. Everything else
/// round-trips untouched through `extra`, so a template read back from disk
/// serializes to the same document that was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameTemplate {
    #[serde(rename = "gameType", default = "default_game_type")]
    pub game_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameTemplate {
    /// Build a template from a JSON object literal. Non-object values yield a
    /// template with every field defaulted.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|_| Self {
            game_type: default_game_type(),
            name: String::new(),
            description: String::new(),
            extra: Map::new(),
        })
    }

    /// Serialize to a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Catalog in `GameKind::ALL` order.
static CATALOG: LazyLock<[GameTemplate; 4]> = LazyLock::new(|| {
    [
        GameTemplate::from_value(json!({
            "gameType": "turnBased",
            "name": "Tic-Tac-Toe",
            "description": "Classic Tic-Tac-Toe game for two players",
            "board": { "size": 3, "cells": 9 },
            "players": { "count": 2, "symbols": ["X", "O"] },
            "rules": {
                "winCondition": "3 in a row (horizontal, vertical, or diagonal)",
                "drawCondition": "All cells filled with no winner"
            },
            "assets": { "background": "plain", "markers": ["X", "O"] }
        })),
        GameTemplate::from_value(json!({
            "gameType": "continuous",
            "name": "Snake",
            "description": "Classic snake game where you collect food and grow longer",
            "controls": { "type": "directional", "keys": ["UP", "DOWN", "LEFT", "RIGHT"] },
            "rules": {
                "winCondition": "Score as many points as possible",
                "loseCondition": "Hit walls or your own tail"
            },
            "assets": { "background": "plain", "player": "snake", "collectibles": ["food"] }
        })),
        GameTemplate::from_value(json!({
            "gameType": "realtime",
            "name": "Pong",
            "description": "Two-player paddle game where you hit a ball back and forth",
            "controls": { "type": "vertical", "player1": ["W", "S"], "player2": ["UP", "DOWN"] },
            "rules": {
                "winCondition": "First player to reach 11 points",
                "scoreCondition": "When opponent misses the ball"
            },
            "assets": { "background": "plain", "paddles": 2, "ball": 1 }
        })),
        GameTemplate::from_value(json!({
            "gameType": "continuous",
            "name": "Breakout",
            "description": "Destroy bricks by bouncing a ball off a paddle",
            "controls": { "type": "horizontal", "keys": ["LEFT", "RIGHT"] },
            "rules": {
                "winCondition": "Destroy all bricks",
                "loseCondition": "Ball falls below paddle"
            },
            "assets": { "background": "plain", "paddle": 1, "ball": 1, "bricks": "multiple rows" }
        })),
    ]
});
