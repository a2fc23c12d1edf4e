use crate::template::{GameKind, GameTemplate};

/// Keyword groups in check order. The first group with any keyword contained
/// in the lowercased prompt decides the game.
pub const KEYWORD_GROUPS: &[(GameKind, &[&str])] = &[
    (GameKind::TicTacToe, &["tic", "tac", "toe"]),
    (GameKind::Snake, &["snake"]),
    (GameKind::Pong, &["pong", "paddle"]),
    (GameKind::Breakout, &["breakout", "brick", "arkanoid"]),
];

/// Kind used when no keyword group matches.
pub const DEFAULT_KIND: GameKind = GameKind::TicTacToe;

/// Map a free-text prompt to a game kind. Total over all inputs.
pub fn select_kind(prompt: &str) -> GameKind {
    let lower = prompt.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map_or(DEFAULT_KIND, |(kind, _)| *kind)
}

/// Map a free-text prompt to its catalog template.
pub fn select_template(prompt: &str) -> &'static GameTemplate {
    let kind = select_kind(prompt);
    tracing::debug!(template = kind.key(), prompt_len = prompt.len(), "Selected template");
    kind.template()
}
