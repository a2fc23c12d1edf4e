pub mod emitter;
pub mod game_id;
pub mod generated;
pub mod selector;
pub mod template;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use serde_json::json;

    use crate::template::GameTemplate;

    /// Build a template with the given category tag and display name and no
    /// nested configuration.
    pub fn make_template(game_type: &str, name: &str) -> GameTemplate {
        GameTemplate::from_value(json!({
            "gameType": game_type,
            "name": name,
            "description": format!("Test template {name}"),
        }))
    }

    /// One prompt per catalog kind, in catalog order.
    pub const SAMPLE_PROMPTS: [&str; 4] = [
        "Create a simple tic-tac-toe game",
        "Make a snake game with food",
        "Two player pong",
        "Breakout with lots of bricks",
    ];
}
