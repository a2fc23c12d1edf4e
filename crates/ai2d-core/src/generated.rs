use crate::emitter::ScriptPayload;
use crate::game_id::GameId;
use crate::selector::select_template;
use crate::template::GameTemplate;

/// A game produced for one prompt: its id, the selected template, and the
/// script the template emits.
#[derive(Debug, Clone)]
pub struct GeneratedGame {
    pub id: GameId,
    pub template: GameTemplate,
    pub payload: ScriptPayload,
}

impl GeneratedGame {
    /// Select, identify, and emit in one step.
    pub fn from_prompt(prompt: &str) -> Self {
        let template = select_template(prompt).clone();
        let payload = ScriptPayload::for_template(&template);
        Self {
            id: GameId::from_prompt(prompt),
            template,
            payload,
        }
    }

    pub fn script(&self) -> &'static str {
        self.payload.source()
    }
}
