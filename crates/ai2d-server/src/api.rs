use axum::Form;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::header;
use axum::response::{Html, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use ai2d_core::game_id::GameId;
use ai2d_core::generated::GeneratedGame;
use ai2d_core::template::GameTemplate;

use crate::error::AppError;
use crate::pages::PlayView;
use crate::state::AppState;
use crate::storage::{GameStore, StoreError};

/// Form body for `/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub prompt: String,
}

/// `/generate` body extractor accepting both `application/x-www-form-urlencoded`
/// and `multipart/form-data`. Rejections become JSON `{error}` 400s.
pub struct PromptForm(pub GenerateForm);

impl<S: Send + Sync> FromRequest<S> for PromptForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"));
        if !is_multipart {
            let Form(form) = Form::<GenerateForm>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Self(form));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            if field.name() == Some("prompt") {
                let prompt = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                return Ok(Self(GenerateForm { prompt }));
            }
        }
        Err(AppError::BadRequest("missing field `prompt`".to_string()))
    }
}

/// Response for a successful generation.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub game_id: String,
    pub game_logic: GameTemplate,
    pub json_path: String,
}

fn validate_prompt(prompt: &str, max_len: usize) -> Result<(), AppError> {
    if prompt.trim().is_empty() {
        return Err(AppError::BadRequest("prompt must not be empty".to_string()));
    }
    if prompt.len() > max_len {
        return Err(AppError::BadRequest(format!(
            "prompt exceeds {max_len} bytes"
        )));
    }
    Ok(())
}

/// GET /: prompt entry form.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state
        .pages
        .index()
        .map(Html)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// POST /generate: select a template, emit its script, and store both.
pub async fn generate(
    State(state): State<AppState>,
    PromptForm(form): PromptForm,
) -> Result<Json<GenerateResponse>, AppError> {
    validate_prompt(&form.prompt, state.config.limits.max_prompt_len)?;

    let game = GeneratedGame::from_prompt(&form.prompt);
    if let Err(e) = state.store.save(&game).await {
        tracing::error!(game_id = %game.id, "Failed to store generated game: {e}");
        return Err(AppError::Generation(e.to_string()));
    }

    tracing::info!(
        game_id = %game.id,
        game = %game.template.name,
        payload = game.payload.name(),
        "Generated game"
    );

    Ok(Json(GenerateResponse {
        json_path: GameStore::public_logic_path(&game.id),
        game_id: game.id.to_string(),
        game_logic: game.template,
    }))
}

/// GET /play/{game_id}: player page for a stored game.
pub async fn play(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let not_found = || AppError::NotFound("Game not found".to_string());
    let id: GameId = game_id.parse().map_err(|_| not_found())?;
    if !state.store.has_script(&id).await {
        return Err(not_found());
    }

    let game_logic = match state.store.load_logic::<Value>(&id).await {
        Ok(logic) => Some(logic),
        Err(StoreError::NotFound) => None,
        Err(StoreError::InvalidJson(e)) => {
            tracing::warn!(game_id = %id, "Stored game logic is not valid JSON: {e}");
            Some(serde_json::json!({ "error": "Invalid game logic JSON" }))
        },
        Err(e @ StoreError::Io(_)) => return Err(e.into()),
    };
    let game_logic = game_logic
        .map(|logic| serde_json::to_string_pretty(&logic))
        .transpose()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let view = PlayView {
        json_path: GameStore::public_logic_path(&id),
        script_path: GameStore::public_script_path(&id),
        game_id: id.to_string(),
        game_logic,
    };
    state
        .pages
        .play(&view)
        .map(Html)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// GET /game-logic/{game_id}: the stored template document.
pub async fn game_logic(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let not_found = || AppError::NotFound("Game logic not found".to_string());
    let id: GameId = game_id.parse().map_err(|_| not_found())?;
    match state.store.load_logic::<Value>(&id).await {
        Ok(logic) => Ok(Json(logic)),
        Err(StoreError::NotFound) => Err(not_found()),
        Err(e) => {
            tracing::error!(game_id = %id, "Failed to read game logic: {e}");
            Err(e.into())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use ai2d_core::template::GameKind;

    fn test_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            static_root: dir.path().to_string_lossy().into_owned(),
            ..ServerConfig::default()
        };
        (dir, AppState::new(config).unwrap())
    }

    fn form(prompt: &str) -> PromptForm {
        PromptForm(GenerateForm {
            prompt: prompt.to_string(),
        })
    }

    #[tokio::test]
    async fn generate_writes_both_files() {
        let (_dir, state) = test_state();
        let Json(resp) = generate(State(state.clone()), form("play some Pong"))
            .await
            .unwrap();

        assert_eq!(&resp.game_logic, GameKind::Pong.template());
        assert_eq!(
            resp.json_path,
            format!("/static/game_logic/{}.json", resp.game_id)
        );

        let id: GameId = resp.game_id.parse().unwrap();
        assert!(state.store.has_script(&id).await);
        let stored: GameTemplate = state.store.load_logic(&id).await.unwrap();
        assert_eq!(stored, resp.game_logic);
    }

    #[tokio::test]
    async fn generate_rejects_blank_prompt() {
        let (_dir, state) = test_state();
        let err = generate(State(state), form("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn generate_rejects_oversized_prompt() {
        let (_dir, state) = test_state();
        let err = generate(State(state), form(&"x".repeat(2001)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("2000")));
    }

    #[tokio::test]
    async fn generate_accepts_prompt_at_length_limit() {
        let (_dir, state) = test_state();
        let prompt = "x".repeat(state.config.limits.max_prompt_len);
        let Json(resp) = generate(State(state), form(&prompt)).await.unwrap();
        assert_eq!(resp.game_logic.name, "Tic-Tac-Toe");
    }

    #[tokio::test]
    async fn prompt_form_reads_multipart_field() {
        let body = "--XYZ\r\n\
                    Content-Disposition: form-data; name=\"other\"\r\n\r\n\
                    ignored\r\n\
                    --XYZ\r\n\
                    Content-Disposition: form-data; name=\"prompt\"\r\n\r\n\
                    two player pong\r\n\
                    --XYZ--\r\n";
        let req = axum::http::Request::post("/generate")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XYZ")
            .body(axum::body::Body::from(body))
            .unwrap();
        let PromptForm(form) = PromptForm::from_request(req, &()).await.unwrap();
        assert_eq!(form.prompt, "two player pong");
    }

    #[tokio::test]
    async fn prompt_form_rejections_are_bad_requests() {
        let req = axum::http::Request::post("/generate")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(axum::body::Body::from("other=1"))
            .unwrap();
        let err = PromptForm::from_request(req, &()).await.err().unwrap();
        assert!(matches!(err, AppError::BadRequest(_)));

        let req = axum::http::Request::post("/generate")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XYZ")
            .body(axum::body::Body::from("--XYZ--\r\n"))
            .unwrap();
        let err = PromptForm::from_request(req, &()).await.err().unwrap();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn generate_reports_write_failure_as_generation_error() {
        let (dir, state) = test_state();
        std::fs::remove_dir_all(dir.path().join("game_logic")).unwrap();
        let err = generate(State(state), form("snake")).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[tokio::test]
    async fn play_unknown_game_is_not_found() {
        let (_dir, state) = test_state();
        let id = GameId::from_prompt("nothing here").to_string();
        let err = play(State(state), Path(id)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn play_rejects_malformed_id() {
        let (_dir, state) = test_state();
        let err = play(State(state), Path("..%2F..%2Fetc".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn play_renders_with_corrupt_logic() {
        let (_dir, state) = test_state();
        let Json(resp) = generate(State(state.clone()), form("snake")).await.unwrap();
        let id: GameId = resp.game_id.parse().unwrap();
        std::fs::write(state.store.logic_path(&id), "not json").unwrap();

        let Html(html) = play(State(state), Path(resp.game_id)).await.unwrap();
        assert!(html.contains("Invalid game logic JSON"));
    }

    #[tokio::test]
    async fn play_renders_without_logic() {
        let (_dir, state) = test_state();
        let Json(resp) = generate(State(state.clone()), form("snake")).await.unwrap();
        let id: GameId = resp.game_id.parse().unwrap();
        std::fs::remove_file(state.store.logic_path(&id)).unwrap();

        let Html(html) = play(State(state), Path(resp.game_id)).await.unwrap();
        assert!(!html.contains("game-logic-json"));
    }

    #[tokio::test]
    async fn game_logic_returns_stored_document() {
        let (_dir, state) = test_state();
        let Json(resp) = generate(State(state.clone()), form("breakout")).await.unwrap();
        let Json(logic) = game_logic(State(state), Path(resp.game_id)).await.unwrap();
        assert_eq!(logic["name"], "Breakout");
        assert_eq!(logic["assets"]["bricks"], "multiple rows");
    }

    #[tokio::test]
    async fn game_logic_missing_and_corrupt() {
        let (_dir, state) = test_state();
        let id = GameId::from_prompt("corrupt");

        let err = game_logic(State(state.clone()), Path(id.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Game logic not found"));

        std::fs::write(state.store.logic_path(&id), "{{{").unwrap();
        let err = game_logic(State(state), Path(id.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidJson));
    }
}
