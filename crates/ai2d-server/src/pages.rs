use serde::Serialize;
use tera::{Context, Tera};

/// Phaser build the play page loads the generated script against.
pub const PHASER_CDN: &str = "https://cdn.jsdelivr.net/npm/phaser@3.60.0/dist/phaser.min.js";

/// Values rendered into the play page.
#[derive(Debug, Serialize)]
pub struct PlayView {
    pub game_id: String,
    /// Pretty-printed template document, if one is stored.
    pub game_logic: Option<String>,
    pub json_path: String,
    pub script_path: String,
}

/// HTML pages, compiled into the binary. Rendering autoescapes.
pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("index.html", include_str!("../templates/index.html")),
            ("play.html", include_str!("../templates/play.html")),
        ])?;
        Ok(Self { tera })
    }

    /// Prompt entry form.
    pub fn index(&self) -> Result<String, tera::Error> {
        self.tera.render("index.html", &Context::new())
    }

    pub fn play(&self, view: &PlayView) -> Result<String, tera::Error> {
        let mut context = Context::from_serialize(view)?;
        context.insert("phaser_src", PHASER_CDN);
        self.tera.render("play.html", &context)
    }
}
