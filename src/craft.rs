//! asks gemini for a random, real minecraft recipe built from the known presets.

use std::sync::LazyLock;

use fancy_regex::Regex;

use crate::{
    constants::{grid::SLOT_COUNT, GEMINI_API_BASE},
    models::{
        craft::{Craft, CraftSuggestion},
        gemini::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part},
    },
    presets::{is_empty_slot, PresetTable},
};

const API_KEY_HEADER: &str = "x-goog-api-key";

static CODE_FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n(.*?)\n?\s*```\s*$").unwrap()
});

#[derive(Debug, thiserror::Error)]
pub enum CraftError {
    #[error("no presets are available to build a recipe from")]
    NoPresets,
    /// carries no url, the request used to hold the api key.
    #[error("request to gemini failed: {0}")]
    Request(reqwest::Error),
    #[error("gemini answered with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("gemini returned no text")]
    EmptyResponse,
    #[error("recipe doesn't match the expected schema: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("recipe has no result name")]
    EmptyResult,
    #[error("recipe doesn't use any slot")]
    EmptyGrid,
    #[error("slot {slot} uses unknown item \"{name}\"")]
    UnknownPreset { slot: usize, name: String },
}

#[derive(Clone)]
pub struct CraftGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl CraftGenerator {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[tracing::instrument(skip_all, fields(model = %self.model))]
    pub async fn generate(&self, presets: &PresetTable) -> Result<Craft, CraftError> {
        if presets.is_empty() {
            return Err(CraftError::NoPresets);
        }

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(build_prompt(presets)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let resp = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(request_error)
            .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when sending gemini request"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "gemini returned an error status");
            return Err(CraftError::Status { status, body });
        }

        let resp: GenerateContentResponse = resp
            .json()
            .await
            .map_err(request_error)
            .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when decoding gemini response"))?;

        let text = resp.first_text().ok_or(CraftError::EmptyResponse)?;

        parse_craft(text, presets).inspect_err(
            |e| tracing::error!(err = ?e, text = %text, "gemini returned an unusable recipe"),
        )
    }
}

fn request_error(e: reqwest::Error) -> CraftError {
    CraftError::Request(e.without_url())
}

pub fn build_prompt(presets: &PresetTable) -> String {
    let items = presets.names().collect::<Vec<_>>().join(", ");

    format!(
        r#"Tu es un expert Minecraft. Génère UN craft réaliste et jouable de Minecraft.

Items disponibles : {items}

RÈGLES STRICTES :
- La grille de craft fait 3x3, soit 9 slots numérotés de 1 à 9
- Slots 1, 2, 3 = ligne du haut
- Slots 4, 5, 6 = ligne du milieu
- Slots 7, 8, 9 = ligne du bas
- Utilise UNIQUEMENT les items de la liste ci-dessus, écrits exactement comme dans la liste
- Le craft DOIT exister dans Minecraft (rien d'inventé)
- Varie les crafts : outils, armes, blocs, nourriture, redstone, etc.

Réponds UNIQUEMENT avec un objet JSON contenant exactement ces clés, sans aucune autre :
{{
  "slot1": "nom_item ou null",
  "slot2": "nom_item ou null",
  "slot3": "nom_item ou null",
  "slot4": "nom_item ou null",
  "slot5": "nom_item ou null",
  "slot6": "nom_item ou null",
  "slot7": "nom_item ou null",
  "slot8": "nom_item ou null",
  "slot9": "nom_item ou null",
  "result": "Nom de l'item crafté en français"
}}

Exemple pour une épée en diamant :
{{
  "slot1": null,
  "slot2": "diamant",
  "slot3": null,
  "slot4": null,
  "slot5": "diamant",
  "slot6": null,
  "slot7": null,
  "slot8": "baton",
  "slot9": null,
  "result": "Épée en diamant"
}}"#
    )
}

/// validates a model answer into a [`Craft`].
///
/// the text must be exactly one JSON object (optionally wrapped in a markdown code fence)
/// matching [`CraftSuggestion`], and every filled slot must name a known preset.
pub fn parse_craft(text: &str, presets: &PresetTable) -> Result<Craft, CraftError> {
    let json = strip_code_fence(text);
    let suggestion: CraftSuggestion = serde_json::from_str(json)?;

    let answer = suggestion.result.trim();
    if answer.is_empty() {
        return Err(CraftError::EmptyResult);
    }

    let mut slots: [Option<String>; SLOT_COUNT] = Default::default();
    for (idx, value) in suggestion.slots().into_iter().enumerate() {
        let Some(name) = value.map(str::trim).filter(|v| !is_empty_slot(v)) else {
            continue;
        };

        if !presets.contains(name) {
            return Err(CraftError::UnknownPreset {
                slot: idx + 1,
                name: name.to_string(),
            });
        }

        slots[idx] = Some(name.to_lowercase());
    }

    if slots.iter().all(Option::is_none) {
        return Err(CraftError::EmptyGrid);
    }

    Ok(Craft {
        slots,
        answer: answer.to_string(),
    })
}

fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE_REGEX.captures(text) {
        Ok(Some(captures)) => captures.get(1).map_or(text, |m| m.as_str()),
        _ => text,
    }
}
