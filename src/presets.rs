use std::{collections::BTreeMap, path::Path};

use crate::constants::EMPTY_SLOT_TOKEN;

#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("failed to access preset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("preset file is not a JSON object of name -> url: {0}")]
    Json(#[from] serde_json::Error),
}

/// named shortcuts for item icon urls, keyed by lowercase name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresetTable {
    presets: BTreeMap<String, String>,
}

impl PresetTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            presets: entries
                .into_iter()
                .map(|(name, url)| (name.as_ref().to_lowercase(), url.into()))
                .collect(),
        }
    }

    pub fn samples() -> Self {
        Self::new([
            (
                "diamant",
                "https://minecraft.wiki/images/Diamond_JE3_BE3.png?99d00",
            ),
            ("baton", "https://minecraft.wiki/images/Stick_JE1_BE1.png?1fc15"),
        ])
    }

    /// reads the preset file, writing the sample table to it first if it doesn't exist.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load_or_create(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();

        if !tokio::fs::try_exists(path).await? {
            tracing::warn!("preset file not found, creating it with sample presets...");

            let samples = Self::samples();
            let content = serde_json::to_string_pretty(&samples.presets)?;
            tokio::fs::write(path, content).await.inspect_err(
                |e| tracing::error!(err = ?e, "an error occurred when writing preset file"),
            )?;
        }

        let content = tokio::fs::read_to_string(path).await.inspect_err(
            |e| tracing::error!(err = ?e, "an error occurred when reading preset file"),
        )?;
        let raw: BTreeMap<String, String> = serde_json::from_str(&content).inspect_err(
            |e| tracing::error!(err = ?e, "an error occurred when parsing preset file"),
        )?;

        let table = Self::new(raw);
        tracing::info!(count = table.len(), "loaded presets");

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.presets.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(&name.to_lowercase())
    }

    /// preset names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// turns a raw slot value into what the renderer should load.
    ///
    /// absent, blank and `null` values are empty slots; known preset names map to their
    /// url; anything else is passed through as a literal url or path.
    pub fn resolve(&self, value: Option<&str>) -> Option<String> {
        let value = value.map(str::trim).filter(|v| !is_empty_slot(v))?;

        Some(
            self.get(value)
                .map(str::to_owned)
                .unwrap_or_else(|| value.to_owned()),
        )
    }
}

pub fn is_empty_slot(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(EMPTY_SLOT_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_presets_case_insensitively() {
        let table = PresetTable::samples();

        assert_eq!(
            table.resolve(Some("Diamant")).as_deref(),
            table.get("diamant")
        );
        assert_eq!(
            table.resolve(Some(" baton ")).as_deref(),
            Some("https://minecraft.wiki/images/Stick_JE1_BE1.png?1fc15")
        );
    }

    #[test]
    fn unknown_names_are_literal() {
        let table = PresetTable::samples();

        assert_eq!(
            table.resolve(Some("https://example.com/gold.png")).as_deref(),
            Some("https://example.com/gold.png")
        );
        assert_eq!(
            table.resolve(Some("icons/iron.png")).as_deref(),
            Some("icons/iron.png")
        );
    }

    #[test]
    fn empty_tokens_resolve_to_nothing() {
        let table = PresetTable::samples();

        assert_eq!(table.resolve(None), None);
        assert_eq!(table.resolve(Some("")), None);
        assert_eq!(table.resolve(Some("null")), None);
        assert_eq!(table.resolve(Some("NULL")), None);
    }

    #[test]
    fn empty_table_passes_everything_through() {
        let table = PresetTable::default();

        assert_eq!(table.resolve(Some("diamant")).as_deref(), Some("diamant"));
    }

    #[tokio::test]
    async fn creates_missing_file_with_samples() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("presets.json");

        let table = PresetTable::load_or_create(&path).await.unwrap();

        assert_eq!(table, PresetTable::samples());
        assert!(path.exists());

        let reloaded = PresetTable::load_or_create(&path).await.unwrap();
        assert_eq!(reloaded, table);
    }

    #[tokio::test]
    async fn loads_existing_file_and_lowercases_keys() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("presets.json");
        tokio::fs::write(&path, r#"{ "Lingot_Fer": "https://example.com/iron.png" }"#)
            .await
            .unwrap();

        let table = PresetTable::load_or_create(&path).await.unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["lingot_fer"]);
    }

    #[tokio::test]
    async fn rejects_malformed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("presets.json");
        tokio::fs::write(&path, r#"["diamant"]"#).await.unwrap();

        let result = PresetTable::load_or_create(&path).await;

        assert!(matches!(result, Err(PresetError::Json(_))));
    }
}
