use serde::{Deserialize, Deserializer};

use crate::constants::grid::SLOT_COUNT;

/// a recipe exactly as the model is asked to describe it.
///
/// every key is required and no others are allowed. slot values are preset names or null.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CraftSuggestion {
    #[serde(deserialize_with = "required")]
    pub slot1: Option<String>,
    #[serde(deserialize_with = "required")]
    pub slot2: Option<String>,
    #[serde(deserialize_with = "required")]
    pub slot3: Option<String>,
    #[serde(deserialize_with = "required")]
    pub slot4: Option<String>,
    #[serde(deserialize_with = "required")]
    pub slot5: Option<String>,
    #[serde(deserialize_with = "required")]
    pub slot6: Option<String>,
    #[serde(deserialize_with = "required")]
    pub slot7: Option<String>,
    #[serde(deserialize_with = "required")]
    pub slot8: Option<String>,
    #[serde(deserialize_with = "required")]
    pub slot9: Option<String>,
    pub result: String,
}

// with a custom deserializer serde no longer treats a missing Option as None.
fn required<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

impl CraftSuggestion {
    pub fn slots(&self) -> [Option<&str>; SLOT_COUNT] {
        [
            self.slot1.as_deref(),
            self.slot2.as_deref(),
            self.slot3.as_deref(),
            self.slot4.as_deref(),
            self.slot5.as_deref(),
            self.slot6.as_deref(),
            self.slot7.as_deref(),
            self.slot8.as_deref(),
            self.slot9.as_deref(),
        ]
    }
}

/// a validated recipe ready to be rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Craft {
    pub slots: [Option<String>; SLOT_COUNT],
    pub answer: String,
}
