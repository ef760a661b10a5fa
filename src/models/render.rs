use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateRequest {
    /// one entry per slot; `None` leaves the slot empty. must hold exactly nine entries.
    #[serde(default)]
    pub items: Option<Vec<Option<String>>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateResponse {
    /// path of the rendered image, relative to the render service.
    pub url: String,
}
