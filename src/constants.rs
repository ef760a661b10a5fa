use std::sync::LazyLock;

pub mod embeds;
pub mod grid;
pub mod version;

pub static POISE_VERSION: &str = "0.6.1";
pub static STARTUP_TIME: LazyLock<std::time::SystemTime> =
    LazyLock::new(std::time::SystemTime::now);

pub static GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub static DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub static DEFAULT_RENDER_API_URL: &str = "http://127.0.0.1:3001";
pub static DEFAULT_PRESETS_PATH: &str = "presets.json";

/// token admins type in a slot option to leave it empty.
pub static EMPTY_SLOT_TOKEN: &str = "null";
