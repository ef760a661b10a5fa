use time::OffsetDateTime;

use crate::normalize::normalize;

/// channel the game is being played in, as a raw discord snowflake.
pub type ChannelKey = u64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveGame {
    /// the expected answer, already normalized.
    pub answer: String,
    /// the expected answer as it was written when the game started.
    pub display_answer: String,
    pub image_url: String,
    pub auto_generated: bool,
    pub started_at: OffsetDateTime,
}

impl ActiveGame {
    pub fn new(answer: &str, image_url: impl Into<String>, auto_generated: bool) -> Self {
        let now = OffsetDateTime::now_utc();

        Self {
            answer: normalize(answer),
            display_answer: answer.trim().to_owned(),
            image_url: image_url.into(),
            auto_generated,
            // stores keep whole seconds only.
            started_at: now.replace_nanosecond(0).unwrap_or(now),
        }
    }
}
