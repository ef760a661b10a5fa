//! per-channel game sessions.
//!
//! call sites only ever see [`GameStore`]; whether games live in memory or in sqlite is
//! decided once at startup.

use async_trait::async_trait;

use crate::{
    models::game::{ActiveGame, ChannelKey},
    normalize::normalize,
};

mod memory;
mod sqlite;

pub use memory::MemoryGameStore;
pub use sqlite::SqliteGameStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("corrupt game record for channel {channel}: {reason}")]
    Corrupt { channel: ChannelKey, reason: String },
}

#[async_trait]
pub trait GameStore: Send + Sync {
    async fn get(&self, channel: ChannelKey) -> Result<Option<ActiveGame>, StoreError>;

    /// stores `game`, replacing whatever the channel had.
    async fn set(&self, channel: ChannelKey, game: ActiveGame) -> Result<(), StoreError>;

    /// stores `game` only if the channel has no game. returns whether it was stored.
    async fn insert_if_absent(
        &self,
        channel: ChannelKey,
        game: ActiveGame,
    ) -> Result<bool, StoreError>;

    /// removes and returns the channel's game.
    async fn delete(&self, channel: ChannelKey) -> Result<Option<ActiveGame>, StoreError>;

    /// removes and returns the channel's game, but only if its normalized answer is `answer`.
    async fn delete_if_answer(
        &self,
        channel: ChannelKey,
        answer: &str,
    ) -> Result<Option<ActiveGame>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}

/// checks a chat message against the channel's game.
///
/// returns the finished game if `guess` answered it. the record is removed in the same
/// step, so when several correct guesses race only one of them gets `Some`.
pub async fn check_answer(
    store: &dyn GameStore,
    channel: ChannelKey,
    guess: &str,
) -> Result<Option<ActiveGame>, StoreError> {
    let guess = normalize(guess);

    if guess.is_empty() {
        return Ok(None);
    }

    store.delete_if_answer(channel, &guess).await
}
