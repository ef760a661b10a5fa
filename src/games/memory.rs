use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};

use super::{GameStore, StoreError};
use crate::models::game::{ActiveGame, ChannelKey};

/// process-local store. everything is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryGameStore {
    games: DashMap<ChannelKey, ActiveGame>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn get(&self, channel: ChannelKey) -> Result<Option<ActiveGame>, StoreError> {
        Ok(self.games.get(&channel).map(|game| game.value().clone()))
    }

    async fn set(&self, channel: ChannelKey, game: ActiveGame) -> Result<(), StoreError> {
        self.games.insert(channel, game);
        Ok(())
    }

    async fn insert_if_absent(
        &self,
        channel: ChannelKey,
        game: ActiveGame,
    ) -> Result<bool, StoreError> {
        match self.games.entry(channel) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(game);
                Ok(true)
            }
        }
    }

    async fn delete(&self, channel: ChannelKey) -> Result<Option<ActiveGame>, StoreError> {
        Ok(self.games.remove(&channel).map(|(_, game)| game))
    }

    async fn delete_if_answer(
        &self,
        channel: ChannelKey,
        answer: &str,
    ) -> Result<Option<ActiveGame>, StoreError> {
        Ok(self
            .games
            .remove_if(&channel, |_, game| game.answer == answer)
            .map(|(_, game)| game))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.games.len())
    }
}
