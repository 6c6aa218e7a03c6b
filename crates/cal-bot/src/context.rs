//! Per-guild bot state.

use cal_types::{DevMode, Volume};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Settings a guild changes through commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuildContext {
    pub volume: Volume,
    pub mode: DevMode,
}

/// Guild contexts keyed by guild id. Guilds start from
/// [`GuildContext::default`] on first use.
///
/// Uses `std::sync::RwLock`: every lock is a short map operation that never
/// spans an `.await`.
#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    guilds: Arc<RwLock<HashMap<u64, GuildContext>>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current context of a guild.
    pub fn get(&self, guild_id: u64) -> GuildContext {
        self.guilds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&guild_id)
            .copied()
            .unwrap_or_default()
    }

    /// Runs `f` on the guild's context under the write lock, so
    /// read-modify-write sequences from concurrent events do not interleave.
    pub fn update<R>(&self, guild_id: u64, f: impl FnOnce(&mut GuildContext) -> R) -> R {
        let mut guilds = self
            .guilds
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(guilds.entry(guild_id).or_default())
    }
}
