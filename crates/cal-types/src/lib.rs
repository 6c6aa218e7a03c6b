//! Shared types for the Cal bot.
//!
//! This crate provides the value types used across all Cal crates: the
//! voice-state flags reported by the chat platform, the cosmetic roles the
//! bot maintains on members, playback volume, and the per-guild developer
//! mode switch.
//!
//! No crate in the workspace depends on anything *except* `cal-types` for
//! cross-cutting type definitions.

use serde::{Deserialize, Serialize};

/// Cosmetic status roles displayed on members while they are in voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CosmeticRole {
    /// Member is sharing their screen.
    Streaming,
    /// Member has their camera on.
    Video,
    /// Member has muted their speaker (deafened).
    Deaf,
}

impl CosmeticRole {
    /// Returns the string label for this role.
    pub fn label(self) -> &'static str {
        match self {
            Self::Streaming => "STREAMING",
            Self::Video => "VIDEO",
            Self::Deaf => "DEAF",
        }
    }
}

/// A single change to a member's cosmetic roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", content = "role", rename_all = "snake_case")]
pub enum RoleMutation {
    /// Grant the role.
    Add(CosmeticRole),
    /// Revoke the role.
    Remove(CosmeticRole),
}

impl RoleMutation {
    /// The role this mutation touches.
    pub fn role(self) -> CosmeticRole {
        match self {
            Self::Add(role) | Self::Remove(role) => role,
        }
    }
}

/// Voice used by the text-to-speech backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Japanese,
    English,
}

impl Language {
    /// Language tag understood by the TTS backend.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Japanese => "ja-JP",
            Self::English => "en-US",
        }
    }
}

/// Per-guild developer mode. Unlocks developer-only commands and clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevMode {
    #[default]
    Off,
    On,
}

impl DevMode {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

pub mod voice;
mod volume;

pub use voice::{CosmeticRoleSet, VoiceFlags};
pub use volume::{Volume, VolumeError};
