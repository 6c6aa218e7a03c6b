//! Voice-state flags and the cosmetic role cache.
//!
//! `VoiceFlags` is sampled fresh from the platform on every voice-state
//! event. `CosmeticRoleSet` is the member's current role membership, which
//! the presence synchronizer treats as a record of the last observed state.

use crate::{CosmeticRole, RoleMutation};
use serde::{Deserialize, Serialize};

/// Live audio/video flags for a member in a voice channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoiceFlags {
    /// Member is sharing their screen.
    #[serde(default)]
    pub streaming: bool,
    /// Member has their camera on.
    #[serde(default)]
    pub camera_on: bool,
    /// Member cannot hear the channel (self- or server-deafened).
    #[serde(default)]
    pub speaker_muted: bool,
    /// Member's microphone is muted.
    #[serde(default)]
    pub mic_muted: bool,
}

/// Cosmetic roles currently held by a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CosmeticRoleSet {
    #[serde(default)]
    pub has_streaming_role: bool,
    #[serde(default)]
    pub has_video_role: bool,
    #[serde(default)]
    pub has_deaf_role: bool,
}

impl CosmeticRoleSet {
    /// Whether the given role is held.
    pub fn holds(&self, role: CosmeticRole) -> bool {
        match role {
            CosmeticRole::Streaming => self.has_streaming_role,
            CosmeticRole::Video => self.has_video_role,
            CosmeticRole::Deaf => self.has_deaf_role,
        }
    }

    /// Returns the role set after applying `mutation`.
    pub fn apply(mut self, mutation: RoleMutation) -> Self {
        let (role, held) = match mutation {
            RoleMutation::Add(role) => (role, true),
            RoleMutation::Remove(role) => (role, false),
        };
        match role {
            CosmeticRole::Streaming => self.has_streaming_role = held,
            CosmeticRole::Video => self.has_video_role = held,
            CosmeticRole::Deaf => self.has_deaf_role = held,
        }
        self
    }

    /// Applies every mutation in order.
    pub fn apply_all<'a>(self, mutations: impl IntoIterator<Item = &'a RoleMutation>) -> Self {
        mutations.into_iter().fold(self, |set, m| set.apply(*m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_add_and_remove() {
        let set = CosmeticRoleSet::default()
            .apply(RoleMutation::Add(CosmeticRole::Streaming))
            .apply(RoleMutation::Add(CosmeticRole::Deaf));
        assert!(set.holds(CosmeticRole::Streaming));
        assert!(!set.holds(CosmeticRole::Video));
        assert!(set.holds(CosmeticRole::Deaf));

        let set = set.apply(RoleMutation::Remove(CosmeticRole::Streaming));
        assert!(!set.has_streaming_role);
        assert!(set.has_deaf_role);
    }

    #[test]
    fn removing_absent_role_is_harmless() {
        let set = CosmeticRoleSet::default().apply(RoleMutation::Remove(CosmeticRole::Video));
        assert_eq!(set, CosmeticRoleSet::default());
    }

    #[test]
    fn apply_all_in_order() {
        let mutations = [
            RoleMutation::Add(CosmeticRole::Video),
            RoleMutation::Remove(CosmeticRole::Video),
            RoleMutation::Add(CosmeticRole::Streaming),
        ];
        let set = CosmeticRoleSet::default().apply_all(&mutations);
        assert!(set.has_streaming_role);
        assert!(!set.has_video_role);
    }

    #[test]
    fn flags_default_missing_fields() {
        let flags: VoiceFlags = serde_json::from_str(r#"{"streaming": true}"#).unwrap();
        assert!(flags.streaming);
        assert!(!flags.camera_on);
        assert!(!flags.speaker_muted);
        assert!(!flags.mic_muted);
    }
}
