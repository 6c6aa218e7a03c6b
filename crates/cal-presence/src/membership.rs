//! Join, leave and move handling.
//!
//! Entering or leaving a channel resets the cosmetic role cache instead of
//! running the same-channel state machines: leaving clears every cosmetic
//! role, joining clears streaming/video and re-evaluates the deaf role from
//! the current flags. A move changes roles like a leave followed by a
//! join, but is logged as the join first, then the leave.

use crate::sync::{synchronize, Announcement, SyncOutcome};
use cal_types::{CosmeticRole, CosmeticRoleSet, RoleMutation, VoiceFlags};
use serde::{Deserialize, Serialize};

/// A voice channel as seen in a voice-state event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub id: u64,
    pub name: String,
}

/// How a member's channel changed between two voice states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelChange<'a> {
    /// Same channel before and after: a flag change.
    Stayed(&'a ChannelRef),
    Joined(&'a ChannelRef),
    Left(&'a ChannelRef),
    Moved {
        from: &'a ChannelRef,
        to: &'a ChannelRef,
    },
}

impl<'a> ChannelChange<'a> {
    /// Classifies a voice-state event. `None` when the member is in no
    /// channel before or after.
    pub fn classify(old: Option<&'a ChannelRef>, new: Option<&'a ChannelRef>) -> Option<Self> {
        match (old, new) {
            (Some(from), Some(to)) if from.id == to.id => Some(Self::Stayed(to)),
            (Some(from), Some(to)) => Some(Self::Moved { from, to }),
            (None, Some(to)) => Some(Self::Joined(to)),
            (Some(from), None) => Some(Self::Left(from)),
            (None, None) => None,
        }
    }
}

const ROLE_ORDER: [CosmeticRole; 3] = [
    CosmeticRole::Streaming,
    CosmeticRole::Video,
    CosmeticRole::Deaf,
];

/// Mutations that turn `from` into `to`, in streaming/video/deaf order.
fn diff(from: CosmeticRoleSet, to: CosmeticRoleSet) -> Vec<RoleMutation> {
    ROLE_ORDER
        .into_iter()
        .filter_map(|role| match (from.holds(role), to.holds(role)) {
            (false, true) => Some(RoleMutation::Add(role)),
            (true, false) => Some(RoleMutation::Remove(role)),
            _ => None,
        })
        .collect()
}

fn after_join(flags: VoiceFlags) -> CosmeticRoleSet {
    CosmeticRoleSet {
        has_streaming_role: false,
        has_video_role: false,
        has_deaf_role: flags.speaker_muted,
    }
}

/// Computes the role changes and announcements for any voice-state event.
///
/// Same-channel events go through [`synchronize`]; joins, leaves and moves
/// reset the role cache. Only mutations that actually change the held
/// roles are returned.
pub fn evaluate(change: ChannelChange<'_>, flags: VoiceFlags, roles: CosmeticRoleSet) -> SyncOutcome {
    let (target, announcements) = match change {
        ChannelChange::Stayed(_) => return synchronize(flags, roles),
        ChannelChange::Joined(to) => (after_join(flags), vec![Announcement::Joined(to.name.clone())]),
        ChannelChange::Left(from) => (
            CosmeticRoleSet::default(),
            vec![Announcement::Left(from.name.clone())],
        ),
        ChannelChange::Moved { from, to } => (
            after_join(flags),
            vec![
                Announcement::Joined(to.name.clone()),
                Announcement::Left(from.name.clone()),
            ],
        ),
    };

    SyncOutcome {
        mutations: diff(roles, target),
        announcements,
    }
}
