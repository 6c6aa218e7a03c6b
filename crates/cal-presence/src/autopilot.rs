//! Decides when the bot itself joins or leaves a voice channel.

use serde::{Deserialize, Serialize};

/// Someone currently in a voice channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub username: String,
    #[serde(default)]
    pub is_bot: bool,
}

fn only_bots(occupants: &[Occupant]) -> bool {
    occupants.iter().all(|o| o.is_bot)
}

/// Whether the bot should follow members into `channel_name`.
///
/// Never joins AFK channels, never moves while connected to a channel whose
/// name contains `pinned_marker`, and never joins a channel holding only
/// bots.
pub fn should_join(
    channel_name: &str,
    occupants: &[Occupant],
    afk_channels: &[String],
    connected_channels: &[String],
    pinned_marker: &str,
) -> bool {
    if afk_channels.iter().any(|c| c == channel_name) {
        return false;
    }
    if !pinned_marker.is_empty()
        && connected_channels
            .iter()
            .any(|c| c.contains(pinned_marker))
    {
        return false;
    }
    if only_bots(occupants) {
        return false;
    }
    true
}

/// Whether the bot should disconnect from a channel someone just left.
///
/// True once no human remains, which includes the bot being alone.
pub fn should_leave(occupants: &[Occupant]) -> bool {
    only_bots(occupants)
}
