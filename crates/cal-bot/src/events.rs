//! Platform events as delivered by the adapter.

use cal_presence::{ChannelRef, Occupant};
use cal_types::VoiceFlags;
use serde::{Deserialize, Serialize};

/// A member as seen in a voice-state event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceMember {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
    /// Live voice flags after the change.
    #[serde(default)]
    pub flags: VoiceFlags,
    /// Platform role ids the member holds.
    #[serde(default)]
    pub role_ids: Vec<u64>,
}

/// A voice channel together with who is in it after the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceChannel {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub occupants: Vec<Occupant>,
}

impl VoiceChannel {
    pub fn to_ref(&self) -> ChannelRef {
        ChannelRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// A member's voice state changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceStateEvent {
    pub guild_id: u64,
    /// Absent when the platform no longer knows the member.
    #[serde(default)]
    pub member: Option<VoiceMember>,
    #[serde(default)]
    pub old_channel: Option<VoiceChannel>,
    #[serde(default)]
    pub new_channel: Option<VoiceChannel>,
    /// Voice channels the bot is connected to, across all guilds.
    #[serde(default)]
    pub bot_connections: Vec<ChannelRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageAuthor {
    pub id: u64,
    pub username: String,
}

/// A text message was posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    pub guild_id: u64,
    pub channel_id: u64,
    pub channel_name: String,
    pub message_id: u64,
    pub author: MessageAuthor,
    pub content: String,
    /// Voice channel the author is in.
    #[serde(default)]
    pub author_voice_channel: Option<ChannelRef>,
    /// Voice channel the bot is in within this guild.
    #[serde(default)]
    pub bot_voice_channel: Option<ChannelRef>,
}

/// Someone joined a guild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberJoinEvent {
    pub guild_id: u64,
    pub guild_name: String,
    pub user_id: u64,
}
