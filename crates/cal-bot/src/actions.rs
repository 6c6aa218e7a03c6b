//! Side effects the platform adapter carries out on the bot's behalf.

use cal_types::{Language, Volume};
use serde::{Deserialize, Serialize};

/// One platform call, in the order it should be made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    AddRole {
        guild_id: u64,
        member_id: u64,
        role_id: u64,
    },
    RemoveRole {
        guild_id: u64,
        member_id: u64,
        role_id: u64,
    },
    SendMessage {
        channel_id: u64,
        content: String,
    },
    Reply {
        channel_id: u64,
        message_id: u64,
        content: String,
    },
    PlayClip {
        guild_id: u64,
        url: String,
        caption: String,
        volume: Volume,
    },
    Speak {
        guild_id: u64,
        url: String,
        text: String,
        language: Language,
        volume: Volume,
    },
    JoinVoice {
        guild_id: u64,
        channel_id: u64,
    },
    LeaveVoice {
        guild_id: u64,
        channel_id: u64,
    },
}

/// Response body of every event endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionList {
    pub actions: Vec<Action>,
}

impl From<Vec<Action>> for ActionList {
    fn from(actions: Vec<Action>) -> Self {
        Self { actions }
    }
}
