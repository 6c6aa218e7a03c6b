//! Event handlers.
//!
//! Each handler turns one platform event into the list of [`Action`]s the
//! adapter should perform. Handlers never touch the platform themselves;
//! the only state they change is the per-guild [`ContextStore`].

use crate::actions::Action;
use crate::commands::{CalCommand, ClipTable, Invocation, HELP_TEXT, YABAI_CLIP};
use crate::config::Config;
use crate::context::ContextStore;
use crate::events::{MemberJoinEvent, MessageEvent, VoiceStateEvent};
use cal_presence::{
    clock_stamp, display_name, evaluate, render, should_join, should_leave, ChannelChange,
};
use cal_speech::{tts_url, SpeechNormalizer};
use cal_types::{RoleMutation, Volume, VolumeError};
use chrono::NaiveTime;

const READY_TEXT: &str = "キャルの参上よ！";
const UNKNOWN_COMMAND_TEXT: &str = "そんなコマンドないんだけど！";

/// Everything the handlers need, built once from configuration.
#[derive(Debug, Clone)]
pub struct Bot {
    config: Config,
    contexts: ContextStore,
    clips: ClipTable,
    normalizer: SpeechNormalizer,
}

impl Bot {
    pub fn new(config: Config) -> Self {
        let clips = ClipTable::new(&config.clips);
        let normalizer = SpeechNormalizer::new(config.bot.speak_marker.clone());
        Self {
            config,
            contexts: ContextStore::new(),
            clips,
            normalizer,
        }
    }

    pub fn contexts(&self) -> &ContextStore {
        &self.contexts
    }

    /// Startup notice.
    pub fn handle_ready(&self) -> Vec<Action> {
        match self.config.bot.ready_channel {
            Some(channel_id) => vec![Action::SendMessage {
                channel_id,
                content: READY_TEXT.to_string(),
            }],
            None => Vec::new(),
        }
    }

    /// Greets a member joining the welcome guild.
    pub fn handle_member_join(&self, event: &MemberJoinEvent) -> Vec<Action> {
        let Some(welcome) = &self.config.welcome else {
            return Vec::new();
        };
        if event.guild_name != welcome.guild_name {
            return Vec::new();
        }
        tracing::info!(guild_id = event.guild_id, user_id = event.user_id, "welcoming new member");
        vec![Action::SendMessage {
            channel_id: welcome.channel,
            content: format!(
                "<@!{}> まずは <#{}> を確認しなさい！",
                event.user_id, welcome.guide_channel
            ),
        }]
    }

    /// Voice presence: role sync, voice log, and the bot following members
    /// in and out of channels.
    pub fn handle_voice_state(&self, event: &VoiceStateEvent, now: NaiveTime) -> Vec<Action> {
        if !self.config.bot.voice_guilds.contains(&event.guild_id) {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if self.config.bot.log_guild == Some(event.guild_id) {
            actions.extend(self.presence_actions(event, now));
        }
        actions.extend(self.autopilot_actions(event));
        actions
    }

    fn presence_actions(&self, event: &VoiceStateEvent, now: NaiveTime) -> Vec<Action> {
        let Some(member) = &event.member else {
            return Vec::new();
        };
        if member.is_bot {
            return Vec::new();
        }

        let old = event.old_channel.as_ref().map(|c| c.to_ref());
        let new = event.new_channel.as_ref().map(|c| c.to_ref());
        let Some(change) = ChannelChange::classify(old.as_ref(), new.as_ref()) else {
            return Vec::new();
        };

        let roles = self.config.bot.roles.cosmetic_set(&member.role_ids);
        let outcome = evaluate(change, member.flags, roles);

        let mut actions = Vec::new();
        for mutation in &outcome.mutations {
            let Some(role_id) = self.config.bot.roles.id_for(mutation.role()) else {
                tracing::warn!(
                    role = mutation.role().label(),
                    "cosmetic role id not configured, skipping mutation"
                );
                continue;
            };
            actions.push(match mutation {
                RoleMutation::Add(_) => Action::AddRole {
                    guild_id: event.guild_id,
                    member_id: member.id,
                    role_id,
                },
                RoleMutation::Remove(_) => Action::RemoveRole {
                    guild_id: event.guild_id,
                    member_id: member.id,
                    role_id,
                },
            });
        }

        let Some(log_channel) = self.config.bot.vc_log_channel else {
            return actions;
        };
        let name = display_name(member.nickname.as_deref(), &member.username);
        let stamp = clock_stamp(&now);
        for announcement in &outcome.announcements {
            let content = render(announcement, &name, &stamp);
            tracing::info!(
                member_id = member.id,
                event = announcement.label(),
                "{}",
                content
            );
            actions.push(Action::SendMessage {
                channel_id: log_channel,
                content,
            });
        }
        actions
    }

    fn autopilot_actions(&self, event: &VoiceStateEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        let connected = |id: u64| event.bot_connections.iter().any(|c| c.id == id);

        if let Some(new) = &event.new_channel {
            let connected_names: Vec<String> =
                event.bot_connections.iter().map(|c| c.name.clone()).collect();
            if !connected(new.id)
                && should_join(
                    &new.name,
                    &new.occupants,
                    &self.config.bot.afk_channels,
                    &connected_names,
                    &self.config.bot.pinned_marker,
                )
            {
                tracing::info!(channel = %new.name, "following members into voice channel");
                actions.push(Action::JoinVoice {
                    guild_id: event.guild_id,
                    channel_id: new.id,
                });
            }
        }

        if let Some(old) = &event.old_channel {
            if connected(old.id) && should_leave(&old.occupants) {
                tracing::info!(channel = %old.name, "no members left, disconnecting");
                actions.push(Action::LeaveVoice {
                    guild_id: event.guild_id,
                    channel_id: old.id,
                });
            }
        }

        actions
    }

    /// Text messages: bot commands, clips, and reading text aloud.
    pub fn handle_message(&self, event: &MessageEvent) -> Vec<Action> {
        if event.author.username == self.config.bot.name {
            return Vec::new();
        }

        let channel = &event.channel_name;
        let in_command_channel = self.config.bot.command_channels.contains(channel);
        let in_speech_channel = self.config.bot.speech_channels.contains(channel);
        if !in_command_channel && !in_speech_channel {
            return Vec::new();
        }

        if in_command_channel {
            if let Some(actions) = self.dispatch_command(event) {
                return actions;
            }
        }

        if in_speech_channel || self.normalizer.is_speak_request(&event.content) {
            return self.speak(event);
        }
        Vec::new()
    }

    /// `None` when the message is not a command, so it may still be spoken.
    fn dispatch_command(&self, event: &MessageEvent) -> Option<Vec<Action>> {
        let invocation = Invocation::parse(&event.content);
        let mode = self.contexts.get(event.guild_id).mode;

        if let Some(command) = invocation.cal_command(mode) {
            tracing::info!(guild_id = event.guild_id, "{}", command.label());
            return Some(self.run_cal_command(command, &invocation, event));
        }

        if let Some(clip) = self.clips.lookup(&invocation.command, mode) {
            tracing::info!(guild_id = event.guild_id, command = %invocation.command, "playing clip");
            return Some(vec![Action::PlayClip {
                guild_id: event.guild_id,
                url: clip.url.clone(),
                caption: clip.caption.clone(),
                volume: self.contexts.get(event.guild_id).volume,
            }]);
        }

        if !invocation.is_command() || self.normalizer.is_speak_request(&event.content) {
            return None;
        }

        let name = &invocation.command[1..];
        if self.config.whitelist.iter().any(|w| w == name) {
            return Some(Vec::new());
        }
        tracing::info!(command = %invocation.command, "missing command");
        Some(vec![reply(event, UNKNOWN_COMMAND_TEXT)])
    }

    fn run_cal_command(
        &self,
        command: CalCommand,
        invocation: &Invocation,
        event: &MessageEvent,
    ) -> Vec<Action> {
        let guild_id = event.guild_id;
        match command {
            CalCommand::Status => {
                let volume = self.contexts.get(guild_id).volume;
                let join = match &event.bot_voice_channel {
                    Some(channel) => format!("{}に接続しているわ", channel.name),
                    None => "どこのボイスチャンネルにも接続してないわ".to_string(),
                };
                vec![reply(event, format!("{join}\n音量は{volume}よ！"))]
            }
            CalCommand::Join => {
                let Some(target) = &event.author_voice_channel else {
                    return vec![reply(
                        event,
                        "あんたがボイスチャンネルに居ないと入れないじゃないの！",
                    )];
                };
                if event.bot_voice_channel.as_ref().map(|c| c.id) == Some(target.id) {
                    return vec![reply(event, format!("もう{}に接続してるわ", target.name))];
                }
                vec![
                    Action::JoinVoice {
                        guild_id,
                        channel_id: target.id,
                    },
                    reply(event, format!("{}に接続したわよ！", target.name)),
                ]
            }
            CalCommand::Disconnect => {
                let Some(current) = &event.bot_voice_channel else {
                    return vec![reply(event, "あたしはどこのボイスチャンネルに入ってないわよ")];
                };
                vec![
                    Action::LeaveVoice {
                        guild_id,
                        channel_id: current.id,
                    },
                    reply(event, format!("{}から切断したわ", current.name)),
                ]
            }
            CalCommand::VolumeUp => {
                let text = self.contexts.update(guild_id, |ctx| match ctx.volume.up() {
                    Ok(volume) => {
                        ctx.volume = volume;
                        format!("音量を上げたわよ！({volume})")
                    }
                    Err(_) => "これ以上音量を上げられないわ".to_string(),
                });
                vec![reply(event, text)]
            }
            CalCommand::VolumeDown => {
                let text = self.contexts.update(guild_id, |ctx| match ctx.volume.down() {
                    Ok(volume) => {
                        ctx.volume = volume;
                        format!("音量を下げたわよ！({volume})")
                    }
                    Err(_) => "これ以上音量を下げられないわ".to_string(),
                });
                vec![reply(event, text)]
            }
            CalCommand::SetVolume => {
                let arg = invocation.arg.as_deref();
                let text = match Volume::parse_setting(arg) {
                    Ok(volume) => {
                        self.contexts.update(guild_id, |ctx| ctx.volume = volume);
                        format!("音量を{}にしたわよ！", arg.unwrap_or_default())
                    }
                    Err(VolumeError::Missing) => "音量が指定されていないんだけど！".to_string(),
                    Err(_) => "その音量にはできないんだけど！".to_string(),
                };
                vec![reply(event, text)]
            }
            CalCommand::ResetVolume => {
                self.contexts
                    .update(guild_id, |ctx| ctx.volume = Volume::RESET);
                vec![reply(
                    event,
                    format!("音量をリセットしたわよ！({})", Volume::RESET),
                )]
            }
            CalCommand::Help => vec![reply(event, HELP_TEXT)],
            CalCommand::ToggleMode => {
                let mode = self.contexts.update(guild_id, |ctx| {
                    ctx.mode = ctx.mode.toggled();
                    ctx.mode
                });
                let text = if mode.is_on() {
                    "開発モードをオンにしたわ"
                } else {
                    "開発モードをオフにしたわ"
                };
                vec![reply(event, text)]
            }
            CalCommand::Yabai => {
                let context = self.contexts.get(guild_id);
                match self.clips.lookup(YABAI_CLIP, context.mode) {
                    Some(clip) => vec![Action::PlayClip {
                        guild_id,
                        url: clip.url.clone(),
                        caption: clip.caption.clone(),
                        volume: context.volume,
                    }],
                    None => vec![reply(event, UNKNOWN_COMMAND_TEXT)],
                }
            }
            CalCommand::Whitelist => {
                if invocation.arg.is_some() {
                    return vec![reply(event, "ホワイトリストは設定ファイルで管理してるわ")];
                }
                let list = if self.config.whitelist.is_empty() {
                    "ホワイトリストは空よ".to_string()
                } else {
                    self.config.whitelist.join("\n")
                };
                vec![reply(event, list)]
            }
        }
    }

    fn speak(&self, event: &MessageEvent) -> Vec<Action> {
        let Some(utterance) = self.normalizer.prepare(&event.content) else {
            return Vec::new();
        };
        let url = match tts_url(&self.config.bot.tts_endpoint, &utterance.text, utterance.language) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "failed to build TTS request");
                return Vec::new();
            }
        };
        tracing::debug!(
            guild_id = event.guild_id,
            language = utterance.language.tag(),
            "speaking message"
        );
        vec![Action::Speak {
            guild_id: event.guild_id,
            url: url.to_string(),
            text: utterance.text,
            language: utterance.language,
            volume: self.contexts.get(event.guild_id).volume,
        }]
    }
}

fn reply(event: &MessageEvent, content: impl Into<String>) -> Action {
    Action::Reply {
        channel_id: event.channel_id,
        message_id: event.message_id,
        content: content.into(),
    }
}
