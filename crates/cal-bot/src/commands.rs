//! Command parsing and the command lookup tables.
//!
//! Commands are resolved through tables rather than branching: the bot's own
//! `/cal...` commands live in a static table, clips come from configuration.
//! Both tables carry a developer-mode flag per entry.

use crate::config::ClipConfig;
use cal_types::DevMode;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// The bot's own commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalCommand {
    Status,
    Join,
    Disconnect,
    VolumeUp,
    VolumeDown,
    SetVolume,
    ResetVolume,
    Help,
    ToggleMode,
    Yabai,
    Whitelist,
}

impl CalCommand {
    pub fn requires_dev_mode(self) -> bool {
        matches!(self, Self::Whitelist)
    }

    /// Label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Status => "cal show status",
            Self::Join => "cal join channel",
            Self::Disconnect => "cal disconnect channel",
            Self::VolumeUp => "cal volume up",
            Self::VolumeDown => "cal volume down",
            Self::SetVolume => "cal volume change",
            Self::ResetVolume => "cal reset",
            Self::Help => "cal help",
            Self::ToggleMode => "switch devMode",
            Self::Yabai => "cal yabai",
            Self::Whitelist => "get whitelist",
        }
    }
}

static CAL_COMMANDS: LazyLock<HashMap<&'static str, CalCommand>> = LazyLock::new(|| {
    HashMap::from([
        ("/cal", CalCommand::Status),
        ("/cal.status", CalCommand::Status),
        ("/cal.in", CalCommand::Join),
        ("/cal.join", CalCommand::Join),
        ("/cal.out", CalCommand::Disconnect),
        ("/cal.disconnect", CalCommand::Disconnect),
        ("/cal.up", CalCommand::VolumeUp),
        ("/cal.down", CalCommand::VolumeDown),
        ("/cal.vol", CalCommand::SetVolume),
        ("/cal.volume", CalCommand::SetVolume),
        ("/cal.reset", CalCommand::ResetVolume),
        ("/cal.help", CalCommand::Help),
        ("/cal.mode", CalCommand::ToggleMode),
        ("/cal.yabai", CalCommand::Yabai),
        ("/cal.list", CalCommand::Whitelist),
        ("/cal.wl", CalCommand::Whitelist),
    ])
});

/// Command the `/cal.yabai` shortcut plays.
pub const YABAI_CLIP: &str = "/yabai";

pub const HELP_TEXT: &str = "魔法一覧よ！```
/cal        キャルの状態を表示
/cal.in     キャルをボイスチャンネルに接続
/cal.out    キャルをボイスチャンネルから切断
/cal.up     キャルの声量を上げる
/cal.down   キャルの声量を下げる
/cal.volume <0.1~1.0> キャルの声量を指定の音量にする
/cal.reset  キャルの音量をリセットする ※デフォルトは0.2
/cal.help   キャルのコマンド一覧
```※`.`は` `で代用可能　例:`/cal help`
";

/// A message split into command parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The whole message with its first separator turned into `.`.
    pub command: String,
    /// First space-separated token of `command`.
    pub head: String,
    /// Second space-separated token, if any.
    pub arg: Option<String>,
}

impl Invocation {
    /// Parses a message. The first space, period, comma, colon or equals
    /// sign becomes `.`, so `/cal help` and `/cal:help` both read as
    /// `/cal.help`.
    pub fn parse(content: &str) -> Self {
        let command = content.replacen(|c: char| matches!(c, ' ' | '.' | ',' | ':' | '='), ".", 1);
        let mut parts = command.split(' ');
        let head = parts.next().unwrap_or_default().to_string();
        let arg = parts.next().map(str::to_string);
        Self { command, head, arg }
    }

    pub fn is_command(&self) -> bool {
        self.command.starts_with('/')
    }

    /// The bot command this invocation names, honoring developer mode.
    pub fn cal_command(&self, mode: DevMode) -> Option<CalCommand> {
        CAL_COMMANDS
            .get(self.head.as_str())
            .copied()
            .filter(|c| !c.requires_dev_mode() || mode.is_on())
    }
}

/// A playable clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub url: String,
    pub caption: String,
    pub dev_only: bool,
}

/// Clips keyed by every alias.
#[derive(Debug, Clone, Default)]
pub struct ClipTable {
    by_alias: HashMap<String, Arc<Clip>>,
}

impl ClipTable {
    pub fn new(clips: &[ClipConfig]) -> Self {
        let mut by_alias = HashMap::new();
        for config in clips {
            let clip = Arc::new(Clip {
                url: config.url.clone(),
                caption: config.caption.clone(),
                dev_only: config.dev_only,
            });
            for alias in &config.aliases {
                if by_alias.insert(alias.clone(), Arc::clone(&clip)).is_some() {
                    tracing::warn!(alias = %alias, "clip alias defined twice, keeping the last one");
                }
            }
        }
        Self { by_alias }
    }

    /// The clip for `command`, honoring developer mode.
    pub fn lookup(&self, command: &str, mode: DevMode) -> Option<&Clip> {
        self.by_alias
            .get(command)
            .map(Arc::as_ref)
            .filter(|clip| !clip.dev_only || mode.is_on())
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}
