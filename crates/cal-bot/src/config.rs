//! Bot configuration loading from file and environment variables.

use cal_speech::{DEFAULT_SPEAK_MARKER, DEFAULT_TTS_ENDPOINT};
use cal_types::{CosmeticRole, CosmeticRoleSet};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Event bridge network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Guilds, channels and roles the bot works with.
    #[serde(default)]
    pub bot: BotConfig,

    /// Welcome message for new members, if enabled.
    #[serde(default)]
    pub welcome: Option<WelcomeConfig>,

    /// Canned audio clips, looked up by command.
    #[serde(default)]
    pub clips: Vec<ClipConfig>,

    /// Commands (without the leading `/`) that are handled elsewhere and
    /// must not trigger the "no such command" reply.
    #[serde(default)]
    pub whitelist: Vec<String>,
}

/// Network configuration for the event bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cal_bot=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Where and how the bot operates.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// The bot's own username; its messages are ignored.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Guilds where the bot handles voice events at all.
    #[serde(default)]
    pub voice_guilds: Vec<u64>,

    /// Guild whose voice activity is written to the voice log.
    #[serde(default)]
    pub log_guild: Option<u64>,

    /// Text channel receiving voice log lines.
    #[serde(default)]
    pub vc_log_channel: Option<u64>,

    /// Text channel receiving the startup notice.
    #[serde(default)]
    pub ready_channel: Option<u64>,

    /// Text channel names where commands are accepted.
    #[serde(default)]
    pub command_channels: Vec<String>,

    /// Text channel names whose messages are read aloud.
    #[serde(default)]
    pub speech_channels: Vec<String>,

    /// Voice channel names the bot never follows members into.
    #[serde(default)]
    pub afk_channels: Vec<String>,

    /// While connected to a channel whose name contains this, the bot
    /// does not move.
    #[serde(default = "default_pinned_marker")]
    pub pinned_marker: String,

    /// Phrase that asks the bot to read a message aloud.
    #[serde(default = "default_speak_marker")]
    pub speak_marker: String,

    /// TTS URL-generation endpoint.
    #[serde(default = "default_tts_endpoint")]
    pub tts_endpoint: String,

    /// Platform role ids of the cosmetic roles.
    #[serde(default)]
    pub roles: RoleIds,
}

/// Platform role ids of the cosmetic roles. Unset roles are never
/// granted or revoked.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RoleIds {
    pub streaming: Option<u64>,
    pub video: Option<u64>,
    pub deaf: Option<u64>,
}

impl RoleIds {
    pub fn id_for(&self, role: CosmeticRole) -> Option<u64> {
        match role {
            CosmeticRole::Streaming => self.streaming,
            CosmeticRole::Video => self.video,
            CosmeticRole::Deaf => self.deaf,
        }
    }

    /// Reads a member's cosmetic roles out of their platform role ids.
    pub fn cosmetic_set(&self, role_ids: &[u64]) -> CosmeticRoleSet {
        let held = |role| {
            self.id_for(role)
                .is_some_and(|id| role_ids.contains(&id))
        };
        CosmeticRoleSet {
            has_streaming_role: held(CosmeticRole::Streaming),
            has_video_role: held(CosmeticRole::Video),
            has_deaf_role: held(CosmeticRole::Deaf),
        }
    }
}

/// Greeting posted when someone joins the welcome guild.
#[derive(Debug, Clone, Deserialize)]
pub struct WelcomeConfig {
    /// Guild name the greeting applies to.
    pub guild_name: String,
    /// Channel the greeting is posted in.
    pub channel: u64,
    /// Channel new members are pointed to.
    pub guide_channel: u64,
}

/// A canned audio clip.
#[derive(Debug, Clone, Deserialize)]
pub struct ClipConfig {
    /// Commands that play the clip, e.g. `["/yabai", "/yab"]`.
    pub aliases: Vec<String>,
    /// Audio URL handed to the player.
    pub url: String,
    /// Text posted alongside playback.
    pub caption: String,
    /// Only playable while developer mode is on.
    #[serde(default)]
    pub dev_only: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bot_name() -> String {
    "キャル".to_string()
}

fn default_pinned_marker() -> String {
    "固定".to_string()
}

fn default_speak_marker() -> String {
    DEFAULT_SPEAK_MARKER.to_string()
}

fn default_tts_endpoint() -> String {
    DEFAULT_TTS_ENDPOINT.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            voice_guilds: Vec::new(),
            log_guild: None,
            vc_log_channel: None,
            ready_channel: None,
            command_channels: Vec::new(),
            speech_channels: Vec::new(),
            afk_channels: Vec::new(),
            pinned_marker: default_pinned_marker(),
            speak_marker: default_speak_marker(),
            tts_endpoint: default_tts_endpoint(),
            roles: RoleIds::default(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file parsed but describes an unusable setup.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `CAL_HOST` overrides `server.host`
/// - `CAL_PORT` overrides `server.port`
/// - `CAL_LOG_LEVEL` overrides `logging.level`
/// - `CAL_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `CAL_SPEAK_MARKER` overrides `bot.speak_marker`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed,
/// or if a clip has no alias.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    if let Ok(host) = std::env::var("CAL_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("CAL_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("CAL_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("CAL_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(marker) = std::env::var("CAL_SPEAK_MARKER") {
        config.bot.speak_marker = marker;
    }

    if let Some(clip) = config.clips.iter().find(|c| c.aliases.is_empty()) {
        return Err(ConfigError::Invalid(format!(
            "clip {} has no aliases",
            clip.url
        )));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.bot.name, "キャル");
        assert_eq!(config.bot.pinned_marker, "固定");
        assert_eq!(config.bot.speak_marker, DEFAULT_SPEAK_MARKER);
        assert!(config.welcome.is_none());
        assert!(config.clips.is_empty());
    }

    #[test]
    fn role_ids_map_to_cosmetic_set() {
        let ids = RoleIds {
            streaming: Some(10),
            video: Some(11),
            deaf: None,
        };
        let set = ids.cosmetic_set(&[11, 99]);
        assert!(!set.has_streaming_role);
        assert!(set.has_video_role);
        assert!(!set.has_deaf_role);
        assert_eq!(ids.id_for(CosmeticRole::Deaf), None);
    }

    #[test]
    fn parses_full_file() {
        let config: Config = toml::from_str(
            r#"
            whitelist = ["poll"]

            [server]
            port = 8080

            [bot]
            voice_guilds = [1, 2]
            log_guild = 1
            vc_log_channel = 100
            command_channels = ["bot"]
            afk_channels = ["宿屋"]

            [bot.roles]
            streaming = 10
            video = 11
            deaf = 12

            [welcome]
            guild_name = "guild"
            channel = 200
            guide_channel = 201

            [[clips]]
            aliases = ["/yabai", "/yab"]
            url = "https://example.com/yabai.mp3"
            caption = "ヤバいわよ！"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.bot.voice_guilds, vec![1, 2]);
        assert_eq!(config.bot.roles.deaf, Some(12));
        assert_eq!(config.welcome.unwrap().guide_channel, 201);
        assert_eq!(config.clips[0].aliases, vec!["/yabai", "/yab"]);
        assert!(!config.clips[0].dev_only);
        assert_eq!(config.whitelist, vec!["poll"]);
    }
}
