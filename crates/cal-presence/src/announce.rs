//! Rendering announcements into voice-log text.

use crate::sync::Announcement;
use chrono::Timelike;

/// Formats the time prefix of a log line, e.g. `` `09:05` ``.
pub fn clock_stamp(time: &impl Timelike) -> String {
    format!("`{:02}:{:02}`", time.hour(), time.minute())
}

/// Display name for log lines.
///
/// Prefers the nickname over the username. Backticks are dropped so the
/// name can be wrapped in inline code; a name that ends up empty renders as
/// `` ` ` ``.
pub fn display_name(nickname: Option<&str>, username: &str) -> String {
    let raw = nickname.filter(|n| !n.is_empty()).unwrap_or(username);
    let cleaned = raw.replace('`', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "` `".to_string()
    } else {
        format!("`{cleaned}`")
    }
}

/// Renders one announcement as a log-channel message.
pub fn render(announcement: &Announcement, name: &str, stamp: &str) -> String {
    let body = match announcement {
        Announcement::ScreenShareStarted => "画面共有を開始しました".to_string(),
        Announcement::ScreenShareEnded => "画面共有を終了しました".to_string(),
        Announcement::CameraOn => "カメラをオンにしました".to_string(),
        Announcement::CameraOff => "カメラをオフにしました".to_string(),
        Announcement::MicMuted => "マイクミュートしました".to_string(),
        Announcement::MicUnmuted => "マイクミュートを解除しました".to_string(),
        Announcement::SpeakerMuted => "スピーカーミュートしました".to_string(),
        Announcement::SpeakerUnmuted => "スピーカーミュートを解除しました".to_string(),
        Announcement::Joined(channel) => format!(" `{channel}` に入室しました"),
        Announcement::Left(channel) => format!(" `{channel}` から退出しました"),
    };
    format!("{stamp}\n{name} が{body}")
}
