//! Role synchronization while a member stays in one voice channel.
//!
//! The cosmetic roles lag one event behind the voice flags: the roles say
//! what was true after the previous event, the flags say what is true now.
//! Reading both together tells which single transition fired, which a flag
//! pair alone cannot (streaming + camera could mean "camera just turned on"
//! or "nothing changed").
//!
//! Two independent machines run per event: [`StreamState`] over the
//! streaming/video roles and [`DeafState`] over the deaf role.

use cal_types::{CosmeticRole, CosmeticRoleSet, RoleMutation, VoiceFlags};
use serde::Serialize;

/// Something worth posting to the voice log channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "channel", rename_all = "snake_case")]
pub enum Announcement {
    ScreenShareStarted,
    ScreenShareEnded,
    CameraOn,
    CameraOff,
    MicMuted,
    MicUnmuted,
    SpeakerMuted,
    SpeakerUnmuted,
    /// Member entered the named channel.
    Joined(String),
    /// Member left the named channel.
    Left(String),
}

impl Announcement {
    /// Stable label used in structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ScreenShareStarted => "screen_share_started",
            Self::ScreenShareEnded => "screen_share_ended",
            Self::CameraOn => "camera_on",
            Self::CameraOff => "camera_off",
            Self::MicMuted => "mic_muted",
            Self::MicUnmuted => "mic_unmuted",
            Self::SpeakerMuted => "speaker_muted",
            Self::SpeakerUnmuted => "speaker_unmuted",
            Self::Joined(_) => "joined",
            Self::Left(_) => "left",
        }
    }

    fn mic_toggle(mic_muted: bool) -> Self {
        if mic_muted {
            Self::MicMuted
        } else {
            Self::MicUnmuted
        }
    }
}

/// Role changes and announcements implied by one voice-state event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub mutations: Vec<RoleMutation>,
    pub announcements: Vec<Announcement>,
}

impl SyncOutcome {
    /// True when the event requires neither a role change nor a message.
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty() && self.announcements.is_empty()
    }

    fn transition(&mut self, mutation: RoleMutation, announcement: Announcement) {
        self.mutations.push(mutation);
        self.announcements.push(announcement);
    }
}

/// Streaming/video role state, one variant per held-role combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Neither role held (00).
    Idle,
    /// Only the video role held (01).
    VideoOnly,
    /// Only the streaming role held (10).
    StreamingOnly,
    /// Both roles held (11).
    StreamingAndVideo,
}

/// What the streaming/camera machine decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStep {
    Transition(RoleMutation, Announcement),
    /// No streaming/camera change; the event was a mute toggle.
    MuteMessage,
    /// Flag combination that cannot follow from this state.
    NoOp,
}

impl StreamState {
    pub fn from_roles(roles: &CosmeticRoleSet) -> Self {
        match (roles.has_streaming_role, roles.has_video_role) {
            (false, false) => Self::Idle,
            (false, true) => Self::VideoOnly,
            (true, false) => Self::StreamingOnly,
            (true, true) => Self::StreamingAndVideo,
        }
    }

    /// Consumes the new `(streaming, camera_on)` flags.
    pub fn step(self, streaming: bool, camera_on: bool) -> StreamStep {
        use StreamStep::{MuteMessage, NoOp};

        let started = || {
            StreamStep::Transition(
                RoleMutation::Add(CosmeticRole::Streaming),
                Announcement::ScreenShareStarted,
            )
        };
        let ended = || {
            StreamStep::Transition(
                RoleMutation::Remove(CosmeticRole::Streaming),
                Announcement::ScreenShareEnded,
            )
        };
        let camera_on_step = || {
            StreamStep::Transition(RoleMutation::Add(CosmeticRole::Video), Announcement::CameraOn)
        };
        let camera_off_step = || {
            StreamStep::Transition(
                RoleMutation::Remove(CosmeticRole::Video),
                Announcement::CameraOff,
            )
        };

        match (self, streaming, camera_on) {
            (Self::StreamingAndVideo, true, true) => MuteMessage,
            (Self::StreamingAndVideo, false, true) => ended(),
            (Self::StreamingAndVideo, true, false) => camera_off_step(),
            (Self::StreamingAndVideo, false, false) => NoOp,

            (Self::VideoOnly, true, true) => started(),
            (Self::VideoOnly, false, true) => MuteMessage,
            (Self::VideoOnly, true, false) => NoOp,
            (Self::VideoOnly, false, false) => camera_off_step(),

            (Self::StreamingOnly, true, true) => camera_on_step(),
            (Self::StreamingOnly, false, true) => NoOp,
            (Self::StreamingOnly, true, false) => MuteMessage,
            (Self::StreamingOnly, false, false) => ended(),

            (Self::Idle, true, true) => NoOp,
            (Self::Idle, false, true) => camera_on_step(),
            (Self::Idle, true, false) => started(),
            (Self::Idle, false, false) => MuteMessage,
        }
    }
}

/// Deaf role state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeafState {
    Hearing,
    Deafened,
}

/// What the speaker-mute machine decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeafStep {
    Transition(RoleMutation, Announcement),
    /// Speaker state unchanged; report the mic state instead.
    MicToggle(Announcement),
}

impl DeafState {
    pub fn from_roles(roles: &CosmeticRoleSet) -> Self {
        if roles.has_deaf_role {
            Self::Deafened
        } else {
            Self::Hearing
        }
    }

    pub fn step(self, speaker_muted: bool, mic_muted: bool) -> DeafStep {
        match (self, speaker_muted) {
            (Self::Deafened, false) => DeafStep::Transition(
                RoleMutation::Remove(CosmeticRole::Deaf),
                Announcement::SpeakerUnmuted,
            ),
            (Self::Hearing, true) => DeafStep::Transition(
                RoleMutation::Add(CosmeticRole::Deaf),
                Announcement::SpeakerMuted,
            ),
            (Self::Deafened, true) | (Self::Hearing, false) => {
                DeafStep::MicToggle(Announcement::mic_toggle(mic_muted))
            }
        }
    }
}

/// Computes the role changes and announcements for a same-channel
/// voice-state event.
///
/// Both machines always run. A transition from either machine is always
/// reported; the mic-mute toggle is reported only when neither machine saw
/// a transition and the streaming/camera machine classified the event as a
/// mute toggle.
pub fn synchronize(flags: VoiceFlags, roles: CosmeticRoleSet) -> SyncOutcome {
    let stream = StreamState::from_roles(&roles).step(flags.streaming, flags.camera_on);
    let deaf = DeafState::from_roles(&roles).step(flags.speaker_muted, flags.mic_muted);

    let mut outcome = SyncOutcome::default();
    let stream_was_mute = matches!(stream, StreamStep::MuteMessage);

    if let StreamStep::Transition(mutation, announcement) = stream {
        outcome.transition(mutation, announcement);
    }

    match deaf {
        DeafStep::Transition(mutation, announcement) => {
            outcome.transition(mutation, announcement);
        }
        DeafStep::MicToggle(announcement) if stream_was_mute => {
            outcome.announcements.push(announcement);
        }
        DeafStep::MicToggle(_) => {}
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(streaming: bool, video: bool) -> CosmeticRoleSet {
        CosmeticRoleSet {
            has_streaming_role: streaming,
            has_video_role: video,
            has_deaf_role: false,
        }
    }

    #[test]
    fn state_from_roles() {
        assert_eq!(StreamState::from_roles(&roles(false, false)), StreamState::Idle);
        assert_eq!(StreamState::from_roles(&roles(false, true)), StreamState::VideoOnly);
        assert_eq!(StreamState::from_roles(&roles(true, false)), StreamState::StreamingOnly);
        assert_eq!(
            StreamState::from_roles(&roles(true, true)),
            StreamState::StreamingAndVideo
        );
    }

    #[test]
    fn stream_transition_table() {
        use Announcement as A;
        use CosmeticRole::{Streaming, Video};
        use RoleMutation::{Add, Remove};
        use StreamState::*;
        use StreamStep::{MuteMessage, NoOp, Transition};

        let table = [
            (StreamingAndVideo, true, true, MuteMessage),
            (StreamingAndVideo, false, true, Transition(Remove(Streaming), A::ScreenShareEnded)),
            (StreamingAndVideo, true, false, Transition(Remove(Video), A::CameraOff)),
            (StreamingAndVideo, false, false, NoOp),
            (VideoOnly, true, true, Transition(Add(Streaming), A::ScreenShareStarted)),
            (VideoOnly, false, true, MuteMessage),
            (VideoOnly, true, false, NoOp),
            (VideoOnly, false, false, Transition(Remove(Video), A::CameraOff)),
            (StreamingOnly, true, true, Transition(Add(Video), A::CameraOn)),
            (StreamingOnly, false, true, NoOp),
            (StreamingOnly, true, false, MuteMessage),
            (StreamingOnly, false, false, Transition(Remove(Streaming), A::ScreenShareEnded)),
            (Idle, true, true, NoOp),
            (Idle, false, true, Transition(Add(Video), A::CameraOn)),
            (Idle, true, false, Transition(Add(Streaming), A::ScreenShareStarted)),
            (Idle, false, false, MuteMessage),
        ];

        for (state, streaming, camera, expected) in table {
            assert_eq!(
                state.step(streaming, camera),
                expected,
                "{state:?} streaming={streaming} camera={camera}"
            );
        }
    }

    #[test]
    fn deaf_transition_table() {
        use DeafState::*;

        assert_eq!(
            Deafened.step(true, true),
            DeafStep::MicToggle(Announcement::MicMuted)
        );
        assert_eq!(
            Deafened.step(false, true),
            DeafStep::Transition(
                RoleMutation::Remove(CosmeticRole::Deaf),
                Announcement::SpeakerUnmuted
            )
        );
        assert_eq!(
            Hearing.step(true, false),
            DeafStep::Transition(
                RoleMutation::Add(CosmeticRole::Deaf),
                Announcement::SpeakerMuted
            )
        );
        assert_eq!(
            Hearing.step(false, false),
            DeafStep::MicToggle(Announcement::MicUnmuted)
        );
    }

    #[test]
    fn mute_message_reports_mic_state() {
        let muted = VoiceFlags {
            mic_muted: true,
            ..VoiceFlags::default()
        };
        let outcome = synchronize(muted, CosmeticRoleSet::default());
        assert!(outcome.mutations.is_empty());
        assert_eq!(outcome.announcements, vec![Announcement::MicMuted]);

        let outcome = synchronize(VoiceFlags::default(), CosmeticRoleSet::default());
        assert_eq!(outcome.announcements, vec![Announcement::MicUnmuted]);
    }

    #[test]
    fn no_op_suppresses_mic_toggle() {
        let flags = VoiceFlags {
            streaming: true,
            camera_on: true,
            ..VoiceFlags::default()
        };
        assert!(synchronize(flags, CosmeticRoleSet::default()).is_empty());
    }

    #[test]
    fn transition_suppresses_mic_toggle() {
        let flags = VoiceFlags {
            streaming: true,
            mic_muted: true,
            ..VoiceFlags::default()
        };
        let outcome = synchronize(flags, CosmeticRoleSet::default());
        assert_eq!(
            outcome.mutations,
            vec![RoleMutation::Add(CosmeticRole::Streaming)]
        );
        assert_eq!(outcome.announcements, vec![Announcement::ScreenShareStarted]);
    }

    #[test]
    fn both_machines_can_fire_together() {
        let flags = VoiceFlags {
            camera_on: true,
            speaker_muted: true,
            ..VoiceFlags::default()
        };
        let outcome = synchronize(flags, CosmeticRoleSet::default());
        assert_eq!(
            outcome.mutations,
            vec![
                RoleMutation::Add(CosmeticRole::Video),
                RoleMutation::Add(CosmeticRole::Deaf),
            ]
        );
        assert_eq!(
            outcome.announcements,
            vec![Announcement::CameraOn, Announcement::SpeakerMuted]
        );
    }

    #[test]
    fn speaker_mute_replaces_mic_message() {
        let flags = VoiceFlags {
            speaker_muted: true,
            mic_muted: true,
            ..VoiceFlags::default()
        };
        let outcome = synchronize(flags, CosmeticRoleSet::default());
        assert_eq!(outcome.mutations, vec![RoleMutation::Add(CosmeticRole::Deaf)]);
        assert_eq!(outcome.announcements, vec![Announcement::SpeakerMuted]);
    }

    #[test]
    fn announcement_labels() {
        assert_eq!(Announcement::ScreenShareEnded.label(), "screen_share_ended");
        assert_eq!(Announcement::Joined("general".into()).label(), "joined");
    }
}
