//! Voice presence handling for the Cal bot.
//!
//! Derives, from a member's live voice flags and the cosmetic roles they
//! currently hold, which state transition just happened and which role
//! changes and announcements it implies. Everything in this crate is a pure
//! function of its inputs: callers apply the returned role mutations and
//! post the rendered announcements themselves.
//!
//! - [`sync`]: the streaming/camera and speaker-mute state machines used
//!   while a member stays in the same channel.
//! - [`membership`]: the join/leave/move flow, which bypasses the state
//!   machines and resets the role cache.
//! - [`announce`]: rendering of announcements into log-channel text.
//! - [`autopilot`]: whether the bot itself should join or leave a channel.

pub mod announce;
pub mod autopilot;
pub mod membership;
pub mod sync;

pub use announce::{clock_stamp, display_name, render};
pub use autopilot::{should_join, should_leave, Occupant};
pub use membership::{evaluate, ChannelChange, ChannelRef};
pub use sync::{synchronize, Announcement, DeafState, StreamState, SyncOutcome};
