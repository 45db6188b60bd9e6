//! Playback controller.
//!
//! Reconciles what the user asked for with what the player actually did.
//! Requests (`toggle_playback`, `toggle_mute`) send commands and apply at
//! most a little optimistic feedback; the player's own event stream, fed
//! through `handle_event`, always has the last word on the status line,
//! the icons and the visualizer.

use std::time::{Duration, Instant};

use crossbeam::channel::Sender;

use crate::notify::{Notice, Severity};
use crate::player::{PlayerCommand, PlayerEvent};
use crate::visualizer::Visualizer;

/// How long an activated control stays visually pressed.
const PRESS_FEEDBACK: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Neutral,
    Playing,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayIcon {
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeIcon {
    Unmuted,
    Muted,
}

pub struct PlaybackController {
    command_tx: Sender<PlayerCommand>,
    /// Volume restored on unmute; also the initial volume.
    unmuted_volume: f32,
    pub is_playing: bool,
    pub is_muted: bool,
    has_user_interacted: bool,
    pub status: &'static str,
    pub tone: StatusTone,
    pub play_icon: PlayIcon,
    pub volume_icon: VolumeIcon,
    pub visualizer: Option<Visualizer>,
    play_pressed_at: Option<Instant>,
    mute_pressed_at: Option<Instant>,
}

impl PlaybackController {
    pub fn new(command_tx: Sender<PlayerCommand>, unmuted_volume: f32) -> Self {
        Self {
            command_tx,
            unmuted_volume,
            is_playing: false,
            is_muted: false,
            has_user_interacted: false,
            status: "Click to play",
            tone: StatusTone::Neutral,
            play_icon: PlayIcon::Play,
            volume_icon: VolumeIcon::Unmuted,
            visualizer: None,
            play_pressed_at: None,
            mute_pressed_at: None,
        }
    }

    /// The first key press of any kind unlocks loading the track.
    /// Every later call is a no-op.
    pub fn on_user_interaction(&mut self) {
        if self.has_user_interacted {
            return;
        }
        self.has_user_interacted = true;
        let _ = self.command_tx.send(PlayerCommand::Load);
    }

    /// Request a play/pause flip. The pause path tears the visualizer down
    /// immediately; the play path waits for `Started` or `PlayFailed`.
    pub fn toggle_playback(&mut self) {
        self.play_pressed_at = Some(Instant::now());
        if self.is_playing {
            let _ = self.command_tx.send(PlayerCommand::Pause);
            self.remove_visualizer();
        } else {
            let _ = self.command_tx.send(PlayerCommand::Play);
        }
    }

    /// Flip mute. Purely local to the controller: the sink only knows a
    /// volume level, so "muted" means volume zero and unmuting restores
    /// the configured level. Never pauses or resumes playback.
    pub fn toggle_mute(&mut self) -> Notice {
        self.mute_pressed_at = Some(Instant::now());
        if self.is_muted {
            let _ = self
                .command_tx
                .send(PlayerCommand::SetVolume(self.unmuted_volume));
            self.volume_icon = VolumeIcon::Unmuted;
            self.is_muted = false;
            Notice::new("Audio unmuted", Severity::Info)
        } else {
            let _ = self.command_tx.send(PlayerCommand::SetVolume(0.0));
            self.volume_icon = VolumeIcon::Muted;
            self.is_muted = true;
            Notice::new("Audio muted", Severity::Info)
        }
    }

    /// Apply a player lifecycle event, overwriting whatever the request
    /// operations set optimistically. Returns a notice to surface, if any.
    pub fn handle_event(&mut self, event: PlayerEvent) -> Option<Notice> {
        match event {
            PlayerEvent::Started => {
                self.is_playing = true;
                self.play_icon = PlayIcon::Pause;
                self.status = "Now playing";
                self.tone = StatusTone::Playing;
                self.add_visualizer();
                None
            }
            PlayerEvent::Paused => {
                self.is_playing = false;
                self.play_icon = PlayIcon::Play;
                self.status = "Paused";
                self.tone = StatusTone::Neutral;
                self.remove_visualizer();
                None
            }
            PlayerEvent::Ended => {
                self.is_playing = false;
                self.play_icon = PlayIcon::Play;
                self.status = "Ended";
                self.tone = StatusTone::Neutral;
                self.remove_visualizer();
                None
            }
            PlayerEvent::PlayFailed(_) => {
                self.status = "Playback failed";
                self.tone = StatusTone::Error;
                Some(Notice::new(
                    "Unable to play audio. Check your audio output settings.",
                    Severity::Warning,
                ))
            }
            PlayerEvent::Error(_) => {
                self.status = "Audio unavailable";
                self.tone = StatusTone::Error;
                Some(Notice::new(
                    "Unable to load background music",
                    Severity::Warning,
                ))
            }
            PlayerEvent::LoadStarted => {
                self.status = "Loading...";
                None
            }
            PlayerEvent::Ready => {
                if !self.is_playing {
                    self.status = "Ready to play";
                }
                None
            }
        }
    }

    /// Idempotent: a second `Started` while one exists keeps the first.
    fn add_visualizer(&mut self) {
        if self.visualizer.is_none() {
            self.visualizer = Some(Visualizer::new());
        }
    }

    fn remove_visualizer(&mut self) {
        self.visualizer = None;
    }

    pub fn play_pressed(&self, now: Instant) -> bool {
        pressed_within(self.play_pressed_at, now)
    }

    pub fn mute_pressed(&self, now: Instant) -> bool {
        pressed_within(self.mute_pressed_at, now)
    }
}

fn pressed_within(pressed_at: Option<Instant>, now: Instant) -> bool {
    pressed_at.is_some_and(|at| now.duration_since(at) < PRESS_FEEDBACK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_VOLUME;
    use crossbeam::channel::{Receiver, unbounded};

    fn controller() -> (PlaybackController, Receiver<PlayerCommand>) {
        let (tx, rx) = unbounded();
        (PlaybackController::new(tx, DEFAULT_VOLUME), rx)
    }

    #[test]
    fn starts_idle() {
        let (c, _rx) = controller();
        assert_eq!(c.status, "Click to play");
        assert!(!c.is_playing);
        assert!(!c.is_muted);
        assert_eq!(c.play_icon, PlayIcon::Play);
        assert_eq!(c.volume_icon, VolumeIcon::Unmuted);
        assert!(c.visualizer.is_none());
    }

    #[test]
    fn play_request_is_only_confirmed_by_the_event() {
        let (mut c, rx) = controller();
        c.toggle_playback();
        assert_eq!(rx.try_recv().unwrap(), PlayerCommand::Play);
        // nothing confirmed yet
        assert!(!c.is_playing);
        assert!(c.visualizer.is_none());

        assert!(c.handle_event(PlayerEvent::Started).is_none());
        assert!(c.is_playing);
        assert_eq!(c.status, "Now playing");
        assert_eq!(c.tone, StatusTone::Playing);
        assert_eq!(c.play_icon, PlayIcon::Pause);
        assert!(c.visualizer.is_some());
    }

    #[test]
    fn rejected_play_leaves_the_player_stopped() {
        let (mut c, _rx) = controller();
        c.toggle_playback();
        let notice = c
            .handle_event(PlayerEvent::PlayFailed("autoplay blocked".into()))
            .unwrap();
        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(c.status, "Playback failed");
        assert_eq!(c.tone, StatusTone::Error);
        assert!(!c.is_playing);
        assert!(c.visualizer.is_none());
    }

    #[test]
    fn pause_tears_the_visualizer_down_immediately() {
        let (mut c, rx) = controller();
        c.toggle_playback();
        c.handle_event(PlayerEvent::Started);
        rx.try_recv().unwrap();

        c.toggle_playback();
        assert_eq!(rx.try_recv().unwrap(), PlayerCommand::Pause);
        // optimistic teardown, before the Paused event lands
        assert!(c.visualizer.is_none());

        c.handle_event(PlayerEvent::Paused);
        assert_eq!(c.status, "Paused");
        assert!(!c.is_playing);
        assert_eq!(c.play_icon, PlayIcon::Play);
    }

    #[test]
    fn end_of_stream_resets_to_idle() {
        let (mut c, _rx) = controller();
        c.handle_event(PlayerEvent::Started);
        c.handle_event(PlayerEvent::Ended);
        assert_eq!(c.status, "Ended");
        assert!(!c.is_playing);
        assert_eq!(c.play_icon, PlayIcon::Play);
        assert!(c.visualizer.is_none());
    }

    #[test]
    fn mute_round_trips_to_the_default_volume() {
        let (mut c, rx) = controller();
        for _ in 0..3 {
            let notice = c.toggle_mute();
            assert_eq!(notice.message, "Audio muted");
            assert_eq!(notice.severity, Severity::Info);
            assert!(c.is_muted);
            assert_eq!(c.volume_icon, VolumeIcon::Muted);
            assert_eq!(rx.try_recv().unwrap(), PlayerCommand::SetVolume(0.0));

            let notice = c.toggle_mute();
            assert_eq!(notice.message, "Audio unmuted");
            assert_eq!(notice.severity, Severity::Info);
            assert!(!c.is_muted);
            assert_eq!(c.volume_icon, VolumeIcon::Unmuted);
            assert_eq!(
                rx.try_recv().unwrap(),
                PlayerCommand::SetVolume(DEFAULT_VOLUME)
            );
        }
    }

    #[test]
    fn mute_does_not_touch_playback() {
        let (mut c, _rx) = controller();
        c.handle_event(PlayerEvent::Started);
        c.toggle_mute();
        assert!(c.is_playing);
        assert_eq!(c.status, "Now playing");
        assert!(c.visualizer.is_some());
    }

    #[test]
    fn duplicate_started_events_keep_one_visualizer() {
        let (mut c, _rx) = controller();
        c.handle_event(PlayerEvent::Started);
        let first = c.visualizer.as_ref().unwrap().started;
        c.handle_event(PlayerEvent::Started);
        assert_eq!(c.visualizer.as_ref().unwrap().started, first);
    }

    #[test]
    fn first_interaction_loads_exactly_once() {
        let (mut c, rx) = controller();
        c.on_user_interaction();
        assert_eq!(rx.try_recv().unwrap(), PlayerCommand::Load);
        c.on_user_interaction();
        c.on_user_interaction();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn ready_does_not_override_now_playing() {
        let (mut c, _rx) = controller();
        c.handle_event(PlayerEvent::Started);
        c.handle_event(PlayerEvent::Ready);
        assert_eq!(c.status, "Now playing");

        c.handle_event(PlayerEvent::Paused);
        c.handle_event(PlayerEvent::Ready);
        assert_eq!(c.status, "Ready to play");
    }

    #[test]
    fn load_error_is_reported_without_changing_playback() {
        let (mut c, _rx) = controller();
        c.handle_event(PlayerEvent::Started);
        let notice = c
            .handle_event(PlayerEvent::Error("decode failed".into()))
            .unwrap();
        assert_eq!(notice.message, "Unable to load background music");
        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(c.status, "Audio unavailable");
        assert!(c.is_playing);
        assert!(c.visualizer.is_some());
    }

    #[test]
    fn loading_and_ready_statuses() {
        let (mut c, _rx) = controller();
        c.handle_event(PlayerEvent::LoadStarted);
        assert_eq!(c.status, "Loading...");
        c.handle_event(PlayerEvent::Ready);
        assert_eq!(c.status, "Ready to play");
    }

    #[test]
    fn press_feedback_expires() {
        let (mut c, _rx) = controller();
        c.toggle_playback();
        let now = Instant::now();
        assert!(c.play_pressed(now));
        assert!(!c.play_pressed(now + Duration::from_millis(200)));
        assert!(!c.mute_pressed(now));
    }
}
