//! The media resource: a rodio sink driven on its own thread.
//!
//! The player receives commands from the controller and reports every
//! lifecycle transition back as an event. The event stream is the
//! authoritative record of playback state; the controller never assumes
//! a request succeeded until the matching event arrives.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::Result;
use crossbeam::channel::{Receiver, Sender, TryRecvError};
use rodio::Decoder;

type Track = Decoder<BufReader<File>>;

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Begin fetching and decoding the track without playing it.
    Load,
    Play,
    Pause,
    SetVolume(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    LoadStarted,
    Ready,
    Started,
    /// The play request itself was rejected (file missing, undecodable).
    PlayFailed(String),
    Paused,
    Ended,
    /// The track could not be loaded outside of a play request.
    Error(String),
}

pub struct Player {
    path: PathBuf,
    _stream_handle: rodio::OutputStream,
    sink: rodio::Sink,
    event_tx: Sender<PlayerEvent>,
    /// Track decoded by `Load` but not yet handed to the sink.
    prepared: Option<Track>,
    /// Whether the sink currently holds the track.
    appended: bool,
}

impl Player {
    pub fn new(path: PathBuf, volume: f32, event_tx: Sender<PlayerEvent>) -> Result<Self> {
        let _stream_handle = rodio::OutputStreamBuilder::open_default_stream()?;
        let sink = rodio::Sink::connect_new(_stream_handle.mixer());
        sink.set_volume(volume.clamp(0.0, 1.0));
        Ok(Self {
            path,
            _stream_handle,
            sink,
            event_tx,
            prepared: None,
            appended: false,
        })
    }

    pub fn run(&mut self, command_rx: Receiver<PlayerCommand>) {
        loop {
            match command_rx.try_recv() {
                Ok(cmd) => self.handle_command(cmd),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => break,
            }

            // natural end of stream: the sink drained everything we appended
            if self.appended && !self.sink.is_paused() && self.sink.empty() {
                self.appended = false;
                self.send(PlayerEvent::Ended);
            }

            std::thread::sleep(Duration::from_millis(10));
        }
    }

    fn handle_command(&mut self, cmd: PlayerCommand) {
        match cmd {
            PlayerCommand::Load => {
                if self.prepared.is_some() || self.appended {
                    return;
                }
                self.send(PlayerEvent::LoadStarted);
                match decode_track(&self.path) {
                    Ok(track) => {
                        self.prepared = Some(track);
                        self.send(PlayerEvent::Ready);
                    }
                    Err(err) => self.send(PlayerEvent::Error(err.to_string())),
                }
            }

            PlayerCommand::Play => {
                if !self.appended {
                    let track = match self.prepared.take() {
                        Some(track) => track,
                        None => match decode_track(&self.path) {
                            Ok(track) => track,
                            Err(err) => {
                                self.send(PlayerEvent::PlayFailed(err.to_string()));
                                return;
                            }
                        },
                    };
                    self.sink.append(track);
                    self.appended = true;
                }
                self.sink.play();
                self.send(PlayerEvent::Started);
            }

            PlayerCommand::Pause => {
                self.sink.pause();
                self.send(PlayerEvent::Paused);
            }

            PlayerCommand::SetVolume(volume) => {
                self.sink.set_volume(volume.clamp(0.0, 1.0));
            }
        }
    }

    fn send(&self, event: PlayerEvent) {
        // the UI hanging up is not the player's problem
        let _ = self.event_tx.send(event);
    }
}

fn decode_track(path: &Path) -> Result<Track> {
    let file = File::open(path)?;
    Ok(Decoder::new(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_track_fails_to_decode() {
        assert!(decode_track(Path::new("/nonexistent/theme.mp3")).is_err());
    }
}
