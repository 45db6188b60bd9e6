mod config;
mod controller;
mod notify;
mod player;
mod tui;
mod visualizer;

use std::path::{Path, PathBuf};
use std::thread;

use color_eyre::Result;
use crossbeam::channel::{bounded, unbounded};

use crate::controller::PlaybackController;
use crate::notify::Toasts;
use crate::player::{Player, PlayerCommand, PlayerEvent};

fn main() -> Result<()> {
    color_eyre::install()?;

    let mut config = config::Config::load()?;
    // a path on the command line overrides the configured track
    if let Some(path) = std::env::args().nth(1) {
        config.track = Some(PathBuf::from(path));
    }

    // commands from the controller to the player thread
    let (command_tx, command_rx) = bounded::<PlayerCommand>(16);
    // lifecycle events back from the player, the authoritative state stream
    let (event_tx, event_rx) = unbounded::<PlayerEvent>();

    let mut controller = None;
    if let Some(track) = config.track.clone() {
        // no track or no output device just means the player is disabled;
        // the rest of the UI must still come up
        if let Ok(mut player) = Player::new(track, config.volume, event_tx) {
            thread::spawn(move || player.run(command_rx));
            controller = Some(PlaybackController::new(command_tx, config.volume));
        }
    }

    let track_title = config
        .track
        .as_deref()
        .map(title_from_path)
        .unwrap_or_else(|| "podtune".to_string());
    let toasts = Toasts::new(config.notification_timeout());

    tui::run(controller, event_rx, toasts, track_title)
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
