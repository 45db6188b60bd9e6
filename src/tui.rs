//! Terminal UI: the player card, status line, visualizer bars and toasts.

use std::time::{Duration, Instant};

use color_eyre::Result;
use crossbeam::channel::Receiver;
use ratatui::{
    DefaultTerminal,
    crossterm::event::{Event, KeyCode, KeyEventKind, poll, read},
    layout::Flex,
    prelude::*,
    widgets::{Block, Clear, Paragraph},
};

use crate::controller::{PlayIcon, PlaybackController, StatusTone, VolumeIcon};
use crate::notify::{Notice, Toasts};
use crate::player::PlayerEvent;
use crate::visualizer::Visualizer;

const BAR_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Draw cadence; also bounds how long a key press waits.
const TICK: Duration = Duration::from_millis(33);

struct App {
    /// None when no track is configured: the card renders disabled and
    /// everything but quit is ignored.
    controller: Option<PlaybackController>,
    event_rx: Receiver<PlayerEvent>,
    toasts: Toasts,
    track_title: String,
}

impl App {
    fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            terminal.draw(|f| self.draw(f, now))?;

            // drain player events; their word beats whatever a request set
            while let Ok(event) = self.event_rx.try_recv() {
                if let Some(controller) = self.controller.as_mut() {
                    if let Some(notice) = controller.handle_event(event) {
                        self.toasts.show(notice, Instant::now());
                    }
                }
            }

            if poll(TICK)? {
                if let Event::Key(key) = read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Some(controller) = self.controller.as_mut() {
                        controller.on_user_interaction();
                    }
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char(' ') | KeyCode::Enter => {
                            if let Some(controller) = self.controller.as_mut() {
                                controller.toggle_playback();
                            }
                        }
                        KeyCode::Char('m') => {
                            if let Some(controller) = self.controller.as_mut() {
                                let notice = controller.toggle_mute();
                                self.toasts.show(notice, Instant::now());
                            }
                        }
                        _ => (),
                    }
                }
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame, now: Instant) {
        let area = frame.area();
        let card = Self::card_area(area);

        match &self.controller {
            Some(controller) => render_player(frame, card, controller, &self.track_title, now),
            None => render_disabled(frame, card),
        }

        if let Some(notice) = self.toasts.visible(now) {
            render_toast(frame, area, notice);
        }
    }

    fn card_area(area: Rect) -> Rect {
        let vertical = Layout::vertical([Constraint::Length(7)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Percentage(60)]).flex(Flex::Center);
        let [area] = vertical.areas(area);
        let [area] = horizontal.areas(area);
        area
    }
}

fn render_player(
    frame: &mut Frame,
    area: Rect,
    controller: &PlaybackController,
    track_title: &str,
    now: Instant,
) {
    let border_style = if controller.is_playing {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::bordered()
        .title(" podtune ")
        .border_style(border_style);

    let play_label = match controller.play_icon {
        PlayIcon::Play => "[ ▶ ]",
        PlayIcon::Pause => "[ ⏸ ]",
    };
    let volume_label = match controller.volume_icon {
        VolumeIcon::Unmuted => "[ ♪ ]",
        VolumeIcon::Muted => "[ ✕ ]",
    };
    let mut play_style = Style::default().add_modifier(Modifier::BOLD);
    if controller.play_pressed(now) {
        play_style = play_style.add_modifier(Modifier::REVERSED);
    }
    let mut volume_style = Style::default().add_modifier(Modifier::BOLD);
    if controller.mute_pressed(now) {
        volume_style = volume_style.add_modifier(Modifier::REVERSED);
    }
    let status_style = match controller.tone {
        StatusTone::Neutral => Style::default(),
        StatusTone::Playing => Style::default().fg(Color::Cyan),
        StatusTone::Error => Style::default().fg(Color::Red),
    };

    let mut controls = vec![
        Span::styled(play_label, play_style),
        Span::raw(" "),
        Span::styled(volume_label, volume_style),
        Span::raw("  "),
        Span::styled(controller.status, status_style),
    ];
    if let Some(visualizer) = &controller.visualizer {
        controls.push(Span::raw("  "));
        controls.push(Span::styled(
            bars(visualizer, now),
            Style::default().fg(Color::Cyan),
        ));
    }

    let text = vec![
        Line::from(Span::styled(
            track_title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(controls),
        Line::from(""),
        Line::from(Span::styled(
            "space play/pause · m mute · q quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn render_disabled(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from("No background track configured"),
        Line::from(""),
        Line::from(Span::styled("q quit", Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::bordered().title(" podtune ")),
        area,
    );
}

fn render_toast(frame: &mut Frame, area: Rect, notice: &Notice) {
    let width = (notice.message.chars().count() as u16 + 4).min(area.width);
    let toast = Rect {
        x: area.right().saturating_sub(width + 2),
        y: area.y + 1,
        width,
        height: 3,
    };
    frame.render_widget(Clear, toast);
    let block = Block::bordered().border_style(Style::default().fg(notice.severity.color()));
    frame.render_widget(
        Paragraph::new(notice.message.as_str())
            .alignment(Alignment::Center)
            .block(block),
        toast,
    );
}

fn bars(visualizer: &Visualizer, now: Instant) -> String {
    visualizer
        .levels(now)
        .iter()
        .map(|level| {
            let top = BAR_GLYPHS.len() - 1;
            let idx = ((level * top as f32).round() as usize).min(top);
            BAR_GLYPHS[idx]
        })
        .collect()
}

pub fn run(
    controller: Option<PlaybackController>,
    event_rx: Receiver<PlayerEvent>,
    toasts: Toasts,
    track_title: String,
) -> Result<()> {
    let terminal = ratatui::init();
    let app_result = App {
        controller,
        event_rx,
        toasts,
        track_title,
    }
    .run(terminal);
    ratatui::restore();
    app_result
}
