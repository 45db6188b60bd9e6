//! Transient toast notifications.
//!
//! One toast is visible at a time; showing a new one replaces the old,
//! and each auto-dismisses after a fixed delay.

use std::time::{Duration, Instant};

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    #[allow(dead_code)] // planned: newsletter-style confirmations
    Success,
    #[allow(dead_code)] // planned: local input validation
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn color(self) -> Color {
        match self {
            Severity::Success => Color::Green,
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Blue,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

pub struct Toasts {
    current: Option<(Notice, Instant)>,
    timeout: Duration,
}

impl Toasts {
    pub fn new(timeout: Duration) -> Self {
        Self {
            current: None,
            timeout,
        }
    }

    /// Replaces whatever is currently shown.
    pub fn show(&mut self, notice: Notice, now: Instant) {
        self.current = Some((notice, now));
    }

    /// The visible notice, if it hasn't timed out yet.
    pub fn visible(&mut self, now: Instant) -> Option<&Notice> {
        let expired = match &self.current {
            Some((_, shown_at)) => now.duration_since(*shown_at) >= self.timeout,
            None => false,
        };
        if expired {
            self.current = None;
        }
        self.current.as_ref().map(|(notice, _)| notice)
    }
}
