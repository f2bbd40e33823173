//! Transient error notice shown in the operator line.

use std::time::{Duration, Instant};

/// How long an error stays visible.
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Default)]
enum NoticeState {
    #[default]
    Hidden,
    Showing { message: String, deadline: Instant },
    /// The message expired; the operator line stays empty until the next edit.
    Blanked,
}

/// One message with a deadline. Showing a new message replaces both.
#[derive(Debug, Clone, Default)]
pub struct ErrorNotice {
    state: NoticeState,
}

impl ErrorNotice {
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.state = NoticeState::Showing {
            message: message.into(),
            deadline: now + NOTICE_DURATION,
        };
    }

    pub fn dismiss(&mut self) {
        self.state = NoticeState::Hidden;
    }

    /// Release a blanked operator line. A visible message is left alone.
    pub fn release(&mut self) {
        if matches!(self.state, NoticeState::Blanked) {
            self.state = NoticeState::Hidden;
        }
    }

    /// Drop the message once its deadline has passed, leaving the line blank.
    pub fn expire(&mut self, now: Instant) {
        if let NoticeState::Showing { deadline, .. } = &self.state
            && now >= *deadline
        {
            self.state = NoticeState::Blanked;
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.state {
            NoticeState::Showing { message, .. } => Some(message),
            NoticeState::Hidden | NoticeState::Blanked => None,
        }
    }

    /// Whether the operator line is held empty after an expired message.
    #[must_use]
    pub fn is_blanked(&self) -> bool {
        matches!(self.state, NoticeState::Blanked)
    }
}
