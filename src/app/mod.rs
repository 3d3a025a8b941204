//! Interactive picker application.
//!
//! Owns a [`PickerController`] and drives it from crossterm key events.

mod input;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use tracing::info;

use crate::picker::{PickerController, SelectionValue};
use crate::ui::{PickerFocus, PickerView, PickerWidget};

/// Event poll timeout in milliseconds.
const POLL_TIMEOUT_MS: u64 = 50;

/// How the application ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppOutcome {
    /// The user confirmed this selection.
    Confirmed(SelectionValue),
    /// The user left without confirming.
    Cancelled,
}

/// Application state.
pub struct PickerApp {
    /// The picker being driven.
    controller: PickerController,
    /// Which part of the picker receives keys.
    focus: PickerFocus,
    /// Highlighted result row.
    result_cursor: usize,
    /// Highlighted chip.
    chip_cursor: usize,
    /// Spinner frame counter.
    tick: usize,
    /// Set once the user confirms or cancels.
    outcome: Option<AppOutcome>,
}

impl PickerApp {
    /// Creates an application around a picker.
    #[must_use]
    pub fn new(controller: PickerController) -> Self {
        Self {
            controller,
            focus: PickerFocus::Search,
            result_cursor: 0,
            chip_cursor: 0,
            tick: 0,
            outcome: None,
        }
    }

    /// Returns true while the application should keep running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.outcome.is_none()
    }

    /// Returns how the application ended, if it has.
    #[must_use]
    pub fn outcome(&self) -> Option<&AppOutcome> {
        self.outcome.as_ref()
    }

    /// Consumes the application, returning its outcome.
    #[must_use]
    pub fn into_outcome(self) -> AppOutcome {
        self.outcome.clone().unwrap_or(AppOutcome::Cancelled)
    }

    #[must_use]
    pub fn controller(&self) -> &PickerController {
        &self.controller
    }

    #[must_use]
    pub fn focus(&self) -> PickerFocus {
        self.focus
    }

    /// Captures the current frame.
    #[must_use]
    pub fn view(&self) -> PickerView {
        PickerView::capture(&self.controller)
            .with_focus(self.focus)
            .with_cursors(self.result_cursor, self.chip_cursor)
            .with_tick(self.tick)
    }

    /// Renders the application.
    pub fn render(&self, frame: &mut ratatui::Frame) {
        let view = self.view();
        frame.render_widget(PickerWidget::new(&view), frame.area());
    }

    /// Waits briefly for one input event and handles it.
    ///
    /// # Errors
    /// Returns error if reading terminal events fails.
    pub fn update(&mut self) -> io::Result<()> {
        self.tick = self.tick.wrapping_add(1);

        if event::poll(Duration::from_millis(POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    fn finish(&mut self, outcome: AppOutcome) {
        info!("[APP] Finished: {:?}", outcome);
        self.controller.shutdown();
        self.outcome = Some(outcome);
    }
}
