//! Key handling for the picker application.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{AppOutcome, PickerApp};
use crate::picker::ResultsDisplay;
use crate::ui::PickerFocus;

impl PickerApp {
    /// Handles a key event.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.handle_global_key(key) {
            return;
        }

        match self.focus {
            PickerFocus::Search => self.handle_search_key(key),
            PickerFocus::Chips => self.handle_chip_key(key),
        }
    }

    /// Handles keys valid under any focus. Returns true if handled.
    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                let value = self.controller.value();
                self.finish(AppOutcome::Confirmed(value));
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                self.finish(AppOutcome::Cancelled);
                true
            }
            (_, KeyCode::Tab | KeyCode::BackTab) => {
                self.focus = match self.focus {
                    PickerFocus::Search => PickerFocus::Chips,
                    PickerFocus::Chips => PickerFocus::Search,
                };
                true
            }
            (_, KeyCode::Esc) => {
                let dismissible = self.controller.display() == ResultsDisplay::Popover
                    && self.controller.is_popover_visible();
                if dismissible {
                    self.controller.dismiss_popover();
                } else {
                    self.finish(AppOutcome::Cancelled);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut text = self.controller.input_text();
                text.push(c);
                self.set_input(text);
            }
            KeyCode::Backspace => {
                let mut text = self.controller.input_text();
                if text.pop().is_some() {
                    self.set_input(text);
                }
            }
            KeyCode::Up => self.result_cursor = self.result_cursor.saturating_sub(1),
            KeyCode::Down => {
                let count = self.controller.query_state().results.len();
                if self.result_cursor + 1 < count {
                    self.result_cursor += 1;
                }
            }
            KeyCode::Enter => self.choose_highlighted(),
            _ => {}
        }
    }

    fn handle_chip_key(&mut self, key: KeyEvent) {
        let count = self.controller.selected_records().len();
        match key.code {
            KeyCode::Up | KeyCode::Left => self.chip_cursor = self.chip_cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Right => {
                if self.chip_cursor + 1 < count {
                    self.chip_cursor += 1;
                }
            }
            KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') => {
                let records = self.controller.selected_records();
                if let Some(record) = records.get(self.chip_cursor) {
                    self.controller.remove(&record.id);
                    self.chip_cursor = self.chip_cursor.min(count.saturating_sub(2));
                }
            }
            _ => {}
        }
    }

    fn set_input(&mut self, text: String) {
        self.result_cursor = 0;
        self.controller.input(text);
    }

    /// Picks (popover) or toggles (checklist) the highlighted result.
    fn choose_highlighted(&mut self) {
        if !self.controller.is_popover_visible() {
            return;
        }
        let results = self.controller.query_state().results;
        let Some(record) = results.get(self.result_cursor) else {
            return;
        };

        match self.controller.display() {
            ResultsDisplay::Popover => self.controller.pick(record.id.clone()),
            ResultsDisplay::Inline => self.controller.toggle(record.id.clone()),
        }
    }
}
