//! Render snapshot of a picker.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::{Identifier, Record};
use crate::picker::{
    Labels, PickerController, QueryPhase, QueryState, ResultsDisplay, SelectionMode,
};

/// Which part of the picker receives keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PickerFocus {
    /// The search field and its result list.
    #[default]
    Search,
    /// The currently-selected chips.
    Chips,
}

/// Everything the widgets need to draw one frame.
///
/// Taken from the controller once per frame so rendering never touches
/// the shared engine state.
#[derive(Debug, Clone, Default)]
pub struct PickerView {
    pub labels: Labels,
    pub display: ResultsDisplay,
    pub mode: Option<SelectionMode>,
    pub query: QueryState,
    pub popover_visible: bool,
    pub selected_ids: Vec<Identifier>,
    pub selected_records: Vec<Record>,
    pub hydrating: bool,
    pub focus: PickerFocus,
    /// Highlighted result row.
    pub result_cursor: usize,
    /// Highlighted chip.
    pub chip_cursor: usize,
    /// Animation frame for the spinner.
    pub tick: usize,
}

impl PickerView {
    /// Captures the controller state.
    #[must_use]
    pub fn capture(controller: &PickerController) -> Self {
        Self {
            labels: controller.labels().clone(),
            display: controller.display(),
            mode: Some(controller.mode()),
            query: controller.query_state(),
            popover_visible: controller.is_popover_visible(),
            selected_ids: controller.selection().ids().to_vec(),
            selected_records: controller.selected_records(),
            hydrating: controller.is_hydrating(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_focus(mut self, focus: PickerFocus) -> Self {
        self.focus = focus;
        self
    }

    #[must_use]
    pub fn with_cursors(mut self, result_cursor: usize, chip_cursor: usize) -> Self {
        self.result_cursor = result_cursor;
        self.chip_cursor = chip_cursor;
        self
    }

    #[must_use]
    pub fn with_tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    /// Whether a record is part of the selection.
    #[must_use]
    pub fn is_selected(&self, id: &Identifier) -> bool {
        self.selected_ids.contains(id)
    }

    /// Whether the "no results" line applies.
    #[must_use]
    pub fn shows_no_results(&self) -> bool {
        self.query.phase == QueryPhase::Settled && self.query.results.is_empty()
    }
}

/// Cuts `label` to at most `max_width` columns, ending with `…` when cut.
#[must_use]
pub fn fit_label(label: &str, max_width: usize) -> String {
    if label.width() <= max_width {
        return label.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut fitted = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        fitted.push(c);
        used += w;
    }
    fitted.push('…');
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_label() {
        assert_eq!(fit_label("Budget", 10), "Budget");
        assert_eq!(fit_label("Budget Report", 7), "Budget…");
        assert_eq!(fit_label("日本語", 4), "日…");
        assert_eq!(fit_label("abc", 0), "");
    }
}
