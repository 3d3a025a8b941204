//! Search result popover.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::view::{PickerFocus, PickerView, fit_label};
use crate::picker::{ResultsDisplay, SelectionMode};

/// Spinner animation frames.
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Widget drawing the result list of the latest search.
pub struct SearchPopoverWidget<'a> {
    view: &'a PickerView,
}

impl<'a> SearchPopoverWidget<'a> {
    #[must_use]
    pub fn new(view: &'a PickerView) -> Self {
        Self { view }
    }

    fn lines(&self, width: usize) -> Vec<Line<'a>> {
        let view = self.view;
        let mut lines = Vec::new();

        if view.query.is_loading() {
            let frame = SPINNER_FRAMES[view.tick % SPINNER_FRAMES.len()];
            lines.push(Line::from(Span::styled(
                format!(" {} Searching...", frame),
                Style::default().fg(Color::Yellow),
            )));
        }

        if view.shows_no_results() {
            lines.push(Line::from(Span::styled(
                format!(" {}", view.labels.no_results),
                Style::default().fg(Color::DarkGray),
            )));
            return lines;
        }

        let checkboxes =
            view.mode == Some(SelectionMode::Multi) || view.display == ResultsDisplay::Inline;
        let focused = view.focus == PickerFocus::Search;

        for (index, record) in view.query.results.iter().enumerate() {
            let highlighted = focused && index == view.result_cursor;
            let style = if highlighted {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let mut spans = Vec::with_capacity(2);
            if checkboxes {
                let mark = if view.is_selected(&record.id) { "[x] " } else { "[ ] " };
                spans.push(Span::styled(mark, Style::default().fg(Color::Green)));
            }
            let label_width = if checkboxes { width.saturating_sub(4) } else { width };
            spans.push(Span::styled(fit_label(&record.label, label_width), style));
            lines.push(Line::from(spans));
        }
        lines
    }
}

impl Widget for SearchPopoverWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area);
        block.render(area, buf);

        // Keep the highlighted row on screen.
        let lines = self.lines(usize::from(inner.width));
        let visible = usize::from(inner.height.max(1));
        let skip = (self.view.result_cursor + 1).saturating_sub(visible);
        let lines: Vec<Line> = lines.into_iter().skip(skip).collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Identifier, Record};
    use crate::picker::{QueryPhase, QueryState};

    fn render(view: &PickerView) -> String {
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        SearchPopoverWidget::new(view).render(area, &mut buf);

        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn settled(results: Vec<Record>) -> QueryState {
        QueryState {
            input_text: "bud".to_string(),
            results,
            phase: QueryPhase::Settled,
            last_request: 1,
        }
    }

    #[test]
    fn test_no_results_message() {
        let view = PickerView {
            query: settled(vec![]),
            ..PickerView::default()
        };
        assert!(render(&view).contains("No Results Found. Sorry."));
    }

    #[test]
    fn test_spinner_while_loading() {
        let view = PickerView {
            query: QueryState {
                phase: QueryPhase::Loading,
                ..settled(vec![])
            },
            ..PickerView::default()
        };
        let text = render(&view);
        assert!(text.contains("Searching..."));
        assert!(!text.contains("No Results"));
    }

    #[test]
    fn test_multi_mode_marks_selected() {
        let view = PickerView {
            mode: Some(SelectionMode::Multi),
            query: settled(vec![Record::new(1u64, "One"), Record::new(2u64, "Two")]),
            selected_ids: vec![Identifier::Int(2)],
            ..PickerView::default()
        };
        let text = render(&view);
        assert!(text.contains("[ ] One"));
        assert!(text.contains("[x] Two"));
    }

    #[test]
    fn test_single_mode_has_no_checkboxes() {
        let view = PickerView {
            mode: Some(SelectionMode::Single),
            query: settled(vec![Record::new(1u64, "One")]),
            ..PickerView::default()
        };
        let text = render(&view);
        assert!(text.contains("One"));
        assert!(!text.contains("[ ]"));
    }
}
