//! Currently-selected list.
//!
//! One chip per hydrated record, each with a remove hint.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::view::{PickerFocus, PickerView, fit_label};

/// Widget listing the selected records.
pub struct CurrentlySelectedWidget<'a> {
    view: &'a PickerView,
}

impl<'a> CurrentlySelectedWidget<'a> {
    #[must_use]
    pub fn new(view: &'a PickerView) -> Self {
        Self { view }
    }

    /// Rows needed to draw every chip plus the border.
    #[must_use]
    pub fn height(view: &PickerView) -> u16 {
        let rows = u16::try_from(view.selected_records.len()).unwrap_or(u16::MAX);
        rows.saturating_add(2)
    }
}

impl Widget for CurrentlySelectedWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let focused = self.view.focus == PickerFocus::Chips;
        let border_color = if focused { Color::Cyan } else { Color::DarkGray };

        let block = Block::default()
            .title(format!(" {} ", self.view.labels.selected))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        block.render(area, buf);

        // Room for the padding and the remove hint.
        let label_width = usize::from(inner.width).saturating_sub(4);
        let lines: Vec<Line> = self
            .view
            .selected_records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let highlighted = focused && index == self.view.chip_cursor;
                let style = if highlighted {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::styled(format!(" {} ", fit_label(&record.label, label_width)), style),
                    Span::styled(" X", Style::default().fg(Color::Red)),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
