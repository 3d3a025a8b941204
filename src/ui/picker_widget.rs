//! Full picker widget.
//!
//! Stacks the selected chips, the search bar, the result list (when
//! visible) and a key hint footer.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::currently_selected::CurrentlySelectedWidget;
use super::search_popover::SearchPopoverWidget;
use super::view::{PickerFocus, PickerView};

/// Key hints shown in the footer.
const FOOTER_HINTS: &str = " Enter pick | Tab chips | Del remove | Ctrl+S confirm | Esc close ";

/// Widget rendering a complete picker.
pub struct PickerWidget<'a> {
    view: &'a PickerView,
}

impl<'a> PickerWidget<'a> {
    #[must_use]
    pub fn new(view: &'a PickerView) -> Self {
        Self { view }
    }

    fn render_search_bar(&self, area: Rect, buf: &mut Buffer) {
        let focused = self.view.focus == PickerFocus::Search;
        let border_color = if focused { Color::Cyan } else { Color::DarkGray };

        let block = Block::default()
            .title(format!(" {} ", self.view.labels.search))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut spans = vec![Span::styled(
            self.view.query.input_text.clone(),
            Style::default().fg(Color::White),
        )];
        if focused {
            spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        }
        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

impl Widget for PickerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chips_height = CurrentlySelectedWidget::height(self.view);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(chips_height),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        CurrentlySelectedWidget::new(self.view).render(chunks[0], buf);
        self.render_search_bar(chunks[1], buf);
        if self.view.popover_visible && chunks[2].height > 2 {
            SearchPopoverWidget::new(self.view).render(chunks[2], buf);
        }
        Paragraph::new(FOOTER_HINTS)
            .style(Style::default().fg(Color::DarkGray))
            .render(chunks[3], buf);
    }
}
