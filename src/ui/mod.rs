//! User interface module.
//!
//! Ratatui widgets for the picker. Widgets draw a [`PickerView`] snapshot
//! and never touch the controller directly.

pub mod currently_selected;
pub mod picker_widget;
pub mod search_popover;
pub mod view;

pub use currently_selected::CurrentlySelectedWidget;
pub use picker_widget::PickerWidget;
pub use search_popover::SearchPopoverWidget;
pub use view::{PickerFocus, PickerView};
