//! Debounced remote selector.
//!
//! ## Architecture
//!
//! - `QueryEngine` runs debounced searches on a tokio runtime and keeps
//!   only the latest response (sequence-number comparison)
//! - `SelectionStore` holds the ordered, unique selection and reports
//!   every mutation through a callback
//! - `Hydrator` fetches display records for the selected ids
//! - `PickerController` wires the three together and derives popover
//!   visibility
//!
//! ## Usage
//!
//! ```ignore
//! let source = PickerPreset::Posts.source(client, resolver, None);
//! let options = PickerPreset::Posts.options(SelectionValue::Multi(vec![]));
//! let mut picker = PickerController::new(source, options, runtime.handle().clone())
//!     .with_on_change(Box::new(|value| println!("{:?}", value)));
//!
//! picker.input("budget");
//! // ... after the debounce interval and the response
//! picker.pick_result(0);
//! ```

pub mod controller;
pub mod debounce;
pub mod hydrator;
pub mod options;
pub mod query;
pub mod selection;

pub use controller::PickerController;
pub use debounce::DebounceState;
pub use hydrator::Hydrator;
pub use options::{Labels, PickerOptions, PickerPreset, ResultsDisplay};
pub use query::{QueryEngine, QueryPhase, QueryState};
pub use selection::{ChangeCallback, InsertPolicy, SelectionMode, SelectionStore, SelectionValue};
