//! relpick
//!
//! Debounced remote selectors for relating WordPress content: search posts
//! or network sites over the `wp-json` REST API, keep an ordered unique
//! selection, and show the selected items hydrated from the server.
//!
//! # Architecture
//!
//! - **API Module**: REST client trait, reqwest client, wire records
//! - **Endpoint Module**: collection URL resolution
//! - **Source Module**: post and site record sources
//! - **Picker Module**: query engine, selection store, hydrator, controller
//! - **UI / App Modules**: ratatui widgets and the interactive picker
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use relpick::api::{HttpRestClient, RestClient};
//! use relpick::endpoint::{ApiEnvironment, EndpointResolver};
//! use relpick::picker::{PickerController, PickerPreset, SelectionValue};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let client: Arc<dyn RestClient> = Arc::new(HttpRestClient::default());
//! let resolver = Arc::new(EndpointResolver::new(
//!     Arc::clone(&client),
//!     ApiEnvironment::new("https://example.com"),
//! ));
//! let source = PickerPreset::Posts.source(client, resolver, None);
//! let options = PickerPreset::Posts.options(SelectionValue::Multi(vec![]));
//! let mut picker = PickerController::new(source, options, runtime.handle().clone());
//! picker.input("budget");
//! ```

// Clippy configuration - allow common patterns
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod endpoint;
pub mod logging;
pub mod picker;
pub mod source;
pub mod ui;

// Re-export main types
pub use app::{AppOutcome, PickerApp};
pub use config::Config;
pub use endpoint::{ApiEnvironment, EndpointConfig, EndpointResolver};
pub use picker::{PickerController, PickerOptions, PickerPreset, SelectionValue};
