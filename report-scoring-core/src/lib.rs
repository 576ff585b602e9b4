//! Shared building blocks for the report scoring client.
//!
//! - [`settings`]: process-wide configuration constants (API origin, image
//!   formats, page size, score bounds), loaded once.
//! - [`domain`]: request payloads shared by the SDK and the CLI.
//! - [`routes`]: the static navigation table with lazily loaded views.

pub mod domain;
pub mod error;
pub mod routes;
pub mod settings;

pub use domain::*;
pub use error::*;
pub use routes::{
    LazyView, Navigation, RouteMatch, RouteRecord, RouteSummary, RouteTable, View, ViewKind,
};
pub use settings::{ScoreRange, Settings};
