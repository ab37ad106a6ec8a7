//! # errkind — error kinds with throttled stack capture
//!
//! Reusable error *templates* are instantiated into *occurrences* that carry
//! a captured call stack, per-occurrence values and an optional wrapped
//! cause. Chains can mix occurrences with any other `std::error::Error`, and
//! are matched by template identity rather than by type or message text.
//!
//! ## Design
//!
//! ```text
//! Template ──instantiate/args/wrap/set──▶ Occurrence ──wrap──▶ cause (any Error)
//!    │                                        │
//!    └── identity (Arc) ◀──────── template ───┘
//! ```
//!
//! - **Template**: immutable message pattern + base values. Cheap to clone,
//!   identity is its allocation.
//! - **Occurrence**: private copy of the base values, frames captured at the
//!   call site (subject to the [`Throttle`]), builder methods by value.
//! - **Chain**: [`first`], [`last`], [`matches`] and [`extract`] walk
//!   `Error::source()` links.
//! - **Attributes**: [`Occurrence::attributes`] projects an occurrence into a
//!   tree for structured logging.
//!
//! ## Quick Start
//!
//! ```rust
//! use errkind::{define_template, extract, ValueAccess};
//!
//! define_template! {
//!     pub static ERR_OPEN = "can not open file %s";
//!     pub static ERR_LOAD = "loading configuration failed";
//! }
//!
//! fn open(path: &str) -> Result<(), errkind::Occurrence> {
//!     let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
//!     Err(ERR_OPEN.args([path]).set("path", path).wrap(io))
//! }
//!
//! fn load() -> Result<(), errkind::Occurrence> {
//!     open("app.toml").map_err(|e| ERR_LOAD.wrap(e))
//! }
//!
//! let err = load().unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "loading configuration failed: can not open file app.toml: no such file"
//! );
//! assert!(ERR_OPEN.matches(&err));
//!
//! let mut slot = Some(ERR_OPEN.instantiate());
//! assert!(extract(&err, &mut slot));
//! assert_eq!(slot.unwrap().get_str("path"), Some("app.toml"));
//! ```
//!
//! ## Throttling
//!
//! Capturing a stack costs microseconds. Under error storms, cap it:
//!
//! ```rust
//! use std::time::Duration;
//!
//! errkind::throttle(Duration::from_millis(100), 50).unwrap();
//! // at most 50 occurrences per 100ms carry frames; the rest have none
//! errkind::unthrottle();
//! ```

#[macro_use]
mod macros;

mod error;
mod format;
mod occurrence;
mod template;
mod value;

pub mod attrs;
pub mod chain;
pub mod config;
pub mod frame;
pub mod throttle;

// ── Public API ────────────────────────────────────────────────────

pub use attrs::{Attr, AttrValue};
pub use chain::{chain, extract, first, last, matches, Chain};
pub use config::{configure, CaptureConfig};
pub use error::{ConfigError, ConfigResult};
pub use frame::{Frame, Frames};
pub use occurrence::{Cause, Occurrence, CAUSE_SEPARATOR};
pub use template::{Template, TemplateId};
pub use throttle::{throttle, unthrottle, Throttle};
pub use value::{AnyValue, Value, ValueAccess, Values};

/// Glob-importable names for typical use.
pub mod prelude {
    pub use crate::{define_template, values};
    pub use crate::{extract, first, last, matches};
    pub use crate::{Occurrence, Template, Value, ValueAccess, Values};
}
