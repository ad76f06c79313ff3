//! Console value model and inspection.
//!
//! [`Value`] is what console methods receive; [`Inspector`] is the narrow
//! pretty-printing capability the console renders non-string arguments
//! through. [`DefaultInspector`] provides the conventional developer-console
//! layout.

pub mod inspect;
pub mod value;

pub use inspect::{DefaultInspector, Depth, InspectOptions, Inspector, inspect, number_repr};
pub use value::{ErrorValue, Value, format_number};
