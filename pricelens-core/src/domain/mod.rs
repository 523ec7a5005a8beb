//! Domain types: raw bars, annotated bars, the instrument dataset.

pub mod annotated;
pub mod bar;
pub mod dataset;

pub use annotated::AnnotatedBar;
pub use bar::{validate_series, Bar};
pub use dataset::InstrumentDataset;

/// Symbol type alias
pub type Symbol = String;
