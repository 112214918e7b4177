//! Data models

pub mod event;
pub mod params;
pub mod report;

pub use event::*;
pub use params::*;
pub use report::*;
