//! Records found within the supported input formats.

pub mod alignment;
pub mod fimo;
pub mod hit;

pub use hit::Record;
