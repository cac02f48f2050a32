//! Display controller implementations

pub mod epd1in9;

pub use epd1in9::{DisplayError, Epd1in9, Epd1in9Config};
