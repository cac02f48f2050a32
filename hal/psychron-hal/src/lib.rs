//! Psychron Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware traits the display driver is
//! generic over. The driver borrows an I2C bus, a reset pin, a busy pin,
//! and a delay provider; platform code supplies implementations for the
//! target board.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (main loop, sensor glue)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  psychron-drivers (display controller)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  psychron-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ platform GPIO │       │ embedded-hal  │
//! │ + I2C drivers │       │ 1.0 adapters  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`delay::DelayUs`] - Blocking delays
//!
//! With the `embedded-hal` feature, the [`ehal`] module provides wrapper
//! types implementing these traits for any `embedded-hal` 1.0
//! implementation.

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod i2c;

#[cfg(feature = "embedded-hal")]
pub mod ehal;

// Re-export key traits at crate root for convenience
pub use delay::DelayUs;
pub use gpio::{InputPin, OutputPin};
pub use i2c::I2cBus;
