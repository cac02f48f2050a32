//! Hardware driver implementations for the Psychron display
//!
//! This crate provides the concrete display controller built on the
//! abstractions in `psychron-core` and `psychron-hal`:
//!
//! - Reset handshake and init command sequence
//! - Waveform (LUT) selection for full, partial, and blanking refreshes
//! - Segment frame transfer and refresh triggering over I2C
//! - Bounded busy-waits with surfaced timeouts
//! - Frame-time compensation for cold panels

#![no_std]
#![deny(unsafe_code)]

pub mod display;
