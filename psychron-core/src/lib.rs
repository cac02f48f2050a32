//! Board-agnostic core logic for the segment e-ink display
//!
//! This crate contains everything that does not touch hardware:
//!
//! - The 15-byte segment frame and its vendor byte layout
//! - The vendor glyph and bit tables
//! - The pure value-to-segment encoder
//! - Refresh-mode and lifecycle state types
//!
//! All of it is host-testable; the hardware sequencing lives in
//! `psychron-drivers`.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod encode;
pub mod frame;
pub mod glyph;
pub mod state;
