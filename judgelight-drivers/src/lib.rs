//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in judgelight-core over `embedded-hal` digital pins:
//!
//! - Debounced judge buttons and the host operator button
//! - Module LED bank (white, red, indicator, board)
//! - Host lamp bank (per-seat white/red lamps, blue status lamp, board)

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod indicator;

pub use button::{DebouncedButton, ModuleButtons, OperatorButton};
pub use indicator::{HostLamps, ModuleLeds, SeatLamps};
