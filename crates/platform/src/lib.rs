//! Hardware abstraction for Kinetis-style dual ADC peripherals
//!
//! This crate defines the contract between register-level ADC drivers and the
//! coordination layer in `dual-adc`, plus the value types both sides share.
//!
//! # Architecture Layers
//!
//! ```text
//! Application
//!         ↓
//! Coordination (dual-adc: dispatch, preemption, synchronized reads)
//!         ↓
//! Platform HAL (this crate - AdcModule trait, pin maps)
//!         ↓
//! Register-level driver (one per ADC module)
//! ```
//!
//! # Modules
//!
//! - [`adc`] - The [`AdcModule`] driver trait
//! - [`types`] - Pins, requests, resolutions, failure flags
//! - [`pin_map`] - Per-board pin eligibility tables
//! - [`mocks`] - Simulated module driver (`std` feature or tests)
//!
//! # Features
//!
//! - `std`: Enable standard library support and the simulated driver
//! - `defmt`: Enable `defmt::Format` on all public types
//!
//! # Example
//!
//! ```no_run
//! use platform::{AdcModule, Pin};
//!
//! fn can_read<M: AdcModule>(module: &M) -> bool {
//!     module.check_pin(Pin(14))
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(feature = "std")]
extern crate std;

pub mod adc;
pub mod mocks;
pub mod pin_map;
pub mod types;

pub use adc::AdcModule;
pub use pin_map::{DiffPair, PinMap};
pub use types::{
    AdcSelect, ChannelTrigger, ConversionRequest, FailFlags, ModuleId, Pin, Resolution,
    ERROR_VALUE,
};

#[cfg(any(test, feature = "std"))]
pub use mocks::{SimAdcModule, SimBus, SimEvent, SimMode, SimSnapshot};
