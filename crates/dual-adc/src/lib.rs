//! Dual ADC coordination
//!
//! Routes conversion requests across one or two ADC modules and runs
//! synchronized conversions on both, borrowing modules that are busy with
//! other work and handing them back afterwards.
//!
//! # Layers
//!
//! ```text
//! Adc (facade: single, synchronized and continuous reads)
//!         ↓
//! Dispatch policy / preemption protocol
//!         ↓
//! Module (workload, pending restore) wrapping a platform::AdcModule driver
//! ```
//!
//! Readings are plain `i32` values with [`ERROR_VALUE`] standing in for a
//! failed conversion; the reason is recorded in the module's
//! [`FailFlags`]. Operations that start or stop something return
//! [`Result`] with [`AdcError`].
//!
//! The only suspension point is the polling loop of the blocking reads,
//! which yields to the executor between polls. Without an executor, drive
//! them with [`embassy_futures::block_on`].
//!
//! # Features
//!
//! - `std`: `std::error::Error` for [`AdcError`]
//! - `defmt`: log through defmt and derive `defmt::Format`
//! - `tracing`: log through tracing (host builds)

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(feature = "std")]
extern crate std;

// Must come first so the log macros are visible to every other module.
mod fmt;

pub mod adc;
pub mod config;
pub mod continuous;
pub mod dispatch;
pub mod error;
pub mod module;
pub mod preempt;
pub mod sync;

pub use adc::Adc;
pub use config::{AdcConfig, DispatchPolicy, NUM_MODULES};
pub use error::AdcError;
pub use module::Module;
pub use sync::SyncResult;

pub use platform::{
    AdcModule, AdcSelect, ConversionRequest, FailFlags, ModuleId, Pin, Resolution, ERROR_VALUE,
};
