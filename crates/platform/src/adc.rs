//! ADC module driver abstraction
//!
//! [`AdcModule`] is the contract between the coordination layer and the
//! register-level driver of one ADC peripheral. The driver owns the hardware
//! state (mode, trigger register, completion and comparator flags); the
//! coordination layer only sequences these operations.
//!
//! Operations that must run with interrupts masked take a
//! [`CriticalSection`] token, so calling them outside a masked window does not
//! compile.

use critical_section::CriticalSection;

use crate::types::{ChannelTrigger, FailFlags, Pin, Resolution};

/// Driver for a single ADC peripheral instance.
pub trait AdcModule {
    /// Everything needed to resume an interrupted conversion exactly as it
    /// was: mode, target pin(s), trigger state.
    ///
    /// Opaque to the coordination layer, which only carries it between
    /// [`save_config`](Self::save_config) and [`load_config`](Self::load_config).
    type Snapshot;

    /// `true` if this module can read `pin` single-ended.
    fn check_pin(&self, pin: Pin) -> bool;

    /// `true` if this module can convert `positive - negative`.
    fn check_differential_pins(&self, positive: Pin, negative: Pin) -> bool;

    /// A conversion is in progress (always `true` in continuous mode).
    fn is_converting(&self) -> bool;

    /// The last conversion finished and its result has not been read yet.
    ///
    /// Stays `false` after a conversion that did not satisfy the compare
    /// condition.
    fn is_complete(&self) -> bool;

    /// The module is configured for continuous conversions.
    fn is_continuous(&self) -> bool;

    /// The module is configured for differential conversions.
    fn is_differential(&self) -> bool;

    /// Read the latched result of a single conversion.
    fn read_single(&mut self) -> i32;

    /// Leave continuous mode; the next start performs one conversion.
    fn single_mode(&mut self);

    /// Start a single-ended conversion without validating `pin`.
    fn start_read_fast(&mut self, pin: Pin);

    /// Start a differential conversion without validating the pair.
    fn start_differential_fast(&mut self, positive: Pin, negative: Pin);

    /// Start free-running conversions of `pin`.
    fn start_continuous(&mut self, pin: Pin);

    /// Start free-running differential conversions.
    fn start_continuous_differential(&mut self, positive: Pin, negative: Pin);

    /// Stop free-running conversions.
    fn stop_continuous(&mut self);

    /// Most recent completed sample of a continuous conversion.
    fn analog_read_continuous(&mut self) -> i32;

    /// Capture the current configuration.
    ///
    /// The completion interrupt must not run between the caller's
    /// `is_converting` check and this call.
    fn save_config(&self, cs: CriticalSection<'_>) -> Self::Snapshot;

    /// Re-apply a captured configuration, re-triggering the conversion that
    /// was in flight when it was captured.
    fn load_config(&mut self, snapshot: Self::Snapshot);

    /// Current resolution.
    fn resolution(&self) -> Resolution;

    /// Change the resolution.
    fn set_resolution(&mut self, resolution: Resolution);

    /// Accumulated failure flags.
    fn fail_flags(&self) -> FailFlags;

    /// Add `flags` to the accumulated failure flags.
    fn raise_fail_flags(&mut self, flags: FailFlags);

    /// Clear all failure flags.
    fn reset_fail_flags(&mut self);

    /// Write [`ChannelTrigger::DISABLED`] to the trigger register and return
    /// the value it held.
    fn disable_trigger(&mut self) -> ChannelTrigger;

    /// Write `trigger` back to the trigger register, restarting the module.
    fn arm_trigger(&mut self, cs: CriticalSection<'_>, trigger: ChannelTrigger);
}
