//! Per-module coordination state
//!
//! [`Module`] wraps one driver with the bookkeeping the coordinator owns: the
//! workload counter used by dispatch, the record of the conversion it started,
//! and the pending-restore slot filled by preemption.

use platform::{
    AdcModule, ConversionRequest, FailFlags, ModuleId, Resolution, ERROR_VALUE,
};

/// A conversion started through the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Started {
    pub(crate) differential: bool,
    /// Resolution when the conversion was started.
    pub(crate) resolution: Resolution,
}

impl Started {
    /// 16-bit differential results are reported with half their magnitude;
    /// scale them back to the module's advertised range.
    fn correct(self, raw: i32) -> i32 {
        if self.differential && self.resolution == Resolution::Bits16 {
            raw.saturating_mul(2)
        } else {
            raw
        }
    }
}

/// Pending-restore slot.
pub(crate) enum PendingRestore<S> {
    Nothing,
    Pending {
        snapshot: S,
        /// The preempted conversion's record, reinstated with the snapshot.
        started: Option<Started>,
    },
}

/// One ADC module as seen by the coordinator.
pub struct Module<M: AdcModule> {
    id: ModuleId,
    pub(crate) driver: M,
    workload: u32,
    pub(crate) started: Option<Started>,
    pub(crate) pending: PendingRestore<M::Snapshot>,
}

impl<M: AdcModule> Module<M> {
    /// Wrap `driver` as module `id`, idle and with no workload.
    pub fn new(id: ModuleId, driver: M) -> Self {
        Self {
            id,
            driver,
            workload: 0,
            started: None,
            pending: PendingRestore::Nothing,
        }
    }

    /// Which module this is.
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &M {
        &self.driver
    }

    /// The wrapped driver, for module-specific settings.
    pub fn driver_mut(&mut self) -> &mut M {
        &mut self.driver
    }

    /// Conversions currently attributed to this module.
    pub fn workload(&self) -> u32 {
        self.workload
    }

    /// A preempted configuration is waiting to be restored.
    pub fn has_pending_restore(&self) -> bool {
        matches!(self.pending, PendingRestore::Pending { .. })
    }

    /// `true` if the module's pin map can serve `request`.
    pub fn can_convert(&self, request: ConversionRequest) -> bool {
        match request {
            ConversionRequest::Single(pin) => self.driver.check_pin(pin),
            ConversionRequest::Differential { positive, negative } => {
                self.driver.check_differential_pins(positive, negative)
            }
        }
    }

    pub(crate) fn accept(&mut self) {
        self.workload = self.workload.saturating_add(1);
    }

    pub(crate) fn complete(&mut self) {
        self.workload = self.workload.saturating_sub(1);
    }

    pub(crate) fn raise(&mut self, flags: FailFlags) {
        self.driver.raise_fail_flags(flags);
    }

    /// Record `request` as this module's conversion and count it.
    ///
    /// Does not touch the hardware; see [`Module::trigger`].
    pub(crate) fn prepare(&mut self, request: ConversionRequest) {
        self.abandon();
        self.started = Some(Started {
            differential: request.is_differential(),
            resolution: self.driver.resolution(),
        });
        self.accept();
    }

    /// Release a conversion that was never collected.
    fn abandon(&mut self) {
        if self.started.take().is_some() {
            self.complete();
        }
    }

    /// Start a one-shot conversion of `request`.
    pub(crate) fn trigger(&mut self, request: ConversionRequest) {
        match request {
            ConversionRequest::Single(pin) => self.driver.start_read_fast(pin),
            ConversionRequest::Differential { positive, negative } => {
                self.driver.start_differential_fast(positive, negative);
            }
        }
    }

    /// Single mode, record, then trigger.
    pub(crate) fn start(&mut self, request: ConversionRequest) {
        self.driver.single_mode();
        self.prepare(request);
        self.trigger(request);
    }

    /// Collect the result of the recorded conversion.
    ///
    /// Must run with interrupts masked when the result is collected together
    /// with another module's.
    pub(crate) fn finish(&mut self) -> i32 {
        // Nothing started, or already collected: no comparison took place.
        let Some(started) = self.started.take() else {
            return ERROR_VALUE;
        };
        self.complete();
        if !self.driver.is_complete() {
            self.raise(FailFlags::COMPARISON);
            debug!("{} conversion failed comparison", self.id);
            return ERROR_VALUE;
        }
        started.correct(self.driver.read_single())
    }

    /// Start free-running conversions of `request`.
    ///
    /// Restarting an already continuous module does not add workload.
    pub(crate) fn start_continuous(&mut self, request: ConversionRequest) {
        self.abandon();
        if !self.driver.is_continuous() {
            self.accept();
        }
        match request {
            ConversionRequest::Single(pin) => self.driver.start_continuous(pin),
            ConversionRequest::Differential { positive, negative } => {
                self.driver.start_continuous_differential(positive, negative);
            }
        }
    }

    /// Stop free-running conversions, if any.
    pub(crate) fn stop_continuous(&mut self) {
        if self.driver.is_continuous() {
            self.complete();
        }
        self.driver.stop_continuous();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::pin_map::boards::teensy36;
    use platform::{Pin, SimAdcModule};

    fn module() -> Module<SimAdcModule> {
        Module::new(
            ModuleId::Adc0,
            SimAdcModule::new(ModuleId::Adc0, teensy36::ADC0),
        )
    }

    #[test]
    fn test_workload_never_underflows() {
        let mut m = module();
        m.complete();
        m.complete();
        assert_eq!(m.workload(), 0);
        m.accept();
        assert_eq!(m.workload(), 1);
    }

    #[test]
    fn test_differential_correction_only_at_16_bits() {
        let diff16 = Started { differential: true, resolution: Resolution::Bits16 };
        let diff13 = Started { differential: true, resolution: Resolution::Bits13 };
        let single16 = Started { differential: false, resolution: Resolution::Bits16 };
        assert_eq!(diff16.correct(-1200), -2400);
        assert_eq!(diff13.correct(-1200), -1200);
        assert_eq!(single16.correct(1200), 1200);
    }

    #[test]
    fn test_finish_without_completion_raises_comparison() {
        let mut m = module();
        m.driver_mut().fail_next_comparisons(1);
        m.start(ConversionRequest::Single(Pin(14)));
        while m.driver().is_converting() {}

        assert_eq!(m.finish(), ERROR_VALUE);
        assert!(m.driver().fail_flags().contains(FailFlags::COMPARISON));
        assert_eq!(m.workload(), 0);
    }

    #[test]
    fn test_finish_with_nothing_started_raises_nothing() {
        let mut m = module();
        assert_eq!(m.finish(), ERROR_VALUE);
        assert!(m.driver().fail_flags().is_empty());
        assert_eq!(m.workload(), 0);
    }

    #[test]
    fn test_unread_conversion_is_released_on_restart() {
        let mut m = module();
        m.start(ConversionRequest::Single(Pin(14)));
        while m.driver().is_converting() {}
        m.start(ConversionRequest::Single(Pin(15)));
        assert_eq!(m.workload(), 1);
        while m.driver().is_converting() {}
        m.finish();
        assert_eq!(m.workload(), 0);
    }

    #[test]
    fn test_unread_conversion_is_released_by_continuous_start() {
        let mut m = module();
        m.start(ConversionRequest::Single(Pin(14)));
        while m.driver().is_converting() {}
        m.start_continuous(ConversionRequest::Single(Pin(15)));
        assert_eq!(m.workload(), 1);
        m.stop_continuous();
        assert_eq!(m.workload(), 0);
    }

    #[test]
    fn test_continuous_restart_counts_once() {
        let mut m = module();
        m.start_continuous(ConversionRequest::Single(Pin(14)));
        m.start_continuous(ConversionRequest::Single(Pin(15)));
        assert_eq!(m.workload(), 1);
        m.stop_continuous();
        m.stop_continuous();
        assert_eq!(m.workload(), 0);
    }
}
