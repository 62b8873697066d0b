//! Continuous conversions
//!
//! Synchronized continuous mode starts each module the usual way, then halts
//! both by writing the disabled channel and re-arms them back to back with
//! interrupts masked. The skew between the two modules is bounded by that
//! masked window.

use platform::{AdcModule, AdcSelect, ConversionRequest, FailFlags, ModuleId, Pin, ERROR_VALUE};

use crate::adc::{Adc, SyncState};
use crate::error::AdcError;
use crate::preempt::ensure_no_pending_restore;
use crate::sync::SyncResult;

impl<M: AdcModule> Adc<M> {
    /// Start free-running conversions of `pin`.
    pub fn start_continuous(&mut self, pin: Pin, select: AdcSelect) -> Result<ModuleId, AdcError> {
        self.start_continuous_request(ConversionRequest::Single(pin), select)
    }

    /// Start free-running differential conversions.
    pub fn start_continuous_differential(
        &mut self,
        positive: Pin,
        negative: Pin,
        select: AdcSelect,
    ) -> Result<ModuleId, AdcError> {
        self.start_continuous_request(ConversionRequest::Differential { positive, negative }, select)
    }

    fn start_continuous_request(
        &mut self,
        request: ConversionRequest,
        select: AdcSelect,
    ) -> Result<ModuleId, AdcError> {
        if self.sync == SyncState::Pending {
            return Err(AdcError::SyncInFlight);
        }
        let id = self.dispatch(request, select)?;
        if self.module(id).has_pending_restore() {
            warn!("{} has a conversion awaiting restore", id);
            return Err(AdcError::RestorePending(id));
        }
        self.module_mut(id).start_continuous(request);
        debug!("{} continuous started", id);
        Ok(id)
    }

    /// Latest sample of module `id`, or [`ERROR_VALUE`] if it is not in
    /// continuous mode.
    pub fn analog_read_continuous(&mut self, id: ModuleId) -> i32 {
        let driver = self.module_mut(id).driver_mut();
        if !driver.is_continuous() {
            return ERROR_VALUE;
        }
        driver.analog_read_continuous()
    }

    /// Stop free-running conversions on module `id`.
    pub fn stop_continuous(&mut self, id: ModuleId) {
        self.module_mut(id).stop_continuous();
    }

    /// Start free-running conversions of `pin0` on ADC0 and `pin1` on ADC1,
    /// aligned as closely as the hardware allows.
    pub fn start_sync_continuous(&mut self, pin0: Pin, pin1: Pin) -> Result<(), AdcError> {
        self.sync_continuous(ConversionRequest::Single(pin0), ConversionRequest::Single(pin1))
    }

    /// Differential form of [`Adc::start_sync_continuous`].
    pub fn start_sync_continuous_differential(
        &mut self,
        pin0_positive: Pin,
        pin0_negative: Pin,
        pin1_positive: Pin,
        pin1_negative: Pin,
    ) -> Result<(), AdcError> {
        self.sync_continuous(
            ConversionRequest::differential(pin0_positive, pin0_negative),
            ConversionRequest::differential(pin1_positive, pin1_negative),
        )
    }

    fn sync_continuous(
        &mut self,
        request0: ConversionRequest,
        request1: ConversionRequest,
    ) -> Result<(), AdcError> {
        if self.sync == SyncState::Pending {
            return Err(AdcError::SyncInFlight);
        }
        let (adc0, adc1) = self.pair_mut()?;
        for (module, request) in [(&mut *adc0, request0), (&mut *adc1, request1)] {
            if !module.can_convert(request) {
                module.raise(FailFlags::WRONG_PIN);
                warn!("{} cannot serve the continuous request", module.id());
                return Err(AdcError::WrongPin);
            }
        }
        ensure_no_pending_restore(adc0, adc1)?;

        adc0.start_continuous(request0);
        adc1.start_continuous(request1);

        let trigger0 = adc0.driver_mut().disable_trigger();
        let trigger1 = adc1.driver_mut().disable_trigger();
        critical_section::with(|cs| {
            adc0.driver_mut().arm_trigger(cs, trigger0);
            adc1.driver_mut().arm_trigger(cs, trigger1);
        });
        debug!("synchronized continuous started");
        Ok(())
    }

    /// Latest samples of both modules.
    ///
    /// Each read is independent; a module not in continuous mode reads
    /// [`ERROR_VALUE`]. Single-module boards get [`SyncResult::ERROR`].
    pub fn read_sync_continuous(&mut self) -> SyncResult {
        if self.adc1.is_none() {
            return SyncResult::ERROR;
        }
        SyncResult {
            adc0: self.analog_read_continuous(ModuleId::Adc0),
            adc1: self.analog_read_continuous(ModuleId::Adc1),
        }
    }

    /// Stop free-running conversions on both modules.
    pub fn stop_sync_continuous(&mut self) -> Result<(), AdcError> {
        let (adc0, adc1) = self.pair_mut()?;
        adc0.stop_continuous();
        adc1.stop_continuous();
        Ok(())
    }
}
