//! Synchronized reads across both modules
//!
//! Both modules are checked, preempted, put in single mode and triggered back
//! to back (ADC0 first). Results are collected together with interrupts
//! masked, then both modules get their preempted conversions back.
//!
//! The blocking form polls with a cooperative yield until neither module is
//! converting. There is no timeout: a conversion whose compare condition is
//! never met keeps the caller waiting.

use embassy_futures::yield_now;
use platform::{AdcModule, ConversionRequest, FailFlags, Pin, ERROR_VALUE};

use crate::adc::{Adc, SyncState};
use crate::error::AdcError;
use crate::module::Module;
use crate::preempt::{preempt_pair, restore_pair};

/// Readings from ADC0 and ADC1.
///
/// Each field is either a reading or [`ERROR_VALUE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncResult {
    /// ADC0 reading.
    pub adc0: i32,
    /// ADC1 reading.
    pub adc1: i32,
}

impl SyncResult {
    /// Both fields [`ERROR_VALUE`].
    pub const ERROR: Self = Self {
        adc0: ERROR_VALUE,
        adc1: ERROR_VALUE,
    };

    /// Neither field is [`ERROR_VALUE`].
    pub const fn is_valid(&self) -> bool {
        self.adc0 != ERROR_VALUE && self.adc1 != ERROR_VALUE
    }
}

/// Check one module's request; flags the module on failure.
fn check<M: AdcModule>(module: &mut Module<M>, request: ConversionRequest) -> Result<(), AdcError> {
    if module.can_convert(request) {
        return Ok(());
    }
    module.raise(FailFlags::WRONG_PIN);
    warn!("{} cannot serve the synchronized request", module.id());
    Err(AdcError::WrongPin)
}

impl<M: AdcModule> Adc<M> {
    /// Read `pin0` on ADC0 and `pin1` on ADC1 at the same time.
    ///
    /// Returns [`SyncResult::ERROR`] without touching the hardware if either pin
    /// is ineligible (only the first offending module is flagged), the board
    /// has one module, a non-blocking synchronized read is pending, or either
    /// module has a configuration pending restore.
    pub async fn analog_sync_read(&mut self, pin0: Pin, pin1: Pin) -> SyncResult {
        self.sync_read_blocking(ConversionRequest::Single(pin0), ConversionRequest::Single(pin1))
            .await
    }

    /// Differential form of [`Adc::analog_sync_read`].
    ///
    /// A module at 16 bits reports twice the raw result.
    pub async fn analog_sync_read_differential(
        &mut self,
        pin0_positive: Pin,
        pin0_negative: Pin,
        pin1_positive: Pin,
        pin1_negative: Pin,
    ) -> SyncResult {
        self.sync_read_blocking(
            ConversionRequest::differential(pin0_positive, pin0_negative),
            ConversionRequest::differential(pin1_positive, pin1_negative),
        )
        .await
    }

    async fn sync_read_blocking(
        &mut self,
        request0: ConversionRequest,
        request1: ConversionRequest,
    ) -> SyncResult {
        if self.begin_sync(request0, request1).is_err() {
            return SyncResult::ERROR;
        }
        let Ok((adc0, adc1)) = self.pair_mut() else {
            return SyncResult::ERROR;
        };
        while adc0.driver().is_converting() || adc1.driver().is_converting() {
            yield_now().await;
        }
        finish_pair(adc0, adc1)
    }

    /// Start reading `pin0` on ADC0 and `pin1` on ADC1 and return at once.
    ///
    /// Collect the readings with [`Adc::read_sync`]. Preempted conversions
    /// stay pending until then.
    pub fn start_sync_read(&mut self, pin0: Pin, pin1: Pin) -> Result<(), AdcError> {
        self.begin_sync(ConversionRequest::Single(pin0), ConversionRequest::Single(pin1))?;
        self.sync = SyncState::Pending;
        Ok(())
    }

    /// Differential form of [`Adc::start_sync_read`].
    pub fn start_sync_read_differential(
        &mut self,
        pin0_positive: Pin,
        pin0_negative: Pin,
        pin1_positive: Pin,
        pin1_negative: Pin,
    ) -> Result<(), AdcError> {
        self.begin_sync(
            ConversionRequest::differential(pin0_positive, pin0_negative),
            ConversionRequest::differential(pin1_positive, pin1_negative),
        )?;
        self.sync = SyncState::Pending;
        Ok(())
    }

    /// Neither module is converting.
    pub fn is_sync_complete(&self) -> bool {
        let adc0 = !self.adc0.driver().is_converting();
        match self.adc1.as_ref() {
            Some(adc1) => adc0 && !adc1.driver().is_converting(),
            None => adc0,
        }
    }

    /// Readings of the pending non-blocking synchronized read.
    ///
    /// Each start is read exactly once: a second call without a new start
    /// returns [`AdcError::SyncNotStarted`]. While either module is still
    /// converting this returns [`AdcError::Busy`] and nothing is consumed.
    pub fn read_sync(&mut self) -> Result<SyncResult, AdcError> {
        if self.sync != SyncState::Pending {
            return Err(AdcError::SyncNotStarted);
        }
        let (adc0, adc1) = self.pair_mut()?;
        if adc0.driver().is_converting() || adc1.driver().is_converting() {
            return Err(AdcError::Busy);
        }
        let result = finish_pair(adc0, adc1);
        self.sync = SyncState::Idle;
        Ok(result)
    }

    /// Check, preempt and trigger both modules.
    fn begin_sync(
        &mut self,
        request0: ConversionRequest,
        request1: ConversionRequest,
    ) -> Result<(), AdcError> {
        if self.sync == SyncState::Pending {
            warn!("synchronized read already in flight");
            return Err(AdcError::SyncInFlight);
        }
        let (adc0, adc1) = self.pair_mut()?;
        check(adc0, request0)?;
        check(adc1, request1)?;
        preempt_pair(adc0, adc1)?;

        adc0.driver_mut().single_mode();
        adc1.driver_mut().single_mode();
        adc0.prepare(request0);
        adc1.prepare(request1);
        adc0.trigger(request0);
        adc1.trigger(request1);
        debug!("synchronized read started");
        Ok(())
    }
}

/// Collect both results with interrupts masked, then restore both modules.
fn finish_pair<M: AdcModule>(adc0: &mut Module<M>, adc1: &mut Module<M>) -> SyncResult {
    let result = critical_section::with(|_| SyncResult {
        adc0: adc0.finish(),
        adc1: adc1.finish(),
    });
    restore_pair(adc0, adc1);
    result
}
