//! Preemption protocol
//!
//! A busy module is borrowed by capturing its configuration into the module's
//! pending-restore slot, and handed back by re-applying that configuration,
//! which re-triggers the conversion that was in flight.
//!
//! The `is_converting` check and the capture happen inside one critical
//! section so the completion interrupt cannot change the module in between.

use core::mem;

use platform::AdcModule;

use crate::error::AdcError;
use crate::module::{Module, PendingRestore};

impl<M: AdcModule> Module<M> {
    /// Capture the running conversion, if any, into the pending slot.
    ///
    /// Returns `Ok(true)` if a conversion was captured and `Ok(false)` if the
    /// module was idle. Refused without touching the hardware while a previous
    /// capture is still pending.
    pub fn preempt(&mut self) -> Result<bool, AdcError> {
        if self.has_pending_restore() {
            warn!("{} preempted twice", self.id());
            return Err(AdcError::RestorePending(self.id()));
        }

        let driver = &self.driver;
        let snapshot =
            critical_section::with(|cs| driver.is_converting().then(|| driver.save_config(cs)));

        match snapshot {
            Some(snapshot) => {
                self.pending = PendingRestore::Pending {
                    snapshot,
                    started: self.started.take(),
                };
                trace!("{} preempted", self.id());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-apply the captured configuration, if any.
    ///
    /// Returns whether a restore happened.
    pub fn restore(&mut self) -> bool {
        match mem::replace(&mut self.pending, PendingRestore::Nothing) {
            PendingRestore::Pending { snapshot, started } => {
                self.driver.load_config(snapshot);
                self.started = started;
                trace!("{} restored", self.id());
                true
            }
            PendingRestore::Nothing => false,
        }
    }
}

/// Preempt ADC0 then ADC1. Neither is touched if either has a pending restore.
pub(crate) fn preempt_pair<M: AdcModule>(
    adc0: &mut Module<M>,
    adc1: &mut Module<M>,
) -> Result<(), AdcError> {
    ensure_no_pending_restore(adc0, adc1)?;
    adc0.preempt()?;
    adc1.preempt()?;
    Ok(())
}

/// Fail with [`AdcError::RestorePending`] if either module holds an
/// unrestored snapshot.
pub(crate) fn ensure_no_pending_restore<M: AdcModule>(
    adc0: &Module<M>,
    adc1: &Module<M>,
) -> Result<(), AdcError> {
    for module in [adc0, adc1] {
        if module.has_pending_restore() {
            return Err(AdcError::RestorePending(module.id()));
        }
    }
    Ok(())
}

/// Restore ADC0 then ADC1.
pub(crate) fn restore_pair<M: AdcModule>(adc0: &mut Module<M>, adc1: &mut Module<M>) {
    adc0.restore();
    adc1.restore();
}
