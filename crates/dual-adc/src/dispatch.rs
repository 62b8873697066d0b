//! Dispatch policy
//!
//! Routes a request that did not name a module. Explicit selections are
//! trusted and bypass eligibility checking entirely.

use platform::{AdcModule, AdcSelect, ConversionRequest, FailFlags, ModuleId};

use crate::adc::Adc;
use crate::config::DispatchPolicy;
use crate::error::AdcError;
use crate::module::Module;

impl DispatchPolicy {
    /// Pick a module able to serve `request`, or `None` if neither can.
    pub fn choose<M: AdcModule>(
        self,
        request: ConversionRequest,
        adc0: &Module<M>,
        adc1: &Module<M>,
    ) -> Option<ModuleId> {
        match (adc0.can_convert(request), adc1.can_convert(request)) {
            (false, false) => None,
            (true, false) => Some(ModuleId::Adc0),
            (false, true) => Some(ModuleId::Adc1),
            (true, true) => match self {
                Self::Simple => Some(ModuleId::Adc0),
                Self::Workload if adc1.workload() < adc0.workload() => Some(ModuleId::Adc1),
                Self::Workload => Some(ModuleId::Adc0),
            },
        }
    }
}

impl<M: AdcModule> Adc<M> {
    /// Module that will serve `request`.
    ///
    /// A concrete `select` is returned as is, without checking that the module
    /// can read the pin. A single-module coordinator always answers ADC0.
    /// When no module is eligible both get [`FailFlags::WRONG_PIN`].
    pub fn dispatch(
        &mut self,
        request: ConversionRequest,
        select: AdcSelect,
    ) -> Result<ModuleId, AdcError> {
        let Some(adc1) = self.adc1.as_mut() else {
            return Ok(ModuleId::Adc0);
        };
        if let Some(id) = select.module() {
            return Ok(id);
        }

        match self.config.dispatch.choose(request, &self.adc0, adc1) {
            Some(id) => Ok(id),
            None => {
                self.adc0.raise(FailFlags::WRONG_PIN);
                adc1.raise(FailFlags::WRONG_PIN);
                warn!("no module can convert the request");
                Err(AdcError::WrongPin)
            }
        }
    }
}
