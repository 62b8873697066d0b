//! Coordinator facade
//!
//! [`Adc`] owns the module drivers for the lifetime of the program and is the
//! only way application code reaches them. Single-module reads live here; the
//! synchronized and continuous paths are in [`crate::sync`] and
//! [`crate::continuous`].
//!
//! # Example
//!
//! ```no_run
//! use dual_adc::Adc;
//! use platform::{AdcModule, AdcSelect, Pin};
//!
//! async fn sample<M: AdcModule>(adc: &mut Adc<M>) -> i32 {
//!     adc.analog_read(Pin(16), AdcSelect::Any).await
//! }
//! ```

use embassy_futures::yield_now;
use platform::{
    AdcModule, AdcSelect, ConversionRequest, FailFlags, ModuleId, Pin, Resolution, ERROR_VALUE,
};

use crate::config::{AdcConfig, NUM_MODULES};
use crate::error::AdcError;
use crate::module::Module;

/// Progress of a non-blocking synchronized read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SyncState {
    Idle,
    /// Started and not yet collected by `read_sync`.
    Pending,
}

/// ADC coordinator for one or two modules.
pub struct Adc<M: AdcModule> {
    pub(crate) config: AdcConfig,
    pub(crate) adc0: Module<M>,
    pub(crate) adc1: Option<Module<M>>,
    pub(crate) sync: SyncState,
}

impl<M: AdcModule> Adc<M> {
    /// Coordinator for a dual-module board with the default configuration.
    pub fn new(adc0: M, adc1: M) -> Self {
        Self::with_config(adc0, adc1, AdcConfig::default())
    }

    /// Coordinator for a dual-module board.
    pub fn with_config(adc0: M, adc1: M, config: AdcConfig) -> Self {
        Self {
            config,
            adc0: Module::new(ModuleId::Adc0, adc0),
            adc1: Some(Module::new(ModuleId::Adc1, adc1)),
            sync: SyncState::Idle,
        }
    }

    /// Coordinator for a single-module board.
    ///
    /// Every request goes to ADC0, including requests naming ADC1.
    /// Synchronized operations are refused.
    pub fn single(adc0: M) -> Self {
        Self {
            config: AdcConfig::default(),
            adc0: Module::new(ModuleId::Adc0, adc0),
            adc1: None,
            sync: SyncState::Idle,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> AdcConfig {
        self.config
    }

    /// Number of modules driven.
    pub fn num_modules(&self) -> usize {
        if self.adc1.is_some() {
            NUM_MODULES
        } else {
            1
        }
    }

    /// Module state for `id`; ADC0 on single-module boards.
    pub fn module(&self, id: ModuleId) -> &Module<M> {
        match (id, self.adc1.as_ref()) {
            (ModuleId::Adc1, Some(adc1)) => adc1,
            _ => &self.adc0,
        }
    }

    pub(crate) fn module_mut(&mut self, id: ModuleId) -> &mut Module<M> {
        match (id, self.adc1.as_mut()) {
            (ModuleId::Adc1, Some(adc1)) => adc1,
            _ => &mut self.adc0,
        }
    }

    pub(crate) fn pair_mut(&mut self) -> Result<(&mut Module<M>, &mut Module<M>), AdcError> {
        let adc1 = self.adc1.as_mut().ok_or(AdcError::SingleModule)?;
        Ok((&mut self.adc0, adc1))
    }

    // ── Single reads ────────────────────────────────────────────────────────

    /// Read `pin` once, waiting for the result.
    ///
    /// A conversion already running on the chosen module is preempted and
    /// resumed afterwards. Returns [`ERROR_VALUE`] if no module can read the
    /// pin, the module has a configuration pending restore, or the
    /// conversion failed its comparison.
    pub async fn analog_read(&mut self, pin: Pin, select: AdcSelect) -> i32 {
        self.read_blocking(ConversionRequest::Single(pin), select).await
    }

    /// Read `positive - negative` once, waiting for the result.
    ///
    /// 16-bit results are scaled by two; see [`Adc::analog_read`] otherwise.
    pub async fn analog_read_differential(
        &mut self,
        positive: Pin,
        negative: Pin,
        select: AdcSelect,
    ) -> i32 {
        self.read_blocking(ConversionRequest::Differential { positive, negative }, select)
            .await
    }

    async fn read_blocking(&mut self, request: ConversionRequest, select: AdcSelect) -> i32 {
        let Ok(id) = self.dispatch(request, select) else {
            return ERROR_VALUE;
        };
        let module = self.module_mut(id);
        if module.preempt().is_err() {
            return ERROR_VALUE;
        }

        module.start(request);
        while module.driver().is_converting() {
            yield_now().await;
        }
        let value = critical_section::with(|_| module.finish());
        module.restore();
        value
    }

    /// Start a one-shot read of `pin` and return without waiting.
    ///
    /// Collect the result with [`Adc::read_single`] on the returned module. A
    /// conversion the read preempted stays pending until then.
    pub fn start_single_read(&mut self, pin: Pin, select: AdcSelect) -> Result<ModuleId, AdcError> {
        self.start_single(ConversionRequest::Single(pin), select)
    }

    /// Start a one-shot differential read and return without waiting.
    pub fn start_single_differential(
        &mut self,
        positive: Pin,
        negative: Pin,
        select: AdcSelect,
    ) -> Result<ModuleId, AdcError> {
        self.start_single(ConversionRequest::Differential { positive, negative }, select)
    }

    fn start_single(
        &mut self,
        request: ConversionRequest,
        select: AdcSelect,
    ) -> Result<ModuleId, AdcError> {
        if self.sync == SyncState::Pending {
            return Err(AdcError::SyncInFlight);
        }
        let id = self.dispatch(request, select)?;
        let module = self.module_mut(id);
        module.preempt()?;
        module.start(request);
        debug!("{} single read started", id);
        Ok(id)
    }

    /// Result of the one-shot read started on `id`.
    ///
    /// Restores a conversion the read preempted. Returns [`ERROR_VALUE`] while
    /// the conversion is still running (nothing is consumed in that case),
    /// while a synchronized read is pending, or if the comparison failed.
    pub fn read_single(&mut self, id: ModuleId) -> i32 {
        if self.sync == SyncState::Pending {
            return ERROR_VALUE;
        }
        let module = self.module_mut(id);
        if module.driver().is_converting() {
            return ERROR_VALUE;
        }
        let value = critical_section::with(|_| module.finish());
        module.restore();
        value
    }

    // ── Queries and settings ────────────────────────────────────────────────

    /// Module `id` is converting.
    pub fn is_converting(&self, id: ModuleId) -> bool {
        self.module(id).driver().is_converting()
    }

    /// Module `id` has an unread result.
    pub fn is_complete(&self, id: ModuleId) -> bool {
        self.module(id).driver().is_complete()
    }

    /// Module `id` is in continuous mode.
    pub fn is_continuous(&self, id: ModuleId) -> bool {
        self.module(id).driver().is_continuous()
    }

    /// Module `id` is in differential mode.
    pub fn is_differential(&self, id: ModuleId) -> bool {
        self.module(id).driver().is_differential()
    }

    /// Resolution of module `id`.
    pub fn resolution(&self, id: ModuleId) -> Resolution {
        self.module(id).driver().resolution()
    }

    /// Change the resolution of module `id`.
    pub fn set_resolution(&mut self, id: ModuleId, resolution: Resolution) {
        self.module_mut(id).driver_mut().set_resolution(resolution);
    }

    /// Largest reading module `id` can return at its current resolution.
    pub fn max_value(&self, id: ModuleId) -> u32 {
        self.resolution(id).max_value()
    }

    /// Accumulated fail flags of module `id`.
    pub fn fail_flags(&self, id: ModuleId) -> FailFlags {
        self.module(id).driver().fail_flags()
    }

    /// Clear the fail flags of module `id`.
    pub fn reset_fail_flags(&mut self, id: ModuleId) {
        self.module_mut(id).driver_mut().reset_fail_flags();
    }

    /// Conversions currently attributed to module `id`.
    pub fn workload(&self, id: ModuleId) -> u32 {
        self.module(id).workload()
    }

    /// Module `id` holds a preempted configuration.
    pub fn has_pending_restore(&self, id: ModuleId) -> bool {
        self.module(id).has_pending_restore()
    }

    /// Driver of module `id`.
    pub fn driver(&self, id: ModuleId) -> &M {
        self.module(id).driver()
    }

    /// Driver of module `id`, for settings the coordinator does not expose.
    pub fn driver_mut(&mut self, id: ModuleId) -> &mut M {
        self.module_mut(id).driver_mut()
    }
}
