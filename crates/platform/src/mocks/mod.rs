//! Simulated ADC module for testing
//!
//! [`SimAdcModule`] implements [`AdcModule`] in software. Conversions complete
//! after a configurable number of `is_converting` polls, which stands in for
//! the completion interrupt. Every driver call is recorded on a shared
//! [`SimBus`] so tests can assert on ordering across both modules.

#![cfg(any(test, feature = "std"))]

use core::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use critical_section::CriticalSection;

use crate::adc::AdcModule;
use crate::pin_map::{boards, PinMap};
use crate::types::{ChannelTrigger, ConversionRequest, FailFlags, ModuleId, Pin, Resolution};

/// Polls of `is_converting` a conversion takes unless configured otherwise.
pub const DEFAULT_CONVERSION_POLLS: u32 = 3;

/// A driver call or simulated interrupt, as recorded on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// `single_mode` was called.
    SingleMode(ModuleId),
    /// A conversion was started.
    Start {
        /// Module that started.
        module: ModuleId,
        /// What it converts.
        request: ConversionRequest,
        /// Free-running conversion.
        continuous: bool,
    },
    /// Completion interrupt: result latched.
    Complete(ModuleId),
    /// Completion interrupt: compare condition not met, nothing latched.
    CompareFailed(ModuleId),
    /// `read_single` was called.
    Read(ModuleId),
    /// `save_config` was called.
    SaveConfig(ModuleId),
    /// `load_config` was called.
    LoadConfig(ModuleId),
    /// `stop_continuous` was called.
    StopContinuous(ModuleId),
    /// The trigger register was written with the disabled sentinel.
    TriggerDisabled(ModuleId),
    /// The trigger register was re-armed.
    TriggerArmed(ModuleId),
}

/// Shared, ordered event log.
#[derive(Debug, Clone, Default)]
pub struct SimBus {
    events: Rc<RefCell<Vec<SimEvent>>>,
}

impl SimBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: SimEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Copy of all events recorded so far.
    pub fn events(&self) -> Vec<SimEvent> {
        self.events.borrow().clone()
    }

    /// Index of the first event equal to `event`.
    pub fn position(&self, event: SimEvent) -> Option<usize> {
        self.events.borrow().iter().position(|e| *e == event)
    }

    /// Number of recorded events equal to `event`.
    pub fn count(&self, event: SimEvent) -> usize {
        self.events.borrow().iter().filter(|e| **e == event).count()
    }

    /// Forget all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// Configured conversion of a simulated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    /// Nothing configured.
    Idle,
    /// One-shot conversion.
    Single(ConversionRequest),
    /// Free-running conversion.
    Continuous(ConversionRequest),
}

/// Configuration captured by [`SimAdcModule::save_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimSnapshot {
    mode: SimMode,
    trigger: ChannelTrigger,
    resolution: Resolution,
    converting: bool,
}

/// Software model of one ADC peripheral.
pub struct SimAdcModule {
    id: ModuleId,
    pins: PinMap,
    bus: SimBus,
    resolution: Resolution,
    mode: SimMode,
    trigger: ChannelTrigger,
    conversion_polls: u32,
    remaining: Cell<u32>,
    converting: Cell<bool>,
    complete: Cell<bool>,
    result: Cell<i32>,
    compare_failures: Cell<u32>,
    inputs: heapless::LinearMap<u8, i32, 32>,
    fail_flags: FailFlags,
}

impl SimAdcModule {
    /// Idle module routed by `pins`, recording on its own bus.
    pub fn new(id: ModuleId, pins: PinMap) -> Self {
        Self::with_bus(id, pins, SimBus::new())
    }

    /// Idle module recording on `bus`.
    pub fn with_bus(id: ModuleId, pins: PinMap, bus: SimBus) -> Self {
        Self {
            id,
            pins,
            bus,
            resolution: Resolution::default(),
            mode: SimMode::Idle,
            trigger: ChannelTrigger::DISABLED,
            conversion_polls: DEFAULT_CONVERSION_POLLS,
            remaining: Cell::new(0),
            converting: Cell::new(false),
            complete: Cell::new(false),
            result: Cell::new(0),
            compare_failures: Cell::new(0),
            inputs: heapless::LinearMap::new(),
            fail_flags: FailFlags::empty(),
        }
    }

    /// Both modules of a Teensy 3.6, sharing one bus.
    pub fn teensy36_pair() -> (Self, Self, SimBus) {
        let bus = SimBus::new();
        (
            Self::with_bus(ModuleId::Adc0, boards::teensy36::ADC0, bus.clone()),
            Self::with_bus(ModuleId::Adc1, boards::teensy36::ADC1, bus.clone()),
            bus,
        )
    }

    /// Which module this simulates.
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// The bus this module records on.
    pub fn bus(&self) -> &SimBus {
        &self.bus
    }

    /// Currently configured conversion.
    pub fn mode(&self) -> SimMode {
        self.mode
    }

    /// Current trigger register value.
    pub fn trigger(&self) -> ChannelTrigger {
        self.trigger
    }

    /// Raw value the module converts for `pin`.
    ///
    /// For a differential pair, set the value on the positive pin.
    /// Values are clamped to the resolution when sampled.
    pub fn set_input(&mut self, pin: Pin, raw: i32) {
        // A full map only drops the stimulus; the pin then reads zero.
        let _ = self.inputs.insert(pin.number(), raw);
    }

    /// Number of `is_converting` polls a conversion takes.
    ///
    /// `u32::MAX` keeps conversions running until they are preempted.
    pub fn set_conversion_polls(&mut self, polls: u32) {
        self.conversion_polls = polls;
    }

    /// Make the next `count` conversions miss their compare condition.
    pub fn fail_next_comparisons(&mut self, count: u32) {
        self.compare_failures.set(count);
    }

    fn sample(&self, request: ConversionRequest) -> i32 {
        let max = i32::try_from(self.resolution.max_value()).unwrap_or(i32::MAX);
        match request {
            ConversionRequest::Single(pin) => {
                let raw = self.inputs.get(&pin.number()).copied().unwrap_or(0);
                raw.clamp(0, max)
            }
            ConversionRequest::Differential { positive, .. } => {
                let raw = self.inputs.get(&positive.number()).copied().unwrap_or(0);
                let half = max.saturating_add(1) / 2;
                raw.clamp(half.saturating_neg(), half.saturating_sub(1))
            }
        }
    }

    fn trigger_for(&self, request: ConversionRequest) -> ChannelTrigger {
        let trigger = match request {
            ConversionRequest::Single(pin) => self.pins.single_trigger(pin),
            ConversionRequest::Differential { positive, negative } => {
                self.pins.differential_trigger(positive, negative)
            }
        };
        trigger.unwrap_or(ChannelTrigger::DISABLED)
    }

    fn start(&mut self, request: ConversionRequest, continuous: bool) {
        self.mode = if continuous {
            SimMode::Continuous(request)
        } else {
            SimMode::Single(request)
        };
        self.trigger = self.trigger_for(request);
        self.converting.set(!self.trigger.is_disabled());
        self.complete.set(false);
        self.remaining.set(self.conversion_polls);
        if continuous {
            self.result.set(self.sample(request));
        }
        self.bus.record(SimEvent::Start {
            module: self.id,
            request,
            continuous,
        });
    }

    /// Runs the completion interrupt once the countdown expires.
    fn tick(&self) {
        let SimMode::Single(request) = self.mode else {
            return;
        };
        if !self.converting.get() || self.trigger.is_disabled() {
            return;
        }
        let remaining = self.remaining.get().saturating_sub(1);
        self.remaining.set(remaining);
        if remaining > 0 {
            return;
        }
        self.converting.set(false);
        let failures = self.compare_failures.get();
        if failures > 0 {
            self.compare_failures.set(failures.saturating_sub(1));
            self.complete.set(false);
            self.bus.record(SimEvent::CompareFailed(self.id));
        } else {
            self.result.set(self.sample(request));
            self.complete.set(true);
            self.bus.record(SimEvent::Complete(self.id));
        }
    }
}

impl AdcModule for SimAdcModule {
    type Snapshot = SimSnapshot;

    fn check_pin(&self, pin: Pin) -> bool {
        self.pins.check_pin(pin)
    }

    fn check_differential_pins(&self, positive: Pin, negative: Pin) -> bool {
        self.pins.check_differential_pins(positive, negative)
    }

    fn is_converting(&self) -> bool {
        self.tick();
        self.converting.get()
    }

    fn is_complete(&self) -> bool {
        self.complete.get()
    }

    fn is_continuous(&self) -> bool {
        matches!(self.mode, SimMode::Continuous(_))
    }

    fn is_differential(&self) -> bool {
        match self.mode {
            SimMode::Single(request) | SimMode::Continuous(request) => request.is_differential(),
            SimMode::Idle => false,
        }
    }

    fn read_single(&mut self) -> i32 {
        self.complete.set(false);
        self.bus.record(SimEvent::Read(self.id));
        self.result.get()
    }

    fn single_mode(&mut self) {
        if let SimMode::Continuous(request) = self.mode {
            self.mode = SimMode::Single(request);
        }
        self.bus.record(SimEvent::SingleMode(self.id));
    }

    fn start_read_fast(&mut self, pin: Pin) {
        self.start(ConversionRequest::Single(pin), false);
    }

    fn start_differential_fast(&mut self, positive: Pin, negative: Pin) {
        self.start(ConversionRequest::Differential { positive, negative }, false);
    }

    fn start_continuous(&mut self, pin: Pin) {
        self.start(ConversionRequest::Single(pin), true);
    }

    fn start_continuous_differential(&mut self, positive: Pin, negative: Pin) {
        self.start(ConversionRequest::Differential { positive, negative }, true);
    }

    fn stop_continuous(&mut self) {
        self.mode = SimMode::Idle;
        self.trigger = ChannelTrigger::DISABLED;
        self.converting.set(false);
        self.bus.record(SimEvent::StopContinuous(self.id));
    }

    fn analog_read_continuous(&mut self) -> i32 {
        if let SimMode::Continuous(request) = self.mode {
            if !self.trigger.is_disabled() {
                self.result.set(self.sample(request));
            }
        }
        self.result.get()
    }

    fn save_config(&self, _cs: CriticalSection<'_>) -> Self::Snapshot {
        self.bus.record(SimEvent::SaveConfig(self.id));
        SimSnapshot {
            mode: self.mode,
            trigger: self.trigger,
            resolution: self.resolution,
            converting: self.converting.get(),
        }
    }

    fn load_config(&mut self, snapshot: Self::Snapshot) {
        self.mode = snapshot.mode;
        self.trigger = snapshot.trigger;
        self.resolution = snapshot.resolution;
        let resume = snapshot.converting && !snapshot.trigger.is_disabled();
        self.converting.set(resume);
        if resume {
            self.complete.set(false);
            self.remaining.set(self.conversion_polls);
        }
        self.bus.record(SimEvent::LoadConfig(self.id));
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    fn fail_flags(&self) -> FailFlags {
        self.fail_flags
    }

    fn raise_fail_flags(&mut self, flags: FailFlags) {
        self.fail_flags |= flags;
    }

    fn reset_fail_flags(&mut self) {
        self.fail_flags = FailFlags::empty();
    }

    fn disable_trigger(&mut self) -> ChannelTrigger {
        let previous = self.trigger;
        self.trigger = ChannelTrigger::DISABLED;
        self.bus.record(SimEvent::TriggerDisabled(self.id));
        previous
    }

    fn arm_trigger(&mut self, _cs: CriticalSection<'_>, trigger: ChannelTrigger) {
        self.trigger = trigger;
        self.bus.record(SimEvent::TriggerArmed(self.id));
    }
}
