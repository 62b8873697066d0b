//! Single-module reads through the coordinator facade.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use dual_adc::{Adc, AdcError, AdcSelect, FailFlags, ModuleId, Pin, Resolution};
use platform::pin_map::boards::teensy36;
use platform::{ConversionRequest, SimAdcModule, SimBus, SimEvent, SimMode, ERROR_VALUE};

fn adc() -> (Adc<SimAdcModule>, SimBus) {
    let (adc0, adc1, bus) = SimAdcModule::teensy36_pair();
    (Adc::new(adc0, adc1), bus)
}

const A2: Pin = Pin(16);

// ── Blocking ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn analog_read_returns_reading_and_settles_workload() {
    let (mut adc, _bus) = adc();
    adc.driver_mut(ModuleId::Adc0).set_input(A2, 1023);

    assert_eq!(adc.analog_read(A2, AdcSelect::Any).await, 1023);
    assert_eq!(adc.workload(ModuleId::Adc0), 0);
    assert!(!adc.has_pending_restore(ModuleId::Adc0));
}

#[tokio::test]
async fn analog_read_clamps_to_resolution() {
    let (mut adc, _bus) = adc();
    adc.set_resolution(ModuleId::Adc0, Resolution::Bits8);
    adc.driver_mut(ModuleId::Adc0).set_input(A2, 4000);

    assert_eq!(adc.analog_read(A2, AdcSelect::Adc0).await, 255);
    assert_eq!(adc.max_value(ModuleId::Adc0), 255);
}

#[tokio::test]
async fn analog_read_differential_scales_16_bit() {
    let (mut adc, _bus) = adc();
    adc.set_resolution(ModuleId::Adc0, Resolution::Bits16);
    adc.driver_mut(ModuleId::Adc0).set_input(teensy36::A10, 1234);

    let value = adc
        .analog_read_differential(teensy36::A10, teensy36::A11, AdcSelect::Adc0)
        .await;
    assert_eq!(value, 2468);
}

#[tokio::test]
async fn analog_read_preempts_and_resumes_continuous() {
    let (mut adc, bus) = adc();
    adc.start_continuous(Pin(15), AdcSelect::Adc0).unwrap();
    adc.driver_mut(ModuleId::Adc0).set_input(A2, 9);

    assert_eq!(adc.analog_read(A2, AdcSelect::Adc0).await, 9);

    assert_eq!(
        adc.driver(ModuleId::Adc0).mode(),
        SimMode::Continuous(ConversionRequest::Single(Pin(15)))
    );
    assert_eq!(bus.count(SimEvent::SaveConfig(ModuleId::Adc0)), 1);
    assert_eq!(bus.count(SimEvent::LoadConfig(ModuleId::Adc0)), 1);
    assert_eq!(adc.workload(ModuleId::Adc0), 1);
}

#[tokio::test]
async fn analog_read_refused_while_restore_pending() {
    let (mut adc, _bus) = adc();
    adc.start_continuous(Pin(15), AdcSelect::Adc0).unwrap();
    adc.start_single_read(A2, AdcSelect::Adc0).unwrap();

    assert_eq!(adc.analog_read(A2, AdcSelect::Adc0).await, ERROR_VALUE);
    // ADC1 is unaffected.
    assert_ne!(adc.analog_read(A2, AdcSelect::Adc1).await, ERROR_VALUE);
}

#[tokio::test]
async fn analog_read_of_unroutable_pin() {
    let (mut adc, bus) = adc();
    assert_eq!(adc.analog_read(Pin(29), AdcSelect::Any).await, ERROR_VALUE);
    assert!(bus.events().is_empty());
}

#[tokio::test]
async fn failed_comparison_reads_error() {
    let (mut adc, _bus) = adc();
    adc.driver_mut(ModuleId::Adc0).fail_next_comparisons(1);
    assert_eq!(adc.analog_read(A2, AdcSelect::Adc0).await, ERROR_VALUE);
    assert_eq!(adc.fail_flags(ModuleId::Adc0), FailFlags::COMPARISON);
}

// ── Non-blocking ─────────────────────────────────────────────────────────────

#[test]
fn read_single_before_completion_consumes_nothing() {
    let (mut adc, _bus) = adc();
    adc.driver_mut(ModuleId::Adc0).set_input(A2, 64);

    let id = adc.start_single_read(A2, AdcSelect::Any).unwrap();
    assert_eq!(adc.read_single(id), ERROR_VALUE);
    assert_eq!(adc.workload(id), 1);
    assert_eq!(adc.fail_flags(id), FailFlags::empty());

    while adc.is_converting(id) {}
    assert!(adc.is_complete(id));
    assert_eq!(adc.read_single(id), 64);
    assert_eq!(adc.workload(id), 0);
}

#[test]
fn read_single_restores_preempted_conversion() {
    let (mut adc, bus) = adc();
    adc.start_continuous(Pin(15), AdcSelect::Adc0).unwrap();

    let id = adc.start_single_read(A2, AdcSelect::Adc0).unwrap();
    assert!(adc.has_pending_restore(id));
    assert_eq!(adc.start_single_read(A2, AdcSelect::Adc0), Err(AdcError::RestorePending(id)));

    while adc.is_converting(id) {}
    let _ = adc.read_single(id);

    assert!(!adc.has_pending_restore(id));
    assert!(adc.is_continuous(id));
    assert_eq!(bus.count(SimEvent::LoadConfig(id)), 1);
}

#[test]
fn single_differential_start() {
    let (mut adc, _bus) = adc();
    adc.set_resolution(ModuleId::Adc1, Resolution::Bits16);
    adc.driver_mut(ModuleId::Adc1).set_input(teensy36::A10, -7);

    let id = adc
        .start_single_differential(teensy36::A10, teensy36::A11, AdcSelect::Adc1)
        .unwrap();
    assert!(adc.is_differential(id));
    while adc.is_converting(id) {}
    assert_eq!(adc.read_single(id), -14);
}

#[test]
fn second_read_of_one_conversion_raises_nothing() {
    let (mut adc, _bus) = adc();
    adc.driver_mut(ModuleId::Adc0).set_input(A2, 70);

    let id = adc.start_single_read(A2, AdcSelect::Adc0).unwrap();
    while adc.is_converting(id) {}
    assert_eq!(adc.read_single(id), 70);
    assert_eq!(adc.read_single(id), ERROR_VALUE);
    assert_eq!(adc.fail_flags(id), FailFlags::empty());
    assert_eq!(adc.workload(id), 0);
}

// ── Unread conversions ───────────────────────────────────────────────────────

#[tokio::test]
async fn analog_read_releases_unread_conversion() {
    let (mut adc, _bus) = adc();
    adc.driver_mut(ModuleId::Adc0).set_input(A2, 5);
    adc.start_single_read(A2, AdcSelect::Adc0).unwrap();
    while adc.is_converting(ModuleId::Adc0) {}

    assert_eq!(adc.analog_read(A2, AdcSelect::Adc0).await, 5);
    assert_eq!(adc.workload(ModuleId::Adc0), 0);
    assert_eq!(adc.dispatch(ConversionRequest::Single(A2), AdcSelect::Any), Ok(ModuleId::Adc0));
}

#[test]
fn restarted_single_read_counts_once() {
    let (mut adc, _bus) = adc();
    adc.start_single_read(A2, AdcSelect::Adc0).unwrap();
    while adc.is_converting(ModuleId::Adc0) {}
    adc.start_single_read(A2, AdcSelect::Adc0).unwrap();
    assert_eq!(adc.workload(ModuleId::Adc0), 1);
}
