//! Request routing through the coordinator.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use dual_adc::{Adc, AdcConfig, AdcError, AdcSelect, DispatchPolicy, FailFlags, ModuleId, Pin};
use platform::{ConversionRequest, SimAdcModule, SimEvent, ERROR_VALUE};

fn adc(policy: DispatchPolicy) -> Adc<SimAdcModule> {
    let (adc0, adc1, _bus) = SimAdcModule::teensy36_pair();
    Adc::with_config(adc0, adc1, AdcConfig::with_dispatch(policy))
}

const A2: Pin = Pin(16);

#[test]
fn workload_alternates_between_idle_modules() {
    let mut adc = adc(DispatchPolicy::Workload);
    for id in [ModuleId::Adc0, ModuleId::Adc1] {
        adc.driver_mut(id).set_conversion_polls(u32::MAX);
    }

    // Tie goes to ADC0, then the lighter module wins.
    assert_eq!(adc.start_single_read(A2, AdcSelect::Any), Ok(ModuleId::Adc0));
    assert_eq!(adc.start_single_read(A2, AdcSelect::Any), Ok(ModuleId::Adc1));
    assert_eq!(adc.workload(ModuleId::Adc0), 1);
    assert_eq!(adc.workload(ModuleId::Adc1), 1);
    assert_eq!(
        adc.dispatch(ConversionRequest::Single(A2), AdcSelect::Any),
        Ok(ModuleId::Adc0)
    );
}

#[test]
fn simple_policy_ignores_workload() {
    let mut adc = adc(DispatchPolicy::Simple);
    adc.start_continuous(A2, AdcSelect::Any).unwrap();
    assert_eq!(adc.workload(ModuleId::Adc0), 1);

    assert_eq!(
        adc.dispatch(ConversionRequest::Single(A2), AdcSelect::Any),
        Ok(ModuleId::Adc0)
    );
    // Falls back to ADC1 only when ADC0 cannot read the pin.
    assert_eq!(
        adc.dispatch(ConversionRequest::Single(Pin(31)), AdcSelect::Any),
        Ok(ModuleId::Adc1)
    );
}

#[test]
fn no_eligible_module_flags_both() {
    let mut adc = adc(DispatchPolicy::Workload);
    let request = ConversionRequest::Single(Pin(29));

    assert_eq!(adc.dispatch(request, AdcSelect::Any), Err(AdcError::WrongPin));
    assert_eq!(adc.fail_flags(ModuleId::Adc0), FailFlags::WRONG_PIN);
    assert_eq!(adc.fail_flags(ModuleId::Adc1), FailFlags::WRONG_PIN);
    assert_eq!(adc.start_single_read(Pin(29), AdcSelect::Any), Err(AdcError::WrongPin));
}

#[test]
fn successful_dispatch_has_no_side_effects() {
    let mut adc = adc(DispatchPolicy::Workload);
    let bus = adc.driver(ModuleId::Adc0).bus().clone();

    assert_eq!(
        adc.dispatch(ConversionRequest::Single(A2), AdcSelect::Any),
        Ok(ModuleId::Adc0)
    );
    assert!(bus.events().is_empty());
    assert_eq!(adc.workload(ModuleId::Adc0), 0);
    assert_eq!(adc.fail_flags(ModuleId::Adc0), FailFlags::empty());
}

#[tokio::test]
async fn explicit_selection_bypasses_eligibility() {
    let mut adc = adc(DispatchPolicy::Workload);
    let bus = adc.driver(ModuleId::Adc1).bus().clone();

    // A0 = 14 is not wired to ADC1, but an explicit choice is trusted.
    assert_eq!(
        adc.dispatch(ConversionRequest::Single(Pin(14)), AdcSelect::Adc1),
        Ok(ModuleId::Adc1)
    );
    let value = adc.analog_read(Pin(14), AdcSelect::Adc1).await;

    assert_eq!(value, ERROR_VALUE);
    assert_eq!(
        bus.count(SimEvent::Start {
            module: ModuleId::Adc1,
            request: ConversionRequest::Single(Pin(14)),
            continuous: false,
        }),
        1
    );
    assert!(!adc.fail_flags(ModuleId::Adc1).contains(FailFlags::WRONG_PIN));
}
