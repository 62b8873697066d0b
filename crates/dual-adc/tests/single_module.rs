//! Coordinator on a board with one ADC module.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use dual_adc::{Adc, AdcError, AdcSelect, ModuleId, Pin, SyncResult};
use platform::pin_map::boards::teensy_lc;
use platform::{ConversionRequest, SimAdcModule};

fn adc() -> Adc<SimAdcModule> {
    Adc::single(SimAdcModule::new(ModuleId::Adc0, teensy_lc::ADC0))
}

#[tokio::test]
async fn every_request_goes_to_adc0() {
    let mut adc = adc();
    adc.driver_mut(ModuleId::Adc0).set_input(Pin(14), 321);

    assert_eq!(adc.num_modules(), 1);
    assert_eq!(adc.analog_read(Pin(14), AdcSelect::Adc1).await, 321);
    assert_eq!(adc.start_single_read(Pin(14), AdcSelect::Adc1), Ok(ModuleId::Adc0));
    // Eligibility is not consulted either.
    assert_eq!(
        adc.dispatch(ConversionRequest::Single(Pin(200)), AdcSelect::Any),
        Ok(ModuleId::Adc0)
    );
}

#[tokio::test]
async fn synchronized_operations_are_refused() {
    let mut adc = adc();

    assert_eq!(adc.analog_sync_read(Pin(14), Pin(15)).await, SyncResult::ERROR);
    assert_eq!(adc.start_sync_read(Pin(14), Pin(15)), Err(AdcError::SingleModule));
    assert_eq!(adc.start_sync_continuous(Pin(14), Pin(15)), Err(AdcError::SingleModule));
    assert_eq!(adc.stop_sync_continuous(), Err(AdcError::SingleModule));
    assert_eq!(adc.read_sync_continuous(), SyncResult::ERROR);
    assert_eq!(adc.read_sync(), Err(AdcError::SyncNotStarted));
}

#[test]
fn adc1_queries_answer_for_adc0() {
    let mut adc = adc();
    adc.start_continuous(Pin(14), AdcSelect::Any).unwrap();
    assert!(adc.is_continuous(ModuleId::Adc1));
    assert_eq!(adc.workload(ModuleId::Adc1), 1);
    assert!(!adc.is_sync_complete());
}
