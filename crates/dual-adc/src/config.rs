//! Coordinator configuration and constants

/// Number of ADC modules a coordinator can drive.
pub const NUM_MODULES: usize = 2;

/// How a request without an explicit module is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchPolicy {
    /// Prefer the eligible module with the smaller workload; ties go to ADC0.
    #[default]
    Workload,
    /// ADC0 whenever it can serve the request, ADC1 otherwise.
    Simple,
}

/// Coordinator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcConfig {
    /// Routing policy for [`AdcSelect::Any`](platform::AdcSelect::Any) requests.
    pub dispatch: DispatchPolicy,
}

impl AdcConfig {
    /// Default configuration with a different dispatch policy.
    pub const fn with_dispatch(dispatch: DispatchPolicy) -> Self {
        Self { dispatch }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_workload() {
        assert_eq!(AdcConfig::default().dispatch, DispatchPolicy::Workload);
    }
}
