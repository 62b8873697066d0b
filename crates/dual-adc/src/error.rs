//! Coordinator error type

use platform::ModuleId;

/// Reasons a start, stop or deferred read was refused.
///
/// Readings never carry this type; they report failure with
/// [`ERROR_VALUE`](platform::ERROR_VALUE) and the module's fail flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// No module can serve the requested pin or pair.
    WrongPin,
    /// The module still holds a preempted configuration awaiting restore.
    RestorePending(ModuleId),
    /// A non-blocking synchronized read has been started and not yet read.
    SyncInFlight,
    /// `read_sync` was called without a matching `start_sync_read`.
    SyncNotStarted,
    /// A conversion is still running.
    Busy,
    /// The operation needs two modules and the coordinator has one.
    SingleModule,
}

#[cfg(feature = "std")]
impl std::error::Error for AdcError {}

impl core::fmt::Display for AdcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WrongPin => write!(f, "Pin cannot be read by the selected module"),
            Self::RestorePending(id) => write!(f, "{id} has a configuration pending restore"),
            Self::SyncInFlight => write!(f, "Synchronized read already in flight"),
            Self::SyncNotStarted => write!(f, "No synchronized read was started"),
            Self::Busy => write!(f, "Conversion still in progress"),
            Self::SingleModule => write!(f, "Operation requires two ADC modules"),
        }
    }
}
