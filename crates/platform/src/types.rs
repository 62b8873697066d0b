//! Value types shared between module drivers and the coordination layer.

use core::fmt;

/// Sentinel returned in place of a reading when a conversion could not be
/// performed or did not satisfy the configured comparison.
///
/// Lies outside every value a successful conversion can produce: single-ended
/// readings span `[0, 65535]` and corrected 16-bit differential readings span
/// `[-65536, 65534]`.
pub const ERROR_VALUE: i32 = -70_000;

/// A concrete ADC peripheral instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleId {
    /// First module (ADC0). Present on every board.
    Adc0,
    /// Second module (ADC1). Present only on dual-module boards.
    Adc1,
}

impl ModuleId {
    /// Zero-based index of the module.
    pub const fn index(self) -> usize {
        match self {
            Self::Adc0 => 0,
            Self::Adc1 => 1,
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adc0 => write!(f, "ADC0"),
            Self::Adc1 => write!(f, "ADC1"),
        }
    }
}

/// Module selector used at the request boundary.
///
/// `Any` lets the dispatch policy choose; it is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcSelect {
    /// Whichever module can best serve the request.
    #[default]
    Any,
    /// Force ADC0.
    Adc0,
    /// Force ADC1.
    Adc1,
}

impl AdcSelect {
    /// The concrete module, or `None` for [`AdcSelect::Any`].
    pub const fn module(self) -> Option<ModuleId> {
        match self {
            Self::Any => None,
            Self::Adc0 => Some(ModuleId::Adc0),
            Self::Adc1 => Some(ModuleId::Adc1),
        }
    }
}

impl From<ModuleId> for AdcSelect {
    fn from(id: ModuleId) -> Self {
        match id {
            ModuleId::Adc0 => Self::Adc0,
            ModuleId::Adc1 => Self::Adc1,
        }
    }
}

/// Board pin number of an analog input.
///
/// Whether a pin can be read by a given module is only known to that module's
/// pin map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(pub u8);

impl Pin {
    /// Raw pin number.
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl From<u8> for Pin {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pin {}", self.0)
    }
}

/// What a caller wants converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionRequest {
    /// One pin against the reference.
    Single(Pin),
    /// Voltage difference `positive - negative`.
    Differential {
        /// Positive input.
        positive: Pin,
        /// Negative input.
        negative: Pin,
    },
}

impl ConversionRequest {
    /// Differential request from raw pin numbers.
    pub fn differential(positive: impl Into<Pin>, negative: impl Into<Pin>) -> Self {
        Self::Differential {
            positive: positive.into(),
            negative: negative.into(),
        }
    }

    /// `true` for [`ConversionRequest::Differential`].
    pub const fn is_differential(&self) -> bool {
        matches!(self, Self::Differential { .. })
    }
}

impl From<Pin> for ConversionRequest {
    fn from(pin: Pin) -> Self {
        Self::Single(pin)
    }
}

/// Conversion resolution in bits.
///
/// Single-ended modes use 8, 10, 12 or 16 bits; differential modes use 9, 11,
/// 13 or 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 8 bits
    Bits8,
    /// 9 bits (differential)
    Bits9,
    /// 10 bits
    Bits10,
    /// 11 bits (differential)
    Bits11,
    /// 12 bits
    Bits12,
    /// 13 bits (differential)
    Bits13,
    /// 16 bits
    Bits16,
}

impl Resolution {
    /// All supported resolutions, ascending.
    pub const ALL: [Self; 7] = [
        Self::Bits8,
        Self::Bits9,
        Self::Bits10,
        Self::Bits11,
        Self::Bits12,
        Self::Bits13,
        Self::Bits16,
    ];

    /// Number of bits.
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits8 => 8,
            Self::Bits9 => 9,
            Self::Bits10 => 10,
            Self::Bits11 => 11,
            Self::Bits12 => 12,
            Self::Bits13 => 13,
            Self::Bits16 => 16,
        }
    }

    /// Largest reading at this resolution: `2^bits - 1`.
    #[allow(clippy::arithmetic_side_effects)] // bits <= 16, cannot overflow u32
    pub const fn max_value(self) -> u32 {
        (1u32 << self.bits()) - 1
    }
}

impl TryFrom<u8> for Resolution {
    type Error = u8;

    /// Rejected bit counts are handed back unchanged.
    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::Bits8),
            9 => Ok(Self::Bits9),
            10 => Ok(Self::Bits10),
            11 => Ok(Self::Bits11),
            12 => Ok(Self::Bits12),
            13 => Ok(Self::Bits13),
            16 => Ok(Self::Bits16),
            other => Err(other),
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::Bits10
    }
}

bitflags::bitflags! {
    /// Accumulated per-module failure flags.
    ///
    /// Flags are only ever added by the coordination layer; clearing them is an
    /// explicit application decision.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FailFlags: u8 {
        /// The requested pin or pair cannot be routed to the module.
        const WRONG_PIN = 1 << 0;
        /// The conversion finished without satisfying the compare condition.
        const COMPARISON = 1 << 1;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FailFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FailFlags({=u8:#04x})", self.bits());
    }
}

/// Raw channel-select value written to a module's conversion trigger register
/// (SC1A on Kinetis parts).
///
/// Writing a channel starts a conversion; writing [`ChannelTrigger::DISABLED`]
/// halts the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelTrigger(pub u32);

impl ChannelTrigger {
    /// Channel value that disables the converter.
    pub const DISABLED: Self = Self(0x1F);

    /// `true` if this value halts the module.
    pub const fn is_disabled(self) -> bool {
        self.0 & 0x1F == 0x1F
    }
}
