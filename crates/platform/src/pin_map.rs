//! Pin eligibility tables.
//!
//! Each module carries a [`PinMap`] translating board pin numbers into the
//! channel number written to the module's SC1A register. The coordination
//! layer only ever asks "can this module read this pin / pair?"; the channel
//! numbers themselves are consumed by the module driver.
//!
//! ## Channel encoding
//!
//! | Bits        | Meaning |
//! |-------------|---------|
//! | `0x1F` mask | SC1A channel, `0x1F` = not connected to this module |
//! | `0x40`      | Pin is also one half of a differential pair |
//! | `0x80`      | Pin is routed through mux A (mux B otherwise) |

use crate::types::{ChannelTrigger, Pin};

/// Channel bits of a table entry.
pub const SC1A_CHANNELS: u8 = 0x1F;
/// Entry value for a pin not connected to the module.
pub const SC1A_PIN_INVALID: u8 = 0x1F;
/// Flag: pin is part of a differential pair.
pub const SC1A_PIN_DIFF: u8 = 0x40;
/// Flag: pin uses mux A.
pub const SC1A_PIN_MUX: u8 = 0x80;
/// SC1A DIFF bit, set when a differential channel is triggered.
pub const SC1A_DIFF: u32 = 0x20;

/// One differential input pair of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiffPair {
    /// Positive input pin.
    pub positive: Pin,
    /// Negative input pin.
    pub negative: Pin,
    /// Differential channel number.
    pub channel: u8,
    /// The programmable gain amplifier can be used on this pair.
    pub pga: bool,
}

/// Per-module, per-board pin routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    /// Indexed by pin number; see the module docs for the encoding.
    pub channels: &'static [u8],
    /// Differential pairs available on this module.
    pub differential: &'static [DiffPair],
}

impl PinMap {
    /// SC1A channel of `pin`, or `None` if the module cannot read it.
    pub fn channel(&self, pin: Pin) -> Option<u8> {
        let entry = *self.channels.get(usize::from(pin.number()))?;
        let channel = entry & SC1A_CHANNELS;
        (channel != SC1A_PIN_INVALID).then_some(channel)
    }

    /// `true` if the module can read `pin` single-ended.
    pub fn check_pin(&self, pin: Pin) -> bool {
        self.channel(pin).is_some()
    }

    /// `true` if `pin` is routed through mux A.
    pub fn uses_mux_a(&self, pin: Pin) -> bool {
        self.channels
            .get(usize::from(pin.number()))
            .is_some_and(|entry| entry & SC1A_PIN_MUX != 0)
    }

    /// The differential pair `positive - negative`, if the module has it.
    pub fn differential_pair(&self, positive: Pin, negative: Pin) -> Option<&DiffPair> {
        self.differential
            .iter()
            .find(|pair| pair.positive == positive && pair.negative == negative)
            .filter(|pair| pair.channel & SC1A_CHANNELS != SC1A_PIN_INVALID)
    }

    /// `true` if the module can convert `positive - negative`.
    pub fn check_differential_pins(&self, positive: Pin, negative: Pin) -> bool {
        self.differential_pair(positive, negative).is_some()
    }

    /// Trigger value that starts a single-ended conversion of `pin`.
    pub fn single_trigger(&self, pin: Pin) -> Option<ChannelTrigger> {
        self.channel(pin).map(|channel| ChannelTrigger(u32::from(channel)))
    }

    /// Trigger value that starts a differential conversion of the pair.
    pub fn differential_trigger(&self, positive: Pin, negative: Pin) -> Option<ChannelTrigger> {
        self.differential_pair(positive, negative)
            .map(|pair| ChannelTrigger(u32::from(pair.channel & SC1A_CHANNELS) | SC1A_DIFF))
    }
}

/// Board tables.
///
/// Pin numbers follow the Teensy board numbering (A0 = 14 … A9 = 23 on every
/// variant; A10/A11 differ per board).
pub mod boards {
    use super::{DiffPair, PinMap, SC1A_PIN_DIFF as D, SC1A_PIN_MUX as M};
    use crate::types::Pin;

    /// Teensy 3.1/3.2: A10..A13 are pins 34..37.
    pub mod teensy31 {
        use super::*;

        /// A10, positive input of the first differential pair.
        pub const A10: Pin = Pin(34);
        /// A11, negative input of the first differential pair.
        pub const A11: Pin = Pin(35);
        /// A12, positive input of the second differential pair.
        pub const A12: Pin = Pin(36);
        /// A13, negative input of the second differential pair.
        pub const A13: Pin = Pin(37);

        #[rustfmt::skip]
        const ADC0_CHANNELS: [u8; 44] = [
            5, 14, 8, 9, 13, 12, 6, 7, 15, 4, 0, 19, 3, 31,
            5, 14, 8, 9, 13, 12, 6, 7, 15, 4,
            31, 31, 31, 31, 31, 31, 31, 31, 31, 31,
            D, 19 + D, 3 + D, 31 + D,
            26, 22, 23, 27, 29, 30,
        ];

        #[rustfmt::skip]
        const ADC1_CHANNELS: [u8; 44] = [
            31, 31, 8, 9, 31, 31, 31, 31, 31, 31, 3, 31, 0, 19,
            31, 31, 8, 9, 31, 31, 31, 31, 31, 31,
            31, 31,
            5 + M, 5, 4, 6, 7, 4 + M, 31, 31,
            3 + D, 31 + D, D, 19 + D,
            26, 18, 31, 27, 29, 30,
        ];

        const ADC0_DIFF: [DiffPair; 2] = [
            DiffPair { positive: A10, negative: A11, channel: 0, pga: true },
            DiffPair { positive: A12, negative: A13, channel: 3, pga: false },
        ];

        const ADC1_DIFF: [DiffPair; 2] = [
            DiffPair { positive: A10, negative: A11, channel: 3, pga: false },
            DiffPair { positive: A12, negative: A13, channel: 0, pga: true },
        ];

        /// ADC0 routing.
        pub const ADC0: PinMap = PinMap { channels: &ADC0_CHANNELS, differential: &ADC0_DIFF };
        /// ADC1 routing.
        pub const ADC1: PinMap = PinMap { channels: &ADC1_CHANNELS, differential: &ADC1_DIFF };
    }

    /// Teensy 3.6: A10/A11 are pins 64/65.
    pub mod teensy36 {
        use super::*;

        /// A10, positive differential input.
        pub const A10: Pin = Pin(64);
        /// A11, negative differential input.
        pub const A11: Pin = Pin(65);

        #[rustfmt::skip]
        const ADC0_CHANNELS: [u8; 68] = [
            5, 14, 8, 9, 13, 12, 6, 7, 15, 4, 3, 31, 31, 31,
            5, 14, 8, 9, 13, 12, 6, 7, 15, 4,
            26, 27, 29, 30, 31, 31, 31,
            31, 31, 17, 18,
            31, 31, 31, 31, 31, 31, 31, 31, 31,
            31, 31, 31, 31, 31, 31, 31, 31, 31,
            31, 31, 31, 31, 31, 31, 31, 31, 31,
            31, 31, 3 + D, 31 + D, 23, 31,
        ];

        #[rustfmt::skip]
        const ADC1_CHANNELS: [u8; 68] = [
            31, 31, 8, 9, 31, 31, 31, 31, 31, 31, 31, 19, 14, 15,
            31, 31, 8, 9, 31, 31, 31, 31, 31, 31,
            26, 27, 29, 30, 18, 31, 31,
            14, 15, 31, 31, 4, 5, 6, 7, 17,
            31, 31, 31, 23,
            31, 31, 31, 31, 31, 10, 11, 31, 31,
            31, 31, 31, 31, 31, 31, 31, 31, 31,
            31, 31, D, 19 + D, 31, 23,
        ];

        const ADC0_DIFF: [DiffPair; 1] =
            [DiffPair { positive: A10, negative: A11, channel: 3, pga: false }];

        const ADC1_DIFF: [DiffPair; 1] =
            [DiffPair { positive: A10, negative: A11, channel: 0, pga: false }];

        /// ADC0 routing.
        pub const ADC0: PinMap = PinMap { channels: &ADC0_CHANNELS, differential: &ADC0_DIFF };
        /// ADC1 routing.
        pub const ADC1: PinMap = PinMap { channels: &ADC1_CHANNELS, differential: &ADC1_DIFF };
    }

    /// Teensy LC: single module, A10/A11 are pins 24/25.
    pub mod teensy_lc {
        use super::*;

        /// A10, positive differential input.
        pub const A10: Pin = Pin(24);
        /// A11, negative differential input.
        pub const A11: Pin = Pin(25);

        #[rustfmt::skip]
        const ADC0_CHANNELS: [u8; 44] = [
            5, 14, 8, 9, 13, 12, 6, 7, 15, 11, 0, 4 + M, 23, 31,
            5, 14, 8, 9, 13, 12, 6, 7, 15, 11,
            D, 4 + M + D, 23, 31, 31, 31, 31, 31, 31, 31,
            31, 31, 31, 31,
            26, 27, 31, 27, 29, 30,
        ];

        const ADC0_DIFF: [DiffPair; 1] =
            [DiffPair { positive: A10, negative: A11, channel: 0, pga: false }];

        /// ADC0 routing (the only module).
        pub const ADC0: PinMap = PinMap { channels: &ADC0_CHANNELS, differential: &ADC0_DIFF };
    }
}
