// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{GpioError, GpioResult};
use core::fmt;

/// Number of GPIO lines on the BCM283x/BCM2711 GPIO block.
pub const PIN_COUNT: u8 = 54;

/// Pins per function-select register (3 bits each, top 2 bits unused).
pub const PINS_PER_FSEL: u8 = 10;

/// Pins per set/clear/level register.
pub const PINS_PER_BANK: u8 = 32;

/// A GPIO line number known to be in `0..PIN_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pin(u8);

impl Pin {
    pub fn new(number: u8) -> GpioResult<Self> {
        if number < PIN_COUNT {
            Ok(Self(number))
        } else {
            Err(GpioError::InvalidPin(number))
        }
    }

    /// Range check for pins fixed at build time.
    ///
    /// Panics on an out-of-range number, so `const LED: Pin = Pin::checked(60)`
    /// fails to compile.
    pub const fn checked(number: u8) -> Self {
        assert!(number < PIN_COUNT, "GPIO pin out of range");
        Self(number)
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    /// Index of the GPFSELn register holding this pin's field.
    pub const fn fsel_index(self) -> usize {
        (self.0 / PINS_PER_FSEL) as usize
    }

    /// Bit offset of the 3-bit function field inside GPFSELn.
    pub const fn fsel_shift(self) -> u32 {
        (self.0 % PINS_PER_FSEL) as u32 * 3
    }

    /// Index of the GPSETn/GPCLRn/GPLEVn register for this pin.
    pub const fn bank(self) -> usize {
        (self.0 / PINS_PER_BANK) as usize
    }

    pub const fn bank_bit(self) -> u32 {
        (self.0 % PINS_PER_BANK) as u32
    }

    pub const fn bank_mask(self) -> u32 {
        1 << self.bank_bit()
    }

    pub fn all() -> impl Iterator<Item = Pin> {
        (0..PIN_COUNT).map(Pin)
    }
}

impl TryFrom<u8> for Pin {
    type Error = GpioError;

    fn try_from(number: u8) -> GpioResult<Self> {
        Self::new(number)
    }
}

impl From<Pin> for u8 {
    fn from(pin: Pin) -> u8 {
        pin.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Pin function as encoded in a GPFSELn field.
///
/// The alternate functions are not numbered in code order: ALT4 is `011` and
/// ALT5 is `010`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Input,
    Output,
    Alt0,
    Alt1,
    Alt2,
    Alt3,
    Alt4,
    Alt5,
}

impl Function {
    pub const MASK: u32 = 0b111;

    pub const ALL: [Function; 8] = [
        Function::Input,
        Function::Output,
        Function::Alt0,
        Function::Alt1,
        Function::Alt2,
        Function::Alt3,
        Function::Alt4,
        Function::Alt5,
    ];

    pub const fn bits(self) -> u32 {
        match self {
            Function::Input => 0b000,
            Function::Output => 0b001,
            Function::Alt0 => 0b100,
            Function::Alt1 => 0b101,
            Function::Alt2 => 0b110,
            Function::Alt3 => 0b111,
            Function::Alt4 => 0b011,
            Function::Alt5 => 0b010,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Function::Input => "input",
            Function::Output => "output",
            Function::Alt0 => "alt0",
            Function::Alt1 => "alt1",
            Function::Alt2 => "alt2",
            Function::Alt3 => "alt3",
            Function::Alt4 => "alt4",
            Function::Alt5 => "alt5",
        }
    }
}

impl TryFrom<u32> for Function {
    type Error = GpioError;

    fn try_from(bits: u32) -> GpioResult<Self> {
        match bits {
            0b000 => Ok(Function::Input),
            0b001 => Ok(Function::Output),
            0b100 => Ok(Function::Alt0),
            0b101 => Ok(Function::Alt1),
            0b110 => Ok(Function::Alt2),
            0b111 => Ok(Function::Alt3),
            0b011 => Ok(Function::Alt4),
            0b010 => Ok(Function::Alt5),
            _ => Err(GpioError::InvalidFunction(bits)),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => f.write_str("low"),
            Level::High => f.write_str("high"),
        }
    }
}
