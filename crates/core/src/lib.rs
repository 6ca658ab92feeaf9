// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Register-level GPIO control for the Broadcom BCM283x/BCM2711 family.
//!
//! The accessor in [`gpio`] never touches an address directly. It goes through
//! the [`bus::RegisterBus`] seam, which is backed by volatile MMIO on hardware
//! and by a register model from `bcm-gpio-sim` on the host.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod macros;

pub mod bus;
pub mod gpio;
pub mod layout;
pub mod pin;
pub mod startup;

pub use bus::{Mmio, RegisterBus};
pub use gpio::Gpio;
pub use layout::{GpioLayout, PinLocation};
pub use pin::{Function, Level, Pin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GpioError {
    #[error("GPIO pin {0} is out of range (0..{max})", max = pin::PIN_COUNT)]
    InvalidPin(u8),
    #[error("invalid function-select code {0:#05b}")]
    InvalidFunction(u32),
}

pub type GpioResult<T> = Result<T, GpioError>;
