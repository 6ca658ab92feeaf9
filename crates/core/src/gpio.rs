// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::bus::RegisterBus;
use crate::layout::GpioLayout;
use crate::pin::{Function, Level, Pin};

/// GPIO accessor over a register bus.
///
/// `set_function` is a read-modify-write of a GPFSELn word shared by ten
/// pins. It is not atomic. Mutating calls take `&mut self`, so one owner
/// serialises them. Driving the same block from an interrupt handler or a
/// second core needs a lock around the accessor.
#[derive(Debug)]
pub struct Gpio<B> {
    bus: B,
    layout: GpioLayout,
}

impl<B: RegisterBus> Gpio<B> {
    pub fn new(bus: B, layout: GpioLayout) -> Self {
        Self { bus, layout }
    }

    pub fn layout(&self) -> &GpioLayout {
        &self.layout
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Selects `function` for `pin`. Bits outside the pin's 3-bit field keep
    /// their current value.
    pub fn set_function(&mut self, pin: Pin, function: Function) {
        let addr = self.layout.fsel_addr(pin);
        let shift = pin.fsel_shift();
        reg_debug!("{} -> {} (fsel {:#x} << {})", pin, function, addr, shift);
        self.bus
            .modify_u32(addr, Function::MASK << shift, function.bits() << shift);
    }

    pub fn function(&self, pin: Pin) -> Function {
        let raw = self.bus.read_u32(self.layout.fsel_addr(pin));
        // A masked 3-bit field always decodes.
        Function::try_from((raw >> pin.fsel_shift()) & Function::MASK).unwrap_or(Function::Input)
    }

    /// Drives `pin` high through GPSETn.
    ///
    /// GPSETn is write-1-to-set: the zero bits in the written word leave the
    /// other pins alone, so this is a single write with no read.
    pub fn set_output_high(&mut self, pin: Pin) {
        let addr = self.layout.set_addr(pin);
        reg_trace!("{} high (set {:#x} = {:#010x})", pin, addr, pin.bank_mask());
        self.bus.write_u32(addr, pin.bank_mask());
    }

    /// Drives `pin` low through GPCLRn (write-1-to-clear).
    pub fn set_output_low(&mut self, pin: Pin) {
        let addr = self.layout.clr_addr(pin);
        reg_trace!("{} low (clr {:#x} = {:#010x})", pin, addr, pin.bank_mask());
        self.bus.write_u32(addr, pin.bank_mask());
    }

    pub fn set_level(&mut self, pin: Pin, level: Level) {
        match level {
            Level::High => self.set_output_high(pin),
            Level::Low => self.set_output_low(pin),
        }
    }

    /// Current electrical level from GPLEVn.
    pub fn level(&self, pin: Pin) -> Level {
        let raw = self.bus.read_u32(self.layout.lev_addr(pin));
        Level::from(raw & pin.bank_mask() != 0)
    }
}
