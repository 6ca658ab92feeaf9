// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{SimResult, SimulationError};
use bcm_gpio_core::layout::GpioLayout;
use bcm_gpio_core::pin::{PIN_COUNT, PINS_PER_BANK};
use bcm_gpio_core::{Function, Level, Pin, RegisterBus};
use serde::Serialize;
use std::cell::RefCell;

const FSEL_WORDS: usize = 6;
/// Bank 1 only carries pins 32..=53.
const BANK1_MASK: u32 = (1 << (PIN_COUNT - PINS_PER_BANK)) - 1;

/// Behavioural model of the BCM283x GPIO block.
///
/// GPSETn and GPCLRn are write-1-to-set and write-1-to-clear against an
/// output latch. Zero bits change nothing, and both registers read as zero.
/// GPLEVn shows the latch for pins in output mode and the externally driven
/// level for every other pin. Registers the model does not cover (event
/// detect, pull control) read as zero and drop writes.
#[derive(Debug)]
pub struct GpioBlock {
    layout: GpioLayout,
    fsel: [u32; FSEL_WORDS],
    latch: u64,
    inputs: u64,
    faults: RefCell<Vec<SimulationError>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinState {
    pub pin: Pin,
    pub function: Function,
    pub level: Level,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinSnapshot {
    pub pin: u8,
    pub function: String,
    pub level: String,
}

impl From<PinState> for PinSnapshot {
    fn from(state: PinState) -> Self {
        Self {
            pin: state.pin.number(),
            function: state.function.to_string(),
            level: state.level.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpioSnapshot {
    pub base: usize,
    pub fsel: [u32; FSEL_WORDS],
    pub latch: u64,
    pub inputs: u64,
    /// Pins that left their reset state (input, low).
    pub pins: Vec<PinSnapshot>,
}

impl GpioBlock {
    pub fn new(layout: GpioLayout) -> Self {
        Self {
            layout,
            fsel: [0; FSEL_WORDS],
            latch: 0,
            inputs: 0,
            faults: RefCell::new(Vec::new()),
        }
    }

    pub fn layout(&self) -> &GpioLayout {
        &self.layout
    }

    pub fn faults(&self) -> Vec<SimulationError> {
        self.faults.borrow().clone()
    }

    /// Sets the level an external circuit applies to `pin`.
    pub fn drive_input(&mut self, pin: Pin, level: Level) {
        let bit = 1u64 << pin.number();
        match level {
            Level::High => self.inputs |= bit,
            Level::Low => self.inputs &= !bit,
        }
    }

    fn function_of(&self, pin: Pin) -> Function {
        let raw = (self.fsel[pin.fsel_index()] >> pin.fsel_shift()) & Function::MASK;
        Function::try_from(raw).unwrap_or(Function::Input)
    }

    fn levels(&self) -> u64 {
        let outputs = Pin::all()
            .filter(|&pin| self.function_of(pin) == Function::Output)
            .fold(0u64, |mask, pin| mask | (1 << pin.number()));
        (self.latch & outputs) | (self.inputs & !outputs)
    }

    pub fn pin_state(&self, pin: Pin) -> PinState {
        PinState {
            pin,
            function: self.function_of(pin),
            level: Level::from(self.levels() & (1 << pin.number()) != 0),
        }
    }

    pub fn gpio_snapshot(&self) -> GpioSnapshot {
        GpioSnapshot {
            base: self.layout.base,
            fsel: self.fsel,
            latch: self.latch,
            inputs: self.inputs,
            pins: Pin::all()
                .map(|pin| self.pin_state(pin))
                .filter(|s| s.function != Function::Input || s.level == Level::High)
                .map(PinSnapshot::from)
                .collect(),
        }
    }

    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self.gpio_snapshot()).unwrap_or(serde_json::Value::Null)
    }

    fn offset(&self, addr: usize) -> SimResult<usize> {
        if addr % 4 != 0 {
            return Err(SimulationError::Unaligned(addr));
        }
        match addr.checked_sub(self.layout.base) {
            Some(offset)
                if addr
                    .checked_add(4)
                    .is_some_and(|next| next <= self.layout.end()) =>
            {
                Ok(offset)
            }
            _ => Err(SimulationError::Unmapped(addr)),
        }
    }

    fn bank_of(&self, offset: usize, reg: usize) -> Option<usize> {
        match offset.checked_sub(reg) {
            Some(0) => Some(0),
            Some(4) => Some(1),
            _ => None,
        }
    }

    fn bank_mask(bank: usize) -> u32 {
        if bank == 0 {
            u32::MAX
        } else {
            BANK1_MASK
        }
    }

    fn read_reg(&self, offset: usize) -> u32 {
        let l = &self.layout;
        if let Some(index) = offset
            .checked_sub(l.fsel)
            .map(|o| o / 4)
            .filter(|&i| i < FSEL_WORDS)
        {
            return self.fsel[index];
        }
        if let Some(bank) = self.bank_of(offset, l.lev) {
            return (self.levels() >> (bank as u32 * PINS_PER_BANK as u32)) as u32
                & Self::bank_mask(bank);
        }
        // GPSETn/GPCLRn are write-only; unmodelled registers read as zero.
        0
    }

    fn write_reg(&mut self, offset: usize, value: u32) {
        let l = self.layout;
        if let Some(index) = offset
            .checked_sub(l.fsel)
            .map(|o| o / 4)
            .filter(|&i| i < FSEL_WORDS)
        {
            self.fsel[index] = value;
            return;
        }
        if let Some(bank) = self.bank_of(offset, l.set) {
            let bits = ((value & Self::bank_mask(bank)) as u64) << (bank * 32);
            self.latch |= bits;
            return;
        }
        if let Some(bank) = self.bank_of(offset, l.clr) {
            let bits = ((value & Self::bank_mask(bank)) as u64) << (bank * 32);
            self.latch &= !bits;
            return;
        }
        tracing::debug!("ignoring write to unmodelled GPIO offset {:#x}", offset);
    }

    fn fault(&self, err: SimulationError) {
        tracing::warn!("{}", err);
        self.faults.borrow_mut().push(err);
    }
}

impl RegisterBus for GpioBlock {
    fn read_u32(&self, addr: usize) -> u32 {
        match self.offset(addr) {
            Ok(offset) => self.read_reg(offset),
            Err(e) => {
                self.fault(e);
                0
            }
        }
    }

    fn write_u32(&mut self, addr: usize, value: u32) {
        match self.offset(addr) {
            Ok(offset) => {
                tracing::trace!("gpio +{:#04x} <= {:#010x}", offset, value);
                self.write_reg(offset, value)
            }
            Err(e) => self.fault(e),
        }
    }
}
