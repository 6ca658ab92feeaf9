// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{SimResult, SimulationError};
use bcm_gpio_core::layout::{GpioLayout, GPIO_BLOCK_SIZE};
use bcm_gpio_core::RegisterBus;
use serde::Serialize;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    Read,
    Write,
}

/// One bus transaction, in the order it reached the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Access {
    pub kind: AccessKind,
    pub addr: usize,
    pub value: u32,
}

/// Flat simulated register memory.
///
/// Words hold exactly what was last written, with no peripheral side effects.
/// Every access is logged, so tests can check how many reads and writes an
/// operation issued and in what order.
#[derive(Debug, Serialize)]
pub struct RegisterFile {
    base: usize,
    words: Vec<u32>,
    #[serde(skip)]
    log: RefCell<Vec<Access>>,
    #[serde(skip)]
    faults: RefCell<Vec<SimulationError>>,
}

impl RegisterFile {
    pub fn new(base: usize, size: usize) -> Self {
        Self {
            base,
            words: vec![0; size.div_ceil(4)],
            log: RefCell::new(Vec::new()),
            faults: RefCell::new(Vec::new()),
        }
    }

    /// Zeroed memory covering the whole GPIO block of `layout`.
    pub fn for_layout(layout: &GpioLayout) -> Self {
        Self::new(layout.base, GPIO_BLOCK_SIZE)
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Word at byte `offset` from the base.
    pub fn offset_word(&self, offset: usize) -> u32 {
        self.words.get(offset / 4).copied().unwrap_or(0)
    }

    pub fn set_offset_word(&mut self, offset: usize, value: u32) {
        if let Some(word) = self.words.get_mut(offset / 4) {
            *word = value;
        }
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.log.borrow().clone()
    }

    pub fn clear_log(&mut self) {
        self.log.get_mut().clear();
    }

    pub fn faults(&self) -> Vec<SimulationError> {
        self.faults.borrow().clone()
    }

    fn index(&self, addr: usize) -> SimResult<usize> {
        if addr % 4 != 0 {
            return Err(SimulationError::Unaligned(addr));
        }
        let index = addr
            .checked_sub(self.base)
            .map(|offset| offset / 4)
            .filter(|&index| index < self.words.len())
            .ok_or(SimulationError::Unmapped(addr))?;
        Ok(index)
    }

    pub fn try_read(&self, addr: usize) -> SimResult<u32> {
        let value = self.words[self.index(addr)?];
        self.log.borrow_mut().push(Access {
            kind: AccessKind::Read,
            addr,
            value,
        });
        Ok(value)
    }

    pub fn try_write(&mut self, addr: usize, value: u32) -> SimResult<()> {
        let index = self.index(addr)?;
        self.words[index] = value;
        self.log.get_mut().push(Access {
            kind: AccessKind::Write,
            addr,
            value,
        });
        Ok(())
    }

    fn fault(&self, err: SimulationError) {
        tracing::warn!("{}", err);
        self.faults.borrow_mut().push(err);
    }

    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl RegisterBus for RegisterFile {
    fn read_u32(&self, addr: usize) -> u32 {
        self.try_read(addr).unwrap_or_else(|e| {
            self.fault(e);
            0
        })
    }

    fn write_u32(&mut self, addr: usize, value: u32) {
        tracing::trace!("write {:#x} = {:#010x}", addr, value);
        if let Err(e) = self.try_write(addr, value) {
            self.fault(e);
        }
    }
}
