// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod gpio_block;
pub mod register_file;

pub use gpio_block::{GpioBlock, GpioSnapshot, PinSnapshot, PinState};
pub use register_file::{Access, AccessKind, RegisterFile};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("access to unmapped register address {0:#x}")]
    Unmapped(usize),
    #[error("unaligned register access at {0:#x}")]
    Unaligned(usize),
}

pub type SimResult<T> = Result<T, SimulationError>;
