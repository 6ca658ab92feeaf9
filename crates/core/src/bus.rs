// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use core::ptr::{read_volatile, write_volatile};

/// Word-wide access to memory-mapped registers.
///
/// Addresses are absolute. Implementations must perform every call as one
/// real access, in program order. Hardware registers have side effects, so a
/// read or write may not be cached, merged or dropped.
pub trait RegisterBus {
    fn read_u32(&self, addr: usize) -> u32;
    fn write_u32(&mut self, addr: usize, value: u32);

    /// Read-modify-write of the bits selected by `mask`.
    fn modify_u32(&mut self, addr: usize, mask: u32, value: u32) {
        let current = self.read_u32(addr);
        self.write_u32(addr, (current & !mask) | (value & mask));
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read_u32(&self, addr: usize) -> u32 {
        (**self).read_u32(addr)
    }

    fn write_u32(&mut self, addr: usize, value: u32) {
        (**self).write_u32(addr, value)
    }

    fn modify_u32(&mut self, addr: usize, mask: u32, value: u32) {
        (**self).modify_u32(addr, mask, value)
    }
}

/// Physical register access through volatile pointer operations.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Every address later passed to [`RegisterBus`] must be a mapped,
    /// 4-byte aligned device register. Nothing checks this. A wrong base
    /// address writes to whatever the SoC decodes there, which is undefined
    /// physical behaviour rather than a recoverable error.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline(always)]
    fn read_u32(&self, addr: usize) -> u32 {
        // SAFETY: upheld by the caller of `Mmio::new`.
        unsafe { read_volatile(addr as *const u32) }
    }

    #[inline(always)]
    fn write_u32(&mut self, addr: usize, value: u32) {
        // SAFETY: upheld by the caller of `Mmio::new`.
        unsafe { write_volatile(addr as *mut u32, value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Word(u32);

    impl RegisterBus for Word {
        fn read_u32(&self, _addr: usize) -> u32 {
            self.0
        }

        fn write_u32(&mut self, _addr: usize, value: u32) {
            self.0 = value;
        }
    }

    #[test]
    fn test_modify_preserves_unmasked_bits() {
        let mut word = Word(0xFFFF_0000);
        word.modify_u32(0, 0x0000_FF00, 0x1234_5678);
        assert_eq!(word.0, 0xFFFF_5600);
    }

    fn store<B: RegisterBus>(mut bus: B, value: u32) -> u32 {
        bus.write_u32(0, value);
        bus.read_u32(0)
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut word = Word(0);
        assert_eq!(store(&mut word, 7), 7);
        assert_eq!(word.0, 7);
    }

    #[test]
    fn test_mmio_on_local_word() {
        let mut cell: u32 = 0xAAAA_0000;
        let addr = &mut cell as *mut u32 as usize;
        // SAFETY: `addr` points at a live, aligned local.
        let mut mmio = unsafe { Mmio::new() };
        mmio.modify_u32(addr, 0x0000_0007, 0x0000_0001);
        assert_eq!(mmio.read_u32(addr), 0xAAAA_0001);
    }
}
