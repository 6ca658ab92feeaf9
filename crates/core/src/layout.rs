// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::pin::Pin;

/// Offset of the GPIO block from the SoC peripheral base.
pub const GPIO_OFFSET: usize = 0x20_0000;

/// Size of the GPIO register block in bytes.
pub const GPIO_BLOCK_SIZE: usize = 0xB4;

pub const GPFSEL0: usize = 0x00;
pub const GPSET0: usize = 0x1C;
pub const GPCLR0: usize = 0x28;
pub const GPLEV0: usize = 0x34;

/// Where the GPIO registers live.
///
/// Passed by value into [`crate::Gpio::new`]. Nothing here is global, so a
/// test can point the accessor at simulated memory at any base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioLayout {
    pub base: usize,
    pub fsel: usize,
    pub set: usize,
    pub clr: usize,
    pub lev: usize,
}

impl GpioLayout {
    /// Raspberry Pi 1 / Zero.
    pub const BCM2835: GpioLayout = GpioLayout::at(0x2000_0000 + GPIO_OFFSET);
    /// Raspberry Pi 2.
    pub const BCM2836: GpioLayout = GpioLayout::at(0x3F00_0000 + GPIO_OFFSET);
    /// Raspberry Pi 3 / 3B+.
    pub const BCM2837: GpioLayout = GpioLayout::at(0x3F00_0000 + GPIO_OFFSET);
    /// Raspberry Pi 4, low-peripheral mode.
    pub const BCM2711: GpioLayout = GpioLayout::at(0xFE00_0000 + GPIO_OFFSET);

    /// Standard register offsets relative to a GPIO block at `base`.
    pub const fn at(base: usize) -> Self {
        Self {
            base,
            fsel: GPFSEL0,
            set: GPSET0,
            clr: GPCLR0,
            lev: GPLEV0,
        }
    }

    /// Like [`GpioLayout::at`], but `None` when the block would run past
    /// the end of the address space.
    pub const fn try_at(base: usize) -> Option<Self> {
        match base.checked_add(GPIO_BLOCK_SIZE) {
            Some(_) => Some(Self::at(base)),
            None => None,
        }
    }

    pub const fn fsel_addr(&self, pin: Pin) -> usize {
        self.base + self.fsel + pin.fsel_index() * 4
    }

    pub const fn set_addr(&self, pin: Pin) -> usize {
        self.base + self.set + pin.bank() * 4
    }

    pub const fn clr_addr(&self, pin: Pin) -> usize {
        self.base + self.clr + pin.bank() * 4
    }

    pub const fn lev_addr(&self, pin: Pin) -> usize {
        self.base + self.lev + pin.bank() * 4
    }

    /// One past the last byte of the block, saturating at the top of memory.
    pub const fn end(&self) -> usize {
        self.base.saturating_add(GPIO_BLOCK_SIZE)
    }

    pub const fn locate(&self, pin: Pin) -> PinLocation {
        PinLocation {
            pin,
            fsel_addr: self.fsel_addr(pin),
            fsel_shift: pin.fsel_shift(),
            set_addr: self.set_addr(pin),
            clr_addr: self.clr_addr(pin),
            lev_addr: self.lev_addr(pin),
            bank_bit: pin.bank_bit(),
        }
    }
}

/// Every register and bit position that belongs to one pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinLocation {
    pub pin: Pin,
    pub fsel_addr: usize,
    pub fsel_shift: u32,
    pub set_addr: usize,
    pub clr_addr: usize,
    pub lev_addr: usize,
    pub bank_bit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpi3_addresses_for_pin_17() {
        let loc = GpioLayout::BCM2837.locate(Pin::checked(17));
        assert_eq!(loc.fsel_addr, 0x3F20_0004);
        assert_eq!(loc.fsel_shift, 21);
        assert_eq!(loc.set_addr, 0x3F20_001C);
        assert_eq!(loc.clr_addr, 0x3F20_0028);
        assert_eq!(loc.lev_addr, 0x3F20_0034);
        assert_eq!(loc.bank_bit, 17);
    }

    #[test]
    fn test_high_bank_addresses() {
        let layout = GpioLayout::at(0x1000);
        let pin = Pin::checked(40);
        assert_eq!(layout.fsel_addr(pin), 0x1010);
        assert_eq!(layout.set_addr(pin), 0x1020);
        assert_eq!(layout.clr_addr(pin), 0x102C);
        assert_eq!(layout.lev_addr(pin), 0x1038);
    }

    #[test]
    fn test_try_at_rejects_block_past_address_space() {
        assert_eq!(GpioLayout::try_at(0x3F20_0000), Some(GpioLayout::BCM2837));
        assert_eq!(GpioLayout::try_at(usize::MAX - GPIO_BLOCK_SIZE + 1), None);
        assert!(GpioLayout::try_at(usize::MAX - GPIO_BLOCK_SIZE).is_some());
        assert_eq!(GpioLayout::at(usize::MAX - 4).end(), usize::MAX);
    }

    #[test]
    fn test_all_registers_inside_block() {
        for layout in [GpioLayout::BCM2835, GpioLayout::BCM2837, GpioLayout::BCM2711] {
            for pin in Pin::all() {
                let loc = layout.locate(pin);
                for addr in [loc.fsel_addr, loc.set_addr, loc.clr_addr, loc.lev_addr] {
                    assert!(addr >= layout.base && addr + 4 <= layout.end());
                }
            }
        }
    }
}
