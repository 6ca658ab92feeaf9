#![no_std]
// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.
#![no_main]

use bcm_gpio_core::layout::GpioLayout;
use bcm_gpio_core::startup::{self, STARTUP};
use bcm_gpio_core::{Gpio, Mmio};
use panic_halt as _;

// Entered from an external boot stub that has already set up the stack.
#[no_mangle]
pub extern "C" fn main() -> ! {
    // SAFETY: BCM2837 GPIO registers are identity-mapped at this base and
    // nothing else drives them.
    let mmio = unsafe { Mmio::new() };
    let mut gpio = Gpio::new(mmio, GpioLayout::BCM2837);

    startup::apply(&mut gpio, &STARTUP);

    startup::halt()
}
