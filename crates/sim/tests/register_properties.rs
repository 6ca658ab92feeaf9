// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use bcm_gpio_core::layout::{GpioLayout, GPCLR0, GPFSEL0, GPLEV0, GPSET0};
use bcm_gpio_core::startup::{self, LED_PIN, STARTUP};
use bcm_gpio_core::{Function, Gpio, Level, Pin};
use bcm_gpio_sim::{Access, AccessKind, GpioBlock, RegisterFile};

const BASE: usize = 0x3F20_0000;

fn layout() -> GpioLayout {
    GpioLayout::at(BASE)
}

/// Register memory pre-filled with a recognisable pattern.
fn patterned() -> RegisterFile {
    let mut regs = RegisterFile::for_layout(&layout());
    for (i, offset) in (0..regs.words().len() * 4).step_by(4).enumerate() {
        regs.set_offset_word(offset, 0xA5A5_0000 ^ (i as u32).wrapping_mul(0x0101_0101));
    }
    regs
}

#[test]
fn test_set_function_touches_only_target_field() {
    for pin in Pin::all() {
        for function in Function::ALL {
            let mut regs = patterned();
            let before = regs.words().to_vec();

            Gpio::new(&mut regs, layout()).set_function(pin, function);

            let index = pin.fsel_index();
            let field = 0b111u32 << pin.fsel_shift();
            for (i, (&old, &new)) in before.iter().zip(regs.words()).enumerate() {
                if i == index {
                    assert_eq!(new & !field, old & !field, "{pin} {function}: outside field");
                    assert_eq!(
                        (new & field) >> pin.fsel_shift(),
                        function.bits(),
                        "{pin} {function}: field value"
                    );
                } else {
                    assert_eq!(new, old, "{pin} {function}: word {i} changed");
                }
            }
        }
    }
}

#[test]
fn test_set_output_high_sets_only_bit_17() {
    let mut regs = RegisterFile::for_layout(&layout());
    Gpio::new(&mut regs, layout()).set_output_high(Pin::checked(17));

    assert_eq!(regs.offset_word(GPSET0), 1 << 17);
    assert_eq!(regs.offset_word(GPSET0 + 4), 0);
    let others = regs
        .words()
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != GPSET0 / 4)
        .all(|(_, &w)| w == 0);
    assert!(others);
}

#[test]
fn test_set_output_high_is_idempotent() {
    let mut once = RegisterFile::for_layout(&layout());
    Gpio::new(&mut once, layout()).set_output_high(LED_PIN);

    let mut twice = RegisterFile::for_layout(&layout());
    {
        let mut gpio = Gpio::new(&mut twice, layout());
        gpio.set_output_high(LED_PIN);
        gpio.set_output_high(LED_PIN);
    }

    assert_eq!(once.words(), twice.words());

    let mut block = GpioBlock::new(layout());
    {
        let mut gpio = Gpio::new(&mut block, layout());
        gpio.set_function(LED_PIN, Function::Output);
        gpio.set_output_high(LED_PIN);
        gpio.set_output_high(LED_PIN);
    }
    assert_eq!(block.pin_state(LED_PIN).level, Level::High);
    assert_eq!(block.gpio_snapshot().latch, 1 << 17);
}

#[test]
fn test_led_startup_end_to_end() {
    let mut regs = RegisterFile::for_layout(&layout());
    {
        let mut gpio = Gpio::new(&mut regs, layout());
        gpio.set_function(Pin::checked(17), Function::Output);
        gpio.set_output_high(Pin::checked(17));
    }

    assert_eq!(regs.offset_word(GPFSEL0 + 4), 0b001 << 21);
    assert_eq!(regs.offset_word(GPSET0), 1 << 17);
    for (i, &word) in regs.words().iter().enumerate() {
        if i != 1 && i != GPSET0 / 4 {
            assert_eq!(word, 0, "word {i} at offset {:#x}", i * 4);
        }
    }
}

#[test]
fn test_startup_sequence_access_order() {
    let mut regs = RegisterFile::for_layout(&layout());
    startup::apply(&mut Gpio::new(&mut regs, layout()), &STARTUP);

    assert_eq!(
        regs.accesses(),
        vec![
            Access {
                kind: AccessKind::Read,
                addr: BASE + 0x04,
                value: 0
            },
            Access {
                kind: AccessKind::Write,
                addr: BASE + 0x04,
                value: 1 << 21
            },
            Access {
                kind: AccessKind::Write,
                addr: BASE + GPSET0,
                value: 1 << 17
            },
        ]
    );
    assert!(regs.faults().is_empty());
}

#[test]
fn test_clear_and_level_registers() {
    let mut regs = RegisterFile::for_layout(&layout());
    regs.set_offset_word(GPLEV0 + 4, 1 << 3);
    let mut gpio = Gpio::new(&mut regs, layout());

    gpio.set_output_low(Pin::checked(33));
    assert_eq!(gpio.level(Pin::checked(35)), Level::High);
    assert_eq!(gpio.level(Pin::checked(33)), Level::Low);
    drop(gpio);

    assert_eq!(regs.offset_word(GPCLR0 + 4), 1 << 1);
    assert_eq!(regs.offset_word(GPCLR0), 0);
}

#[test]
fn test_rpi3_layout_on_simulated_block() -> anyhow::Result<()> {
    let layout = GpioLayout::BCM2837;
    let mut gpio = Gpio::new(GpioBlock::new(layout), layout);
    startup::apply(&mut gpio, &STARTUP);

    let block = gpio.into_inner();
    let state = block.pin_state(Pin::new(17)?);
    assert_eq!(state.function, Function::Output);
    assert_eq!(state.level, Level::High);
    assert!(block.faults().is_empty());
    Ok(())
}
