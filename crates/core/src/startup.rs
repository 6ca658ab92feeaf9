// BCM GPIO - Bare-metal GPIO control and simulation
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::bus::RegisterBus;
use crate::gpio::Gpio;
use crate::pin::{Function, Level, Pin};

/// The LED on the reference board.
pub const LED_PIN: Pin = Pin::checked(17);

/// Boot-time pin setup: LED pin as output, driven high.
pub const STARTUP: [PinAction; 1] = [PinAction::output_high(LED_PIN)];

/// One pin's boot-time configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinAction {
    pub pin: Pin,
    pub function: Function,
    pub level: Option<Level>,
}

impl PinAction {
    pub const fn new(pin: Pin, function: Function, level: Option<Level>) -> Self {
        Self {
            pin,
            function,
            level,
        }
    }

    pub const fn output_high(pin: Pin) -> Self {
        Self::new(pin, Function::Output, Some(Level::High))
    }
}

/// Runs `actions` in order. For each pin the function is selected before any
/// level is driven.
pub fn apply<B: RegisterBus>(gpio: &mut Gpio<B>, actions: &[PinAction]) {
    for action in actions {
        gpio.set_function(action.pin, action.function);
        if let Some(level) = action.level {
            gpio.set_level(action.pin, level);
        }
    }
}

/// Parks the core for good once startup is done.
///
/// There is no caller to return to on bare metal. The firmware's only task
/// ends here on purpose.
pub fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::GpioLayout;

    struct Log {
        words: [u32; 64],
        writes: [(usize, u32); 8],
        count: usize,
    }

    impl RegisterBus for Log {
        fn read_u32(&self, addr: usize) -> u32 {
            self.words[addr / 4]
        }

        fn write_u32(&mut self, addr: usize, value: u32) {
            self.words[addr / 4] = value;
            self.writes[self.count] = (addr, value);
            self.count += 1;
        }
    }

    impl Default for Log {
        fn default() -> Self {
            Self {
                words: [0; 64],
                writes: [(0, 0); 8],
                count: 0,
            }
        }
    }

    #[test]
    fn test_startup_writes_fsel_then_set() {
        let mut gpio = Gpio::new(Log::default(), GpioLayout::at(0));
        apply(&mut gpio, &STARTUP);
        let log = gpio.into_inner();
        assert_eq!(log.count, 2);
        assert_eq!(log.writes[0], (0x04, 1 << 21));
        assert_eq!(log.writes[1], (0x1C, 1 << 17));
    }

    #[test]
    fn test_action_without_level_only_selects() {
        let mut gpio = Gpio::new(Log::default(), GpioLayout::at(0));
        apply(
            &mut gpio,
            &[PinAction::new(Pin::checked(3), Function::Alt0, None)],
        );
        assert_eq!(gpio.bus().count, 1);
        assert_eq!(gpio.function(Pin::checked(3)), Function::Alt0);
    }
}
