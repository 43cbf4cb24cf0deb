//! LED banks for modules and the host
//!
//! Patterns are steady levels, so a redraw is only needed when the
//! controller hands over a new pattern.
//!
//! Module LEDs:
//!
//! | Pattern        | White | Red | Indicator | Board |
//! |----------------|-------|-----|-----------|-------|
//! | `Off`          |       |     |           |       |
//! | `Connecting`   |       |     |           | on    |
//! | `Ready`        |       |     | on        | on    |
//! | `Pending(c)`   | c     | c   | on        | on    |
//! | `SendFailed`   | on    | on  | on        | on    |
//! | `LinkDown`     | on    | on  |           |       |
//!
//! Host lamps: `Showing` lights the chosen seat's lamp, the blue lamp means
//! the fleet is usable and the board LED means bring-up has finished.

use embedded_hal::digital::{OutputPin, PinState};
use judgelight_core::host::HostPattern;
use judgelight_core::module::ModulePattern;
use judgelight_core::traits::Indicator;
use judgelight_protocol::{ButtonColor, ModuleId, NUM_MODULES};

fn drive<P: OutputPin>(pin: &mut P, on: bool) -> bool {
    pin.set_state(PinState::from(on)).is_ok()
}

/// Levels of the module LEDs for one pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleLevels {
    pub white: bool,
    pub red: bool,
    pub indicator: bool,
    pub board: bool,
}

impl ModuleLevels {
    pub fn for_pattern(pattern: ModulePattern) -> Self {
        let (white, red, indicator, board) = match pattern {
            ModulePattern::Off => (false, false, false, false),
            ModulePattern::Connecting => (false, false, false, true),
            ModulePattern::Ready => (false, false, true, true),
            ModulePattern::Pending(ButtonColor::White) => (true, false, true, true),
            ModulePattern::Pending(ButtonColor::Red) => (false, true, true, true),
            ModulePattern::SendFailed => (true, true, true, true),
            ModulePattern::LinkDown => (true, true, false, false),
        };
        Self {
            white,
            red,
            indicator,
            board,
        }
    }
}

/// LEDs of a judge module, all active-high
pub struct ModuleLeds<P> {
    white: P,
    red: P,
    indicator: P,
    board: P,
    /// A pin write failed since the last check
    fault: bool,
}

impl<P: OutputPin> ModuleLeds<P> {
    /// Create the bank with every LED off
    pub fn new(white: P, red: P, indicator: P, board: P) -> Self {
        let mut leds = Self {
            white,
            red,
            indicator,
            board,
            fault: false,
        };
        leds.set_indicator(ModulePattern::Off);
        leds
    }

    /// Report and reset the write-failure flag
    pub fn take_fault(&mut self) -> bool {
        core::mem::take(&mut self.fault)
    }
}

impl<P: OutputPin> Indicator<ModulePattern> for ModuleLeds<P> {
    fn set_indicator(&mut self, pattern: ModulePattern) {
        let levels = ModuleLevels::for_pattern(pattern);
        let ok = drive(&mut self.white, levels.white)
            & drive(&mut self.red, levels.red)
            & drive(&mut self.indicator, levels.indicator)
            & drive(&mut self.board, levels.board);
        self.fault |= !ok;
    }
}

/// White and red lamps for one seat
pub struct SeatLamps<P> {
    pub white: P,
    pub red: P,
}

/// Host lamp bank, all active-high
pub struct HostLamps<P> {
    /// Indexed by `ModuleId::index()`
    seats: [SeatLamps<P>; NUM_MODULES],
    blue: P,
    board: P,
    fault: bool,
}

impl<P: OutputPin> HostLamps<P> {
    /// Create the bank with every lamp off
    pub fn new(seats: [SeatLamps<P>; NUM_MODULES], blue: P, board: P) -> Self {
        let mut lamps = Self {
            seats,
            blue,
            board,
            fault: false,
        };
        lamps.set_indicator(HostPattern::Off);
        lamps
    }

    pub fn take_fault(&mut self) -> bool {
        core::mem::take(&mut self.fault)
    }
}

impl<P: OutputPin> Indicator<HostPattern> for HostLamps<P> {
    fn set_indicator(&mut self, pattern: HostPattern) {
        let lit = match pattern {
            HostPattern::Showing { module, color } => Some((module, color)),
            _ => None,
        };
        let (blue, board) = match pattern {
            HostPattern::Off => (false, false),
            HostPattern::BringUp => (true, false),
            HostPattern::Idle { degraded } => (!degraded, true),
            HostPattern::Showing { .. } => (true, true),
        };

        let mut ok = true;
        for (module, seat) in ModuleId::ALL.into_iter().zip(self.seats.iter_mut()) {
            ok &= drive(&mut seat.white, lit == Some((module, ButtonColor::White)));
            ok &= drive(&mut seat.red, lit == Some((module, ButtonColor::Red)));
        }
        ok &= drive(&mut self.blue, blue);
        ok &= drive(&mut self.board, board);
        self.fault |= !ok;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin for testing
    #[derive(Default)]
    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }
    }

    /// Pin whose writes always fail
    struct BrokenPin;

    #[derive(Debug)]
    struct Broken;

    impl embedded_hal::digital::Error for Broken {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl ErrorType for BrokenPin {
        type Error = Broken;
    }

    impl OutputPin for BrokenPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(Broken)
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(Broken)
        }
    }

    fn module_leds() -> ModuleLeds<MockPin> {
        ModuleLeds::new(
            MockPin { high: true },
            MockPin { high: true },
            MockPin { high: true },
            MockPin { high: true },
        )
    }

    fn levels(leds: &ModuleLeds<MockPin>) -> (bool, bool, bool, bool) {
        (
            leds.white.high,
            leds.red.high,
            leds.indicator.high,
            leds.board.high,
        )
    }

    #[test]
    fn test_module_leds_start_off() {
        let leds = module_leds();
        assert_eq!(levels(&leds), (false, false, false, false));
    }

    #[test]
    fn test_module_pending_lights_pressed_color() {
        let mut leds = module_leds();
        leds.set_indicator(ModulePattern::Pending(ButtonColor::Red));
        assert_eq!(levels(&leds), (false, true, true, true));

        leds.set_indicator(ModulePattern::Ready);
        assert_eq!(levels(&leds), (false, false, true, true));
    }

    #[test]
    fn test_module_failure_patterns_differ() {
        assert_ne!(
            ModuleLevels::for_pattern(ModulePattern::SendFailed),
            ModuleLevels::for_pattern(ModulePattern::LinkDown)
        );
        assert_ne!(
            ModuleLevels::for_pattern(ModulePattern::Connecting),
            ModuleLevels::for_pattern(ModulePattern::Off)
        );
    }

    #[test]
    fn test_write_failure_sets_fault() {
        let mut leds = ModuleLeds::new(BrokenPin, BrokenPin, BrokenPin, BrokenPin);
        assert!(leds.take_fault());
        assert!(!leds.take_fault());
    }

    fn host_lamps() -> HostLamps<MockPin> {
        let seat = || SeatLamps {
            white: MockPin::default(),
            red: MockPin::default(),
        };
        HostLamps::new([seat(), seat(), seat()], MockPin::default(), MockPin::default())
    }

    fn lit_count(lamps: &HostLamps<MockPin>) -> usize {
        lamps
            .seats
            .iter()
            .map(|s| s.white.high as usize + s.red.high as usize)
            .sum()
    }

    #[test]
    fn test_host_shows_one_seat() {
        let mut lamps = host_lamps();
        lamps.set_indicator(HostPattern::Showing {
            module: ModuleId::Right,
            color: ButtonColor::Red,
        });

        assert_eq!(lit_count(&lamps), 1);
        assert!(lamps.seats[ModuleId::Right.index()].red.high);
        assert!(lamps.blue.high);

        lamps.set_indicator(HostPattern::Showing {
            module: ModuleId::Left,
            color: ButtonColor::White,
        });
        assert_eq!(lit_count(&lamps), 1);
        assert!(lamps.seats[ModuleId::Left.index()].white.high);
    }

    #[test]
    fn test_host_idle_marks_degraded() {
        let mut lamps = host_lamps();
        lamps.set_indicator(HostPattern::Idle { degraded: false });
        assert!(lamps.blue.high);
        assert!(lamps.board.high);

        lamps.set_indicator(HostPattern::Idle { degraded: true });
        assert!(!lamps.blue.high);
        assert!(lamps.board.high);
        assert_eq!(lit_count(&lamps), 0);
    }

    #[test]
    fn test_host_bring_up() {
        let mut lamps = host_lamps();
        lamps.set_indicator(HostPattern::BringUp);
        assert!(lamps.blue.high);
        assert!(!lamps.board.high);
        assert!(!lamps.take_fault());
    }
}
