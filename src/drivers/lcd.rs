//! HD44780 16x2 character LCD driver, 4-bit bus.
//!
//! Generic over `embedded-hal` 1.0 [`OutputPin`] and [`DelayNs`], so the
//! same code drives `esp-idf-hal` pin drivers on the board and recording
//! mocks on the host.
//!
//! ```text
//!   RS ──┐   E ──┐   D4..D7 ──┐   BL ──┐
//!        ▼       ▼            ▼        ▼
//!   ┌─────────────────────────────────────┐
//!   │ HD44780  (write-only, R/W tied low) │
//!   └─────────────────────────────────────┘
//! ```
//!
//! Every byte goes out as two nibbles, high first, each latched on the
//! falling edge of E.  [`Lcd::render`] remembers the last frame and skips
//! the bus entirely when nothing changed.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::control::DisplayCommand;
use crate::control::display::{LCD_COLS, LCD_ROWS};

// ── Instruction set ───────────────────────────────────────────

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of the first column of each row.
const ROW_OFFSETS: [u8; LCD_ROWS] = [0x00, 0x40];

/// Bus pins for one display.
pub struct LcdPins<P> {
    pub rs: P,
    pub en: P,
    /// D4, D5, D6, D7.
    pub data: [P; 4],
    pub backlight: P,
}

pub struct Lcd<P, D> {
    pins: LcdPins<P>,
    delay: D,
    last_frame: Option<DisplayCommand>,
}

impl<P, D> Lcd<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(pins: LcdPins<P>, delay: D) -> Self {
        Self {
            pins,
            delay,
            last_frame: None,
        }
    }

    /// Power-on initialisation by instruction (datasheet figure 24).
    pub fn init(&mut self) -> Result<(), P::Error> {
        self.pins.rs.set_low()?;
        self.pins.en.set_low()?;
        self.delay.delay_ms(50);

        // Three 8-bit function sets force a known interface width,
        // then drop to 4-bit.
        self.write_nibble(0x03)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03)?;
        self.delay.delay_us(150);
        self.write_nibble(0x03)?;
        self.write_nibble(0x02)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_ENTRY_MODE_INC)?;
        self.clear()?;
        self.set_backlight(true)?;
        self.last_frame = None;
        log::info!("LCD: initialised (4-bit, {}x{})", LCD_COLS, LCD_ROWS);
        Ok(())
    }

    /// Show a frame.  Identical consecutive frames cost nothing.
    pub fn render(&mut self, frame: &DisplayCommand) -> Result<(), P::Error> {
        if self.last_frame.as_ref() == Some(frame) {
            return Ok(());
        }

        self.set_backlight(frame.backlight)?;
        for (row, line) in frame.lines.iter().enumerate() {
            self.set_cursor(row as u8, 0)?;
            // Pad instead of clearing so the panel does not flicker.
            let text = line.as_bytes();
            for col in 0..LCD_COLS {
                self.data(text.get(col).copied().unwrap_or(b' '))?;
            }
        }

        self.last_frame = Some(frame.clone());
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), P::Error> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        self.last_frame = None;
        Ok(())
    }

    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), P::Error> {
        let base = ROW_OFFSETS[usize::from(row).min(LCD_ROWS - 1)];
        self.command(CMD_SET_DDRAM | (base + col.min(LCD_COLS as u8 - 1)))
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), P::Error> {
        for b in s.bytes() {
            self.data(b)?;
        }
        Ok(())
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), P::Error> {
        self.pins.backlight.set_state(PinState::from(on))
    }

    pub fn command(&mut self, cmd: u8) -> Result<(), P::Error> {
        self.pins.rs.set_low()?;
        self.write_byte(cmd)
    }

    pub fn data(&mut self, byte: u8) -> Result<(), P::Error> {
        self.pins.rs.set_high()?;
        self.write_byte(byte)
    }

    /// Release the pins and delay provider.
    pub fn release(self) -> (LcdPins<P>, D) {
        (self.pins, self.delay)
    }

    // ── Internal ──────────────────────────────────────────────

    fn write_byte(&mut self, byte: u8) -> Result<(), P::Error> {
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)?;
        // Longest non-clear instruction is 37 µs.
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), P::Error> {
        for (bit, pin) in self.pins.data.iter_mut().enumerate() {
            pin.set_state(PinState::from(nibble & (1 << bit) != 0))?;
        }
        self.pins.en.set_high()?;
        self.delay.delay_us(1);
        self.pins.en.set_low()?;
        self.delay.delay_us(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::cell::RefCell;
    use std::rc::Rc;

    const RS: usize = 0;
    const EN: usize = 1;
    const BL: usize = 6;

    /// Shared bus trace: current pin levels plus every latched nibble.
    #[derive(Default)]
    struct Bus {
        levels: [bool; 7],
        latched: Vec<(bool, u8)>,
    }

    struct MockPin {
        id: usize,
        bus: Rc<RefCell<Bus>>,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            let mut bus = self.bus.borrow_mut();
            if self.id == EN && bus.levels[EN] {
                let nibble = (0..4).fold(0u8, |acc, b| acc | (u8::from(bus.levels[2 + b]) << b));
                let rs = bus.levels[RS];
                bus.latched.push((rs, nibble));
            }
            bus.levels[self.id] = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.bus.borrow_mut().levels[self.id] = true;
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn lcd() -> (Lcd<MockPin, NoDelay>, Rc<RefCell<Bus>>) {
        let bus = Rc::new(RefCell::new(Bus::default()));
        let pin = |id| MockPin { id, bus: Rc::clone(&bus) };
        let pins = LcdPins {
            rs: pin(RS),
            en: pin(EN),
            data: [pin(2), pin(3), pin(4), pin(5)],
            backlight: pin(BL),
        };
        (Lcd::new(pins, NoDelay), bus)
    }

    /// Pair latched nibbles into (rs, byte).
    fn bytes(latched: &[(bool, u8)]) -> Vec<(bool, u8)> {
        latched
            .chunks_exact(2)
            .map(|p| (p[0].0, (p[0].1 << 4) | p[1].1))
            .collect()
    }

    fn frame(top: &str, bottom: &str, backlight: bool) -> DisplayCommand {
        let mut lines: [heapless::String<LCD_COLS>; LCD_ROWS] = Default::default();
        lines[0].push_str(top).unwrap();
        lines[1].push_str(bottom).unwrap();
        DisplayCommand { lines, backlight }
    }

    #[test]
    fn init_switches_to_four_bit_and_clears() {
        let (mut lcd, bus) = lcd();
        lcd.init().unwrap();
        let bus = bus.borrow();
        let wake: Vec<u8> = bus.latched[..4].iter().map(|&(_, n)| n).collect();
        assert_eq!(wake, vec![0x03, 0x03, 0x03, 0x02]);
        let cmds = bytes(&bus.latched[4..]);
        assert_eq!(
            cmds,
            vec![
                (false, CMD_FUNCTION_4BIT_2LINE),
                (false, CMD_DISPLAY_ON),
                (false, CMD_ENTRY_MODE_INC),
                (false, CMD_CLEAR),
            ]
        );
        assert!(bus.levels[BL]);
    }

    #[test]
    fn render_writes_padded_rows() {
        let (mut lcd, bus) = lcd();
        lcd.render(&frame("COOL  SET:24C", "TMP:27C FAN:ON", true)).unwrap();
        let written = bytes(&bus.borrow().latched);
        assert_eq!(written.len(), 2 * (1 + LCD_COLS));
        assert_eq!(written[0], (false, CMD_SET_DDRAM));
        let row0: Vec<u8> = written[1..=LCD_COLS].iter().map(|&(_, b)| b).collect();
        assert_eq!(&row0, b"COOL  SET:24C   ");
        assert_eq!(written[LCD_COLS + 1], (false, CMD_SET_DDRAM | 0x40));
    }

    #[test]
    fn identical_frame_is_skipped() {
        let (mut lcd, bus) = lcd();
        let f = frame("ECO   SET:24C", "TMP:24C FAN:OFF", false);
        lcd.render(&f).unwrap();
        let after_first = bus.borrow().latched.len();
        lcd.render(&f).unwrap();
        assert_eq!(bus.borrow().latched.len(), after_first);
        assert!(!bus.borrow().levels[BL]);
    }

    #[test]
    fn cursor_is_clamped_to_panel() {
        let (mut lcd, bus) = lcd();
        lcd.set_cursor(5, 40).unwrap();
        let written = bytes(&bus.borrow().latched);
        assert_eq!(written, vec![(false, CMD_SET_DDRAM | 0x40 | 15)]);
    }
}
