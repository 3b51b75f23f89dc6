//! Five-button analog keypad (resistor ladder on one ADC channel).
//!
//! Each button pulls the ladder to a different voltage.  Thresholds are
//! ascending; a sample below `right_max` is Right, below `up_max` is Up,
//! and so on up to `select_max`.  Anything at or above `select_max` means
//! no button is held.
//!
//! ## Debounce
//!
//! | Sample stream            | Emitted                      |
//! |--------------------------|------------------------------|
//! | None                     | None (re-arms)               |
//! | K for N consecutive      | K once, on the N-th sample   |
//! | K held after emission    | None until release           |
//! | K then K' while held     | None until release           |
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the keypad channel via the oneshot API.
//! On host/test: reads from a static AtomicU16 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use log::debug;

use crate::config::KeypadConfig;
use crate::fsm::context::KeyEvent;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// Released ladder reads full scale.
#[cfg(not(target_os = "espidf"))]
static SIM_KEYPAD_ADC: AtomicU16 = AtomicU16::new(1023);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_keypad_adc(raw: u16) {
    SIM_KEYPAD_ADC.store(raw, Ordering::Relaxed);
}

// ───────────────────────────────────────────────────────────────
// Decoder (pure)
// ───────────────────────────────────────────────────────────────

/// Turns a stream of raw samples into at most one event per press.
#[derive(Debug, Clone)]
pub struct KeypadDecoder {
    thresholds: KeypadConfig,
    candidate: KeyEvent,
    run: u8,
    /// A press has been reported and the key has not been released since.
    latched: bool,
}

impl KeypadDecoder {
    pub fn new(thresholds: KeypadConfig) -> Self {
        Self {
            thresholds,
            candidate: KeyEvent::None,
            run: 0,
            latched: false,
        }
    }

    /// Map one raw sample to the key it represents, without debounce.
    pub fn classify(&self, raw: u16) -> KeyEvent {
        let t = &self.thresholds;
        if raw < t.right_max {
            KeyEvent::Right
        } else if raw < t.up_max {
            KeyEvent::Up
        } else if raw < t.down_max {
            KeyEvent::Down
        } else if raw < t.left_max {
            KeyEvent::Left
        } else if raw < t.select_max {
            KeyEvent::Select
        } else {
            KeyEvent::None
        }
    }

    /// Feed one sample; returns the debounced event for this sample.
    pub fn feed(&mut self, raw: u16) -> KeyEvent {
        let key = self.classify(raw);

        if key == KeyEvent::None {
            self.candidate = KeyEvent::None;
            self.run = 0;
            self.latched = false;
            return KeyEvent::None;
        }

        if key == self.candidate {
            self.run = self.run.saturating_add(1);
        } else {
            self.candidate = key;
            self.run = 1;
        }

        if !self.latched && self.run >= self.thresholds.debounce_samples {
            self.latched = true;
            debug!("keypad: {:?} (raw {})", key, raw);
            return key;
        }

        KeyEvent::None
    }
}

// ───────────────────────────────────────────────────────────────
// ADC-backed keypad
// ───────────────────────────────────────────────────────────────

pub struct Keypad {
    decoder: KeypadDecoder,
    adc_channel: u32,
}

impl Keypad {
    pub fn new(adc_channel: u32, thresholds: KeypadConfig) -> Self {
        Self {
            decoder: KeypadDecoder::new(thresholds),
            adc_channel,
        }
    }

    /// Sample the ladder once.  A failed conversion reads as released.
    pub fn poll(&mut self) -> KeyEvent {
        match self.read_adc() {
            Some(raw) => self.decoder.feed(raw),
            None => self.decoder.feed(u16::MAX),
        }
    }

    pub fn adc_channel(&self) -> u32 {
        self.adc_channel
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Option<u16> {
        hw_init::adc1_read(self.adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Option<u16> {
        Some(SIM_KEYPAD_ADC.load(Ordering::Relaxed))
    }
}
