//! ThermoGuard firmware entry point
//!
//! Hexagonal architecture around a fixed-period control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter                         LogEventSink          │
//! │  (Sensor+Input+Actuator+Display)         (EventSink)           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  ControlLoop · FSM · Safety · Display                  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::{Duration, Instant};

use anyhow::Result;
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyOutputPin, PinDriver};
use log::{info, warn};

use thermoguard::adapters::{HardwareAdapter, LogEventSink};
use thermoguard::app::service::AppService;
use thermoguard::config::SystemConfig;
use thermoguard::drivers::hw_init;
use thermoguard::drivers::lcd::{Lcd, LcdPins};
use thermoguard::drivers::watchdog::Watchdog;
use thermoguard::pins;
use thermoguard::sensors::{Keypad, TemperatureSensor};

/// Deployment configuration baked into the image.
const DEPLOYMENT_CONFIG: &str = include_str!("../thermoguard.json");

fn load_config() -> SystemConfig {
    match SystemConfig::from_json(DEPLOYMENT_CONFIG) {
        Ok(cfg) => {
            info!("Config loaded from thermoguard.json");
            cfg
        }
        Err(e) => {
            warn!("Deployment config rejected ({}), using defaults", e);
            SystemConfig::default()
        }
    }
}

fn output_pin(gpio: i32) -> Result<PinDriver<'static, AnyOutputPin, esp_idf_hal::gpio::Output>> {
    // SAFETY: each LCD GPIO number appears once in `pins` and is not
    // claimed by hw_init, so this is the only driver for that pin.
    let pin = unsafe { AnyOutputPin::new(gpio) };
    Ok(PinDriver::output(pin)?)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ThermoGuard v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without ADC and PWM there is nothing safe to do.  The watchdog
        // is not yet armed, so halt explicitly.
        log::error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let [d4, d5, d6, d7] = pins::LCD_DATA_GPIOS;
    let lcd_pins = LcdPins {
        rs: output_pin(pins::LCD_RS_GPIO)?,
        en: output_pin(pins::LCD_E_GPIO)?,
        data: [output_pin(d4)?, output_pin(d5)?, output_pin(d6)?, output_pin(d7)?],
        backlight: output_pin(pins::LCD_BL_GPIO)?,
    };
    let mut lcd = Lcd::new(lcd_pins, Ets);
    if let Err(e) = lcd.init() {
        warn!("LCD init failed ({:?}), continuing headless", e);
    }

    let mut hw = HardwareAdapter::new(
        TemperatureSensor::new(pins::TEMP_ADC_CHANNEL, config.sensor.clone()),
        Keypad::new(pins::KEYPAD_ADC_CHANNEL, config.keypad.clone()),
        lcd,
    );
    let mut sink = LogEventSink::new();

    // ── 4. Application core ───────────────────────────────────
    let interval_ms = config.timing.control_loop_interval_ms;
    let mut app = AppService::new(config)?;
    app.start(&mut hw, &mut sink);

    let watchdog = Watchdog::for_loop_period(interval_ms);

    info!("System ready. Entering control loop ({}ms period).", interval_ms);

    // ── 5. Fixed-period control loop ──────────────────────────
    let period = Duration::from_millis(u64::from(interval_ms));
    let mut next = Instant::now() + period;
    loop {
        app.tick(&mut hw, &mut sink);
        watchdog.feed();

        let now = Instant::now();
        if next > now {
            std::thread::sleep(next - now);
            next += period;
        } else {
            warn!(
                "Control tick {} overran its period by {}ms",
                app.tick_count(),
                (now - next).as_millis()
            );
            next = now + period;
        }
    }
}
