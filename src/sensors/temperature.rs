//! LM35 analog temperature sensor.
//!
//! Linear 10 mV/°C output read on ADC1.  Conversion rounds to the
//! nearest whole degree:
//!
//! ```text
//!   mV = raw × vref_mv / adc_max
//!   °C = mV / mv_per_c + offset_c
//! ```
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the temperature channel via the oneshot API
//! (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use log::warn;

use crate::config::SensorConfig;
use crate::error::SensorError;
use crate::fsm::context::TemperatureReading;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// Simulated ADC failure marker for [`sim_set_temp_adc`].
#[cfg(not(target_os = "espidf"))]
const SIM_ADC_FAILED: u16 = u16::MAX;

/// Seeded at roughly 24 °C on the default calibration.
#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(74);

/// Inject the next raw sample; `None` simulates a failed conversion.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: Option<u16>) {
    SIM_TEMP_ADC.store(raw.unwrap_or(SIM_ADC_FAILED), Ordering::Relaxed);
}

pub struct TemperatureSensor {
    calibration: SensorConfig,
    adc_channel: u32,
    consecutive_failures: u32,
}

impl TemperatureSensor {
    pub fn new(adc_channel: u32, calibration: SensorConfig) -> Self {
        Self {
            calibration,
            adc_channel,
            consecutive_failures: 0,
        }
    }

    /// One sample in whole degrees.
    pub fn read(&mut self) -> Result<TemperatureReading, SensorError> {
        let result = self
            .read_adc()
            .ok_or(SensorError::AdcReadFailed)
            .and_then(|raw| self.raw_to_celsius(raw))
            .map(TemperatureReading);

        match result {
            Ok(_) => self.consecutive_failures = 0,
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures == 1 {
                    warn!("LM35: {}", e);
                }
            }
        }
        result
    }

    /// Like [`read`](Self::read), but folds any failure into the fault
    /// sentinel so the control loop sees it as a sensor fault.
    pub fn read_or_fault(&mut self) -> TemperatureReading {
        self.read().unwrap_or(TemperatureReading::FAULT)
    }

    pub fn raw_to_celsius(&self, raw: u16) -> Result<i16, SensorError> {
        let c = &self.calibration;
        if raw > c.adc_max {
            return Err(SensorError::OutOfRange);
        }
        let adc_max = u32::from(c.adc_max);
        let mv = (u32::from(raw) * c.vref_mv + adc_max / 2) / adc_max;
        let whole = (mv + c.mv_per_c / 2) / c.mv_per_c;
        let celsius = i32::try_from(whole).map_err(|_| SensorError::OutOfRange)? + i32::from(c.offset_c);
        i16::try_from(celsius).map_err(|_| SensorError::OutOfRange)
    }

    pub fn adc_channel(&self) -> u32 {
        self.adc_channel
    }

    /// Reads since the last good sample that failed.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Option<u16> {
        hw_init::adc1_read(self.adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Option<u16> {
        match SIM_TEMP_ADC.load(Ordering::Relaxed) {
            SIM_ADC_FAILED => None,
            raw => Some(raw),
        }
    }
}
