//! Sensor oracles consulted by the conditional instructions.
//!
//! Real deployments poll hardware; simulation uses a coin flip drawn from the
//! population's stream so runs stay reproducible.

use biolume_data::Sensor;
use rand::{Rng, RngCore};

use crate::config::{FixedReadings, SensorConfig, SensorMode};

/// Boolean environmental inputs supplied from outside the core.
pub trait SensorOracle: Send {
    fn poll(&mut self, sensor: Sensor, rng: &mut dyn RngCore) -> bool;
}

/// Fair (or biased) coin per poll.
#[derive(Debug, Clone)]
pub struct CoinFlipSensors {
    probability: f64,
}

impl CoinFlipSensors {
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }
}

impl Default for CoinFlipSensors {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl SensorOracle for CoinFlipSensors {
    fn poll(&mut self, _sensor: Sensor, rng: &mut dyn RngCore) -> bool {
        rng.gen_bool(self.probability)
    }
}

/// Constant readings, settable at runtime.
#[derive(Debug, Clone, Default)]
pub struct FixedSensors {
    readings: [bool; 4],
}

impl FixedSensors {
    #[must_use]
    pub fn all(value: bool) -> Self {
        Self {
            readings: [value; 4],
        }
    }

    pub fn set(&mut self, sensor: Sensor, value: bool) {
        self.readings[sensor as usize] = value;
    }

    #[must_use]
    pub fn with(mut self, sensor: Sensor, value: bool) -> Self {
        self.set(sensor, value);
        self
    }
}

impl From<&FixedReadings> for FixedSensors {
    fn from(r: &FixedReadings) -> Self {
        Self {
            readings: [r.motion, r.sound, r.touch, r.co2],
        }
    }
}

impl SensorOracle for FixedSensors {
    fn poll(&mut self, sensor: Sensor, _rng: &mut dyn RngCore) -> bool {
        self.readings[sensor as usize]
    }
}

/// Builds the oracle described by the configuration.
#[must_use]
pub fn from_config(config: &SensorConfig) -> Box<dyn SensorOracle> {
    match config.mode {
        SensorMode::Coin => Box::new(CoinFlipSensors::new(config.probability)),
        SensorMode::Fixed => Box::new(FixedSensors::from(&config.fixed)),
    }
}
