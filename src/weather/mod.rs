// Weather collaborator boundary. The core only consumes readings; where
// they come from (live API, cache, simulation) is the provider's concern.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature: f64,
    pub humidity: f64,
    pub rain_intensity: f64,
}

pub trait WeatherProvider {
    fn current(&self) -> WeatherReading;
}

/// Stand-in provider producing plausible conditions from a seeded stream.
pub struct SimulatedWeather {
    rng: RefCell<StdRng>,
}

impl SimulatedWeather {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl WeatherProvider for SimulatedWeather {
    fn current(&self) -> WeatherReading {
        let mut rng = self.rng.borrow_mut();
        let raining = rng.random_range(0..100) < 25;
        WeatherReading {
            temperature: rng.random_range(12.0..38.0),
            humidity: rng.random_range(25.0..95.0),
            rain_intensity: if raining {
                rng.random_range(0.1..0.9)
            } else {
                0.0
            },
        }
    }
}
