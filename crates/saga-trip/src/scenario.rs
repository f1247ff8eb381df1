use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CliError, Result};
use crate::services::Service;

/// How a simulated service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Outcome {
    #[default]
    Confirm,
    Decline,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StepScenario {
    pub book: Outcome,
    pub cancel: Outcome,
}

/// Scripted answers for every service in the trip, loaded from TOML.
///
/// ```toml
/// trip_id = "trip-42"
///
/// [flight]
/// book = "decline"
///
/// [hotel]
/// cancel = "unavailable"
/// ```
///
/// Omitted services confirm everything.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Scenario {
    pub trip_id: String,
    pub hotel: StepScenario,
    pub flight: StepScenario,
    pub car: StepScenario,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            trip_id: String::from("trip-1"),
            hotel: StepScenario::default(),
            flight: StepScenario::default(),
            car: StepScenario::default(),
        }
    }
}

impl Scenario {
    /// Load a scenario file, or the all-confirm default when `path` is `None`.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|source| CliError::ScenarioRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| CliError::ScenarioParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub(crate) fn step(&self, service: Service) -> StepScenario {
        match service {
            Service::Hotel => self.hotel,
            Service::Flight => self.flight,
            Service::Car => self.car,
        }
    }
}
