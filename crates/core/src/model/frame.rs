use serde::{Deserialize, Serialize};

use super::profile::ProfileError;

pub const MAX_TEMP: f64 = 100.0;
pub const MIN_TEMP: f64 = 40.0;

pub const MAX_PRESSURE: f64 = 12.0;
pub const MIN_PRESSURE: f64 = 0.0;

pub const MAX_FLOW: f64 = 11.0;
pub const MIN_FLOW: f64 = 0.0;

/// The quantity a target or trigger is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    #[default]
    Flow,
    Pressure,
}

impl Measure {
    pub fn toggled(self) -> Self {
        match self {
            Measure::Flow => Measure::Pressure,
            Measure::Pressure => Measure::Flow,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Measure::Flow => "ml/s",
            Measure::Pressure => "bar",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Measure::Flow => "flow",
            Measure::Pressure => "pressure",
        }
    }

    /// Upper bound of the setpoint scale for this quantity.
    pub fn max_value(self) -> f64 {
        match self {
            Measure::Flow => MAX_FLOW,
            Measure::Pressure => MAX_PRESSURE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerOperator {
    #[default]
    GreaterThan,
    LessThan,
}

impl TriggerOperator {
    pub fn toggled(self) -> Self {
        match self {
            TriggerOperator::GreaterThan => TriggerOperator::LessThan,
            TriggerOperator::LessThan => TriggerOperator::GreaterThan,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TriggerOperator::GreaterThan => ">",
            TriggerOperator::LessThan => "<",
        }
    }
}

/// The flow-rate or pressure setpoint for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(rename = "type")]
    pub kind: Measure,
    pub value: f64,
    /// Ramp smoothly from the previous frame's target instead of snapping.
    pub interpolate: bool,
}

/// Early-exit condition for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type")]
    pub kind: Measure,
    pub value: f64,
    pub operator: TriggerOperator,
}

impl Default for Trigger {
    /// The trigger a frame gets when one is first switched on.
    fn default() -> Self {
        Self {
            kind: Measure::Flow,
            value: 4.0,
            operator: TriggerOperator::GreaterThan,
        }
    }
}

/// One timed step of a brew profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    /// Water temperature in °C.
    pub temp: f64,
    /// Step length in seconds.
    pub duration: f64,
    pub target: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
}

impl Frame {
    /// A 10 s, 90 °C, 7 ml/s step with no trigger.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            temp: 90.0,
            duration: 10.0,
            target: Target {
                kind: Measure::Flow,
                value: 7.0,
                interpolate: false,
            },
            trigger: None,
        }
    }

    /// Check the invariants every stored frame must hold. `index` is only
    /// used for the error message.
    pub fn validate(&self, index: usize) -> Result<(), ProfileError> {
        let numbers = [
            ("temp", self.temp),
            ("duration", self.duration),
            ("target.value", self.target.value),
        ];
        let trigger_value = self.trigger.map(|t| ("trigger.value", t.value));
        for (field, value) in numbers.into_iter().chain(trigger_value) {
            if !value.is_finite() {
                return Err(ProfileError::NonFinite {
                    index,
                    name: self.name.clone(),
                    field,
                });
            }
        }
        if self.duration <= 0.0 {
            return Err(ProfileError::NonPositiveDuration {
                index,
                name: self.name.clone(),
                duration: self.duration,
            });
        }
        Ok(())
    }
}
