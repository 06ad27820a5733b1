use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};
use thiserror::Error;
use validator::Validate;

use super::{StateGrid, ValueTable};

/// Q-value reported for an action that cannot be taken from the current state.
pub const INFEASIBLE_Q: f64 = -9_999_999.0;

/// Largest cumulative reward magnitude a solve may reach; an order of
/// magnitude inside the sentinel so feasible Q-values always rank above it.
pub const MAX_ABS_RETURN: f64 = -INFEASIBLE_Q / 10.0;

/// Solver-specific errors
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid solver configuration: {0}")]
    InvalidConfig(String),
    #[error("Impossible state at battery {battery}%: {reason}")]
    ImpossibleState { battery: f64, reason: &'static str },
}

/// Battery control action
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Charge,
    Discharge,
    Idle,
    Replace,
}

impl Action {
    /// Position in enumeration order, which is also the tie-break order.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One-step reward, or a marker that the action is not allowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reward {
    Value(f64),
    Infeasible,
}

impl Reward {
    pub fn is_feasible(self) -> bool {
        matches!(self, Reward::Value(_))
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Reward::Value(v) => Reward::Value(f(v)),
            Reward::Infeasible => Reward::Infeasible,
        }
    }

    /// Numeric form used at the output boundary.
    pub fn or_sentinel(self) -> f64 {
        match self {
            Reward::Value(v) => v,
            Reward::Infeasible => INFEASIBLE_Q,
        }
    }
}

/// Scalar snapshot the solver decides on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Inputs {
    /// Currency per unit energy; negative tariffs are allowed
    pub price: f64,
    #[validate(range(min = 0.0))]
    pub solar: f64,
    /// State of charge (%)
    #[validate(range(min = 0.0, max = 100.0))]
    pub battery: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub battery_health: f64,
    #[validate(range(min = 0.0))]
    pub battery_cost: f64,
}

impl Inputs {
    /// Reject non-finite fields and out-of-range values without clamping.
    pub fn check(&self) -> Result<(), SolverError> {
        let fields = [
            ("price", self.price),
            ("solar", self.solar),
            ("battery", self.battery),
            ("batteryHealth", self.battery_health),
            ("batteryCost", self.battery_cost),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SolverError::InvalidInput(format!(
                "{name} must be a finite number, got {value}"
            )));
        }

        self.validate()
            .map_err(|errors| SolverError::InvalidInput(errors.to_string()))
    }
}

/// Per-action Q-values, indexed in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QValues([Reward; Action::COUNT]);

impl QValues {
    pub fn from_fn(mut f: impl FnMut(Action) -> Reward) -> Self {
        let mut values = [Reward::Infeasible; Action::COUNT];
        for action in Action::iter() {
            values[action.index()] = f(action);
        }
        Self(values)
    }

    /// Q-value for `action`, or [`INFEASIBLE_Q`] when it is not allowed.
    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()].or_sentinel()
    }

    pub fn reward(&self, action: Action) -> Reward {
        self.0[action.index()]
    }

    pub fn is_feasible(&self, action: Action) -> bool {
        self.0[action.index()].is_feasible()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, f64)> + '_ {
        Action::iter().map(move |a| (a, self.get(a)))
    }

    /// Highest feasible Q-value; the first action in enumeration order wins ties.
    pub fn best(&self) -> Option<(Action, f64)> {
        let mut best: Option<(Action, f64)> = None;
        for action in Action::iter() {
            if let Reward::Value(q) = self.reward(action) {
                match best {
                    Some((_, b)) if q <= b => {}
                    _ => best = Some((action, q)),
                }
            }
        }
        best
    }
}

impl Serialize for QValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Action::COUNT))?;
        for (action, q) in self.iter() {
            map.serialize_entry(&action, &q)?;
        }
        map.end()
    }
}

/// Result of one solve call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub best_action: Action,
    pub best_value: f64,
    pub q_values: QValues,
    /// Actions allowed from the caller's battery level
    pub feasible: Vec<Action>,
    /// Grid index nearest to the caller's battery level
    pub current_index: usize,
    #[serde(rename = "table")]
    pub value_table: ValueTable,
    #[serde(rename = "states")]
    pub state_grid: StateGrid,
}
