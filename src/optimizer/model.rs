use serde::{Deserialize, Serialize};

use super::{Action, Inputs, Reward};

// Reward coefficients. Fixed by design, never fitted.
pub const LOW_SOC_PERCENT: f64 = 30.0;
pub const CRITICAL_SOC_PERCENT: f64 = 15.0;
pub const DISCHARGE_LOW_SOC_PENALTY: f64 = 50.0;
pub const DISCHARGE_CRITICAL_SOC_PENALTY: f64 = 200.0;
/// Wear cost per percentage point of lost health, charged on every discharge
pub const WEAR_COST_PER_HEALTH_POINT: f64 = 0.04;
pub const CHARGE_LOW_SOC_REBATE: f64 = 20.0;
pub const CHARGE_CRITICAL_SOC_REBATE: f64 = 40.0;
pub const CHARGE_WITH_SOLAR_PENALTY: f64 = 200.0;
pub const IDLE_SOLAR_GAIN: f64 = 0.6;
pub const IDLE_SOLAR_BONUS: f64 = 30.0;
pub const IDLE_NO_SOLAR_COST: f64 = 5.0;

/// Switches between the reward-policy revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardPolicy {
    /// Forbid selling stored energy while there is no solar generation
    pub discharge_requires_solar: bool,
    /// Penalize buying grid energy while solar is available
    pub penalize_charge_with_solar: bool,
    /// Flat bonus for idling while solar is available
    pub idle_solar_bonus: bool,
}

impl RewardPolicy {
    /// No night trading, no grid charging under sun, idle favoured under sun.
    pub fn night_trading_ban() -> Self {
        Self {
            discharge_requires_solar: true,
            penalize_charge_with_solar: true,
            idle_solar_bonus: true,
        }
    }

    /// Discharge gated by state of charge alone.
    pub fn soc_only() -> Self {
        Self {
            discharge_requires_solar: false,
            penalize_charge_with_solar: false,
            idle_solar_bonus: false,
        }
    }
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self::night_trading_ban()
    }
}

/// Deterministic transition, clamped to 0-100%.
pub fn next_soc(soc_percent: f64, action: Action, step_percent: f64) -> f64 {
    match action {
        Action::Charge => (soc_percent + step_percent).min(100.0),
        Action::Discharge => (soc_percent - step_percent).max(0.0),
        Action::Replace => 100.0,
        Action::Idle => soc_percent,
    }
}

/// Reward model bound to one set of inputs.
#[derive(Debug, Clone, Copy)]
pub struct RewardModel {
    inputs: Inputs,
    policy: RewardPolicy,
    step_percent: f64,
}

impl RewardModel {
    pub fn new(inputs: Inputs, policy: RewardPolicy, step_percent: f64) -> Self {
        Self {
            inputs,
            policy,
            step_percent,
        }
    }

    pub fn next_soc(&self, soc_percent: f64, action: Action) -> f64 {
        next_soc(soc_percent, action, self.step_percent)
    }

    /// One-step reward for taking `action` at `soc_percent`.
    pub fn reward(&self, soc_percent: f64, action: Action) -> Reward {
        match action {
            Action::Discharge => self.discharge(soc_percent),
            Action::Charge => Reward::Value(self.charge(soc_percent)),
            Action::Idle => Reward::Value(self.idle()),
            Action::Replace => Reward::Value(-self.inputs.battery_cost),
        }
    }

    /// Upper bound on `|reward(s, a)|` over every state and feasible action.
    pub fn max_abs_reward(&self) -> f64 {
        let price = self.inputs.price.abs();
        let discharge = price
            + DISCHARGE_LOW_SOC_PENALTY
            + DISCHARGE_CRITICAL_SOC_PENALTY
            + 100.0 * WEAR_COST_PER_HEALTH_POINT;
        let charge = price
            + CHARGE_WITH_SOLAR_PENALTY.max(CHARGE_LOW_SOC_REBATE + CHARGE_CRITICAL_SOC_REBATE);
        let idle = (self.inputs.solar * IDLE_SOLAR_GAIN + IDLE_SOLAR_BONUS).max(IDLE_NO_SOLAR_COST);
        let replace = self.inputs.battery_cost;

        discharge.max(charge).max(idle).max(replace)
    }

    pub fn discharge_allowed(&self, soc_percent: f64) -> bool {
        if soc_percent <= self.step_percent {
            return false;
        }
        !(self.policy.discharge_requires_solar && self.inputs.solar <= 0.0)
    }

    fn discharge(&self, soc: f64) -> Reward {
        if !self.discharge_allowed(soc) {
            return Reward::Infeasible;
        }

        let mut r = self.inputs.price;
        if soc < LOW_SOC_PERCENT {
            r -= DISCHARGE_LOW_SOC_PENALTY;
        }
        if soc < CRITICAL_SOC_PERCENT {
            r -= DISCHARGE_CRITICAL_SOC_PENALTY;
        }
        r -= (100.0 - self.inputs.battery_health) * WEAR_COST_PER_HEALTH_POINT;
        Reward::Value(r)
    }

    fn charge(&self, soc: f64) -> f64 {
        let mut r = -self.inputs.price;
        if soc < LOW_SOC_PERCENT {
            r += CHARGE_LOW_SOC_REBATE;
        }
        if soc < CRITICAL_SOC_PERCENT {
            r += CHARGE_CRITICAL_SOC_REBATE;
        }
        if self.policy.penalize_charge_with_solar && self.inputs.solar > 0.0 {
            r -= CHARGE_WITH_SOLAR_PENALTY;
        }
        r
    }

    fn idle(&self) -> f64 {
        let solar = self.inputs.solar;
        if solar <= 0.0 {
            return -IDLE_NO_SOLAR_COST;
        }

        let mut r = solar * IDLE_SOLAR_GAIN;
        if self.policy.idle_solar_bonus {
            r += IDLE_SOLAR_BONUS;
        }
        r
    }
}
