use strum::IntoEnumIterator;
use tracing::{debug, error, warn};

use super::{
    Action, Decision, Inputs, QValues, Reward, RewardModel, RewardPolicy, SolverError,
    SolverParams, StateGrid, ValueTable, MAX_ABS_RETURN,
};

/// Finite-horizon backward-induction solver over a discretized state of charge.
///
/// Holds only parameters. Every [`MdpSolver::solve`] call builds its own grid
/// and value table, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct MdpSolver {
    params: SolverParams,
    policy: RewardPolicy,
}

impl MdpSolver {
    pub fn new(params: SolverParams, policy: RewardPolicy) -> Result<Self, SolverError> {
        params.validate()?;
        Ok(Self { params, policy })
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn policy(&self) -> RewardPolicy {
        self.policy
    }

    /// Solve the horizon for `inputs` and pick the action for the current step.
    pub fn solve(&self, inputs: &Inputs) -> Result<Decision, SolverError> {
        if let Err(e) = inputs.check() {
            warn!(error = %e, "rejecting solver inputs");
            return Err(e);
        }

        let model = RewardModel::new(*inputs, self.policy, self.params.step_percent);
        if let Err(e) = self.check_magnitude(&model) {
            warn!(error = %e, "rejecting solver inputs");
            return Err(e);
        }

        let grid = StateGrid::new(self.params.grid_size)?;
        let table = backward_induction(&grid, &model, self.params.horizon);

        let q_values = action_values(&grid, &model, &table, inputs.battery)?;
        let Some((best_action, best_value)) = q_values.best() else {
            error!(battery = inputs.battery, "no feasible action");
            return Err(SolverError::ImpossibleState {
                battery: inputs.battery,
                reason: "no feasible action",
            });
        };
        if !q_values.iter().all(|(_, q)| q.is_finite()) {
            error!(battery = inputs.battery, best_value, "non-finite action value");
            return Err(SolverError::ImpossibleState {
                battery: inputs.battery,
                reason: "non-finite action value",
            });
        }

        debug!(
            price = inputs.price,
            solar = inputs.solar,
            battery = inputs.battery,
            battery_health = inputs.battery_health,
            battery_cost = inputs.battery_cost,
            %best_action,
            best_value,
            "solved decision"
        );

        Ok(Decision {
            best_action,
            best_value,
            q_values,
            feasible: Action::iter().filter(|a| q_values.is_feasible(*a)).collect(),
            current_index: grid.nearest_index(inputs.battery),
            value_table: table,
            state_grid: grid,
        })
    }

    /// Reject inputs whose rewards, summed over the horizon, could reach the
    /// infeasibility sentinel or overflow.
    fn check_magnitude(&self, model: &RewardModel) -> Result<(), SolverError> {
        let per_step = model.max_abs_reward();
        let reachable = per_step * (self.params.horizon + 1) as f64;
        if reachable > MAX_ABS_RETURN {
            return Err(SolverError::InvalidInput(format!(
                "reward magnitude {per_step} over {} steps exceeds {MAX_ABS_RETURN}",
                self.params.horizon
            )));
        }
        Ok(())
    }
}

/// Fill `V[t][i]` from `t = horizon - 1` down to 0; row `horizon` stays zero.
pub(crate) fn backward_induction(
    grid: &StateGrid,
    model: &RewardModel,
    horizon: usize,
) -> ValueTable {
    let mut table = ValueTable::zeros(horizon, grid.len());

    for t in (0..horizon).rev() {
        for (i, &soc) in grid.levels().iter().enumerate() {
            let next = table.row(t + 1);
            let best = Action::iter()
                .filter_map(|action| match model.reward(soc, action) {
                    Reward::Value(r) => {
                        Some(r + next[grid.nearest_index(model.next_soc(soc, action))])
                    }
                    Reward::Infeasible => None,
                })
                .fold(f64::NEG_INFINITY, f64::max);
            table.set(t, i, best);
        }
    }

    table
}

/// One-step look-ahead Q-values from an off-grid battery level into row 1.
pub(crate) fn action_values(
    grid: &StateGrid,
    model: &RewardModel,
    table: &ValueTable,
    battery: f64,
) -> Result<QValues, SolverError> {
    if table.horizon() < 1 {
        return Err(SolverError::InvalidConfig(
            "value table has no step to look ahead into".to_string(),
        ));
    }

    let next = table.row(1);
    Ok(QValues::from_fn(|action| {
        model
            .reward(battery, action)
            .map(|r| r + next[grid.nearest_index(model.next_soc(battery, action))])
    }))
}
