use battery_decision_engine::optimizer::{
    Action, Inputs, MdpSolver, RewardPolicy, SolverError, SolverParams, StateGrid, INFEASIBLE_Q,
};
use proptest::prelude::*;

fn inputs_strategy(battery: impl Strategy<Value = f64>) -> impl Strategy<Value = Inputs> {
    (
        -100.0..1000.0f64,
        0.0..10.0f64,
        battery,
        0.0..=100.0f64,
        0.0..10_000.0f64,
    )
        .prop_map(|(price, solar, battery, battery_health, battery_cost)| Inputs {
            price,
            solar,
            battery,
            battery_health,
            battery_cost,
        })
}

fn policy_strategy() -> impl Strategy<Value = RewardPolicy> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(d, c, i)| RewardPolicy {
        discharge_requires_solar: d,
        penalize_charge_with_solar: c,
        idle_solar_bonus: i,
    })
}

proptest! {
    #[test]
    fn solve_returns_a_feasible_best_action(
        inputs in inputs_strategy(0.0..=100.0f64),
        policy in policy_strategy(),
    ) {
        let solver = MdpSolver::new(SolverParams::default(), policy).unwrap();
        let decision = solver.solve(&inputs).unwrap();

        prop_assert!(decision.q_values.is_feasible(decision.best_action));
        prop_assert!(decision.best_value.is_finite());
        prop_assert_eq!(decision.best_value, decision.q_values.get(decision.best_action));
        prop_assert!(decision.feasible.contains(&Action::Idle));

        prop_assert_eq!(decision.q_values.iter().count(), 4);
        for (action, q) in decision.q_values.iter() {
            prop_assert!(q.is_finite());
            if decision.q_values.is_feasible(action) {
                prop_assert!(q <= decision.best_value);
                prop_assert!(q > INFEASIBLE_Q);
            } else {
                prop_assert_eq!(q, INFEASIBLE_Q);
            }
        }
    }

    #[test]
    fn extreme_magnitudes_are_rejected_or_stay_above_sentinel(
        price in -1.0e300..1.0e300f64,
        battery_cost in 0.0..1.0e300f64,
        battery in 0.0..=100.0f64,
        policy in policy_strategy(),
    ) {
        let inputs = Inputs { price, solar: 0.0, battery, battery_health: 90.0, battery_cost };
        let solver = MdpSolver::new(SolverParams::default(), policy).unwrap();
        match solver.solve(&inputs) {
            Ok(decision) => {
                for (action, q) in decision.q_values.iter() {
                    prop_assert!(q.is_finite());
                    if decision.q_values.is_feasible(action) {
                        prop_assert!(q > INFEASIBLE_Q);
                    }
                }
            }
            Err(e) => prop_assert!(matches!(e, SolverError::InvalidInput(_))),
        }
    }

    #[test]
    fn solve_is_deterministic(inputs in inputs_strategy(0.0..=100.0f64)) {
        let solver = MdpSolver::new(SolverParams::default(), RewardPolicy::default()).unwrap();
        let first = solver.solve(&inputs).unwrap();
        let second = solver.solve(&inputs).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn terminal_row_is_zero(
        inputs in inputs_strategy(0.0..=100.0f64),
        horizon in 1usize..48,
    ) {
        let params = SolverParams { horizon, ..SolverParams::default() };
        let decision = MdpSolver::new(params, RewardPolicy::default())
            .unwrap()
            .solve(&inputs)
            .unwrap();
        prop_assert_eq!(decision.value_table.rows().len(), horizon + 1);
        prop_assert!(decision.value_table.row(horizon).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn discharge_infeasible_at_or_below_one_step(
        inputs in inputs_strategy(0.0..=6.7f64),
        policy in policy_strategy(),
    ) {
        let solver = MdpSolver::new(SolverParams::default(), policy).unwrap();
        let decision = solver.solve(&inputs).unwrap();
        prop_assert_eq!(decision.q_values.get(Action::Discharge), INFEASIBLE_Q);
        prop_assert_ne!(decision.best_action, Action::Discharge);
    }

    #[test]
    fn grid_is_strictly_increasing(size in 2usize..300) {
        let grid = StateGrid::new(size).unwrap();
        let levels = grid.levels();
        prop_assert_eq!(levels.len(), size);
        prop_assert_eq!(levels[0], 0.0);
        prop_assert_eq!(levels[size - 1], 100.0);
        prop_assert!(levels.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn nearest_index_is_closest(size in 2usize..100, soc in -10.0..110.0f64) {
        let grid = StateGrid::new(size).unwrap();
        let idx = grid.nearest_index(soc);
        let d = (grid.level(idx) - soc).abs();
        for (i, level) in grid.levels().iter().enumerate() {
            let other = (level - soc).abs();
            prop_assert!(d <= other);
            if i < idx {
                prop_assert!(other > d);
            }
        }
    }
}
