use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;

use crate::{
    api::{error::ApiError, response::ApiResponse, AppState},
    optimizer::{Decision, Inputs, RewardPolicy, SolverParams},
};

/// POST /api/v1/decision - Solve the horizon and return the best action
pub async fn solve_decision(
    State(state): State<AppState>,
    payload: Result<Json<Inputs>, JsonRejection>,
) -> Result<Json<ApiResponse<Decision>>, ApiError> {
    let Json(inputs) = payload?;

    let start = Instant::now();
    let decision = state.solver.solve(&inputs)?;
    let elapsed = start.elapsed();

    tracing::info!(
        best_action = %decision.best_action,
        battery = inputs.battery,
        elapsed_us = elapsed.as_micros() as u64,
        "decision computed"
    );

    Ok(Json(
        ApiResponse::success(decision).with_duration(elapsed.as_micros() as u64),
    ))
}

/// Active solver settings
#[derive(Debug, Serialize)]
pub struct SolverInfo {
    pub params: SolverParams,
    pub policy: RewardPolicy,
}

/// GET /api/v1/solver - Report grid, horizon and reward policy
pub async fn get_solver(State(state): State<AppState>) -> Json<ApiResponse<SolverInfo>> {
    Json(ApiResponse::success(SolverInfo {
        params: state.solver.params().clone(),
        policy: state.solver.policy(),
    }))
}
