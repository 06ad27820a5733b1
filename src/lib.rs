//! Hour-by-hour battery decision engine.
//!
//! [`optimizer::MdpSolver`] discretizes the state of charge, runs backward
//! induction over a finite horizon and returns the best of charge, discharge,
//! idle and replace together with every action's Q-value. The `api` module is
//! a thin HTTP transport around that pure call.

pub mod api;
pub mod config;
pub mod optimizer;
pub mod telemetry;

pub use optimizer::{Action, Decision, Inputs, MdpSolver, RewardPolicy, SolverError, SolverParams};
