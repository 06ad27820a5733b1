use serde::{Deserialize, Serialize};

use super::SolverError;

/// Discretization and horizon settings for the solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// Number of battery levels in the state grid (N)
    pub grid_size: usize,
    /// Number of future steps (T), e.g. hours
    pub horizon: usize,
    /// SoC change per charge/discharge step (%)
    pub step_percent: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            grid_size: 16,
            horizon: 24,
            step_percent: 6.7,
        }
    }
}

impl SolverParams {
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.grid_size < 2 {
            return Err(SolverError::InvalidConfig(format!(
                "grid_size must be at least 2, got {}",
                self.grid_size
            )));
        }
        // Decision extraction reads row 1 of the table
        if self.horizon < 1 {
            return Err(SolverError::InvalidConfig(
                "horizon must be at least 1 step".to_string(),
            ));
        }
        if !(self.step_percent > 0.0 && self.step_percent <= 100.0) {
            return Err(SolverError::InvalidConfig(format!(
                "step_percent must be in (0, 100], got {}",
                self.step_percent
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = SolverParams::default();
        assert_eq!(params.grid_size, 16);
        assert_eq!(params.horizon, 24);
        assert_eq!(params.step_percent, 6.7);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_params() {
        let mut params = SolverParams::default();
        params.horizon = 0;
        assert!(params.validate().is_err());

        let mut params = SolverParams::default();
        params.grid_size = 1;
        assert!(params.validate().is_err());

        let mut params = SolverParams::default();
        params.step_percent = f64::NAN;
        assert!(params.validate().is_err());

        let mut params = SolverParams::default();
        params.step_percent = 0.0;
        assert!(params.validate().is_err());
    }
}
