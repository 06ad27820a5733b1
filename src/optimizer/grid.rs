use serde::Serialize;

use super::SolverError;

/// Evenly spaced battery levels covering 0-100%.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StateGrid {
    levels: Vec<f64>,
}

impl StateGrid {
    /// Build `size` levels `i * 100 / (size - 1)`; needs at least both endpoints.
    pub fn new(size: usize) -> Result<Self, SolverError> {
        if size < 2 {
            return Err(SolverError::InvalidConfig(format!(
                "state grid needs at least 2 levels, got {size}"
            )));
        }

        let last = (size - 1) as f64;
        let levels = (0..size).map(|i| (i as f64 / last) * 100.0).collect();
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> f64 {
        self.levels[index]
    }

    /// Index of the level closest to `soc_percent`.
    ///
    /// Ties resolve to the lowest index. Both the table pass and the
    /// decision pass snap through here so they can never disagree.
    pub fn nearest_index(&self, soc_percent: f64) -> usize {
        let mut closest = 0;
        let mut best_distance = f64::INFINITY;
        for (i, level) in self.levels.iter().enumerate() {
            let distance = (level - soc_percent).abs();
            if distance < best_distance {
                best_distance = distance;
                closest = i;
            }
        }
        closest
    }
}

/// `V[t][i]`: best cumulative reward from grid level `i` with `horizon - t` steps left.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValueTable {
    rows: Vec<Vec<f64>>,
}

impl ValueTable {
    /// Zero-filled table with `horizon + 1` rows; the last row is the terminal boundary.
    pub(crate) fn zeros(horizon: usize, states: usize) -> Self {
        Self {
            rows: vec![vec![0.0; states]; horizon + 1],
        }
    }

    pub fn horizon(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn row(&self, t: usize) -> &[f64] {
        &self.rows[t]
    }

    pub fn get(&self, t: usize, i: usize) -> f64 {
        self.rows[t][i]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub(crate) fn set(&mut self, t: usize, i: usize, value: f64) {
        self.rows[t][i] = value;
    }
}
