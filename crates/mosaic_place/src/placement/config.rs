//! Placement run configuration.

use serde::{Deserialize, Serialize};

/// Tunable parameters for a placement run.
///
/// A run is fully deterministic given the seed, the other parameters, and
/// the input design. The annealing constants carry empirically chosen
/// defaults; they are exposed here rather than hardcoded, but changing them
/// changes convergence behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacerConfig {
    /// Seed for the single random generator driving the whole run.
    pub seed: u64,
    /// Accepted moves required per temperature step, before the adaptive
    /// extra-move term.
    pub moves_per_temperature: usize,
    /// Geometric temperature reduction ratio applied after each step.
    pub temp_reduce: f64,
    /// Starting temperature as a multiple of the initial system cost.
    pub start_temp_factor: f64,
    /// Emit per-step progress notes into the diagnostic sink.
    pub verbose: bool,
    /// Halo margin (in tiles) around each macro's bounding box during
    /// annealing overlap checks.
    pub halo: i32,
    /// Weight of the worst-case path length in the system cost, biasing the
    /// search toward minimizing the critical connection.
    pub critical_path_weight: u64,
    /// Target acceptance rate the adaptive schedule steers toward.
    pub golden_acceptance_rate: f64,
    /// Upper bound on the adaptive extra moves per temperature step.
    pub max_extra_moves: usize,
    /// Macros occupying at least this many tiles are skipped by fine-tuning.
    pub finetune_max_tiles: usize,
    /// A fine-tuning relocation is kept only if it worsens the macro's
    /// worst connected-path length by no more than this many tiles.
    pub finetune_regret: u32,
    /// Annealing stops when the temperature falls below this value.
    pub min_temperature: f64,
    /// Annealing stops when the acceptance rate falls below this value.
    pub min_acceptance_rate: f64,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            moves_per_temperature: 500,
            temp_reduce: 0.90,
            start_temp_factor: 10.5,
            verbose: false,
            halo: 1,
            critical_path_weight: 16,
            golden_acceptance_rate: 0.44,
            max_extra_moves: 2500,
            finetune_max_tiles: 60,
            finetune_regret: 5,
            min_temperature: 0.01,
            min_acceptance_rate: 0.01,
        }
    }
}
