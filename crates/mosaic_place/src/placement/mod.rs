//! The hard-macro placement pipeline.
//!
//! Placement runs in four stages over one shared model: model construction
//! with a first-fit initial placement, simulated annealing of macro anchors,
//! centroid fine-tuning of small macros, and a final deterministic
//! legalization that commits a conflict-free site assignment into the
//! design.

pub mod anneal;
pub mod config;
pub mod finetune;
pub mod legalize;
pub mod model;
pub mod moves;

use crate::data::PlacerDesign;
use crate::error::PlaceResult;
use mosaic_device::Device;
use mosaic_diagnostics::DiagnosticSink;
use serde::{Deserialize, Serialize};

pub use anneal::BlockPlacer;
pub use config::PlacerConfig;
pub use model::{HardMacro, Path, PathPort};
pub use moves::Move;

/// Statistics from one placement run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacementSummary {
    /// System cost of the initial first-fit placement.
    pub initial_cost: u64,
    /// System cost of the final placement.
    pub final_cost: u64,
    /// Temperature steps run by the annealer.
    pub temperature_steps: usize,
    /// Total proposed moves.
    pub proposed_moves: u64,
    /// Total accepted moves.
    pub accepted_moves: u64,
    /// Total rejected moves.
    pub rejected_moves: u64,
    /// Accepted moves that increased the cost.
    pub bad_accepted_moves: u64,
    /// Macros relocated by the fine-tuning pass.
    pub finetune_moves: usize,
}

/// Places every macro instance of the design onto the device.
///
/// On success the design holds a final, non-overlapping site assignment for
/// every instance and the returned summary carries the run statistics. On
/// error no partial placement is committed beyond the instances already
/// legalized when the failure was detected; callers should treat the design
/// placement state as invalid.
///
/// # Errors
///
/// Returns the fatal error taxonomy of [`crate::PlaceError`]: a macro with
/// no legal initial site, a legalization dead end, or an incremental cost
/// inconsistency.
pub fn place(
    design: &mut PlacerDesign,
    device: &Device,
    config: &PlacerConfig,
    sink: &DiagnosticSink,
) -> PlaceResult<PlacementSummary> {
    let mut placer = BlockPlacer::build(design, device, config, sink)?;
    placer.anneal(design, sink)?;
    placer.fine_tune(design, sink);
    placer.legalize(design, sink)?;
    Ok(placer.finish())
}
