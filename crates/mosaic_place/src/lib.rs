//! Hard-macro placement engine for the Mosaic FPGA toolkit.
//!
//! This crate places pre-implemented, relocatable design blocks ("hard
//! macros") onto a physical device grid, minimizing total and worst-case
//! wire length while keeping every macro on a legal, conflict-free site.
//!
//! # Pipeline
//!
//! 1. **Build** — enumerate valid sites per template, first-fit initial anchors
//! 2. **Anneal** — Metropolis-accepted anchor swaps under a cooling schedule
//! 3. **Fine-tune** — relocate small macros toward their wire centroids
//! 4. **Legalize** — commit a conflict-free site assignment into the design
//!
//! # Usage
//!
//! ```
//! use mosaic_device::{Device, SiteType};
//! use mosaic_diagnostics::DiagnosticSink;
//! use mosaic_place::{place_design, PlacerConfig, PlacerDesign};
//!
//! let device = Device::grid(8, 8, SiteType::Logic);
//! let mut design = PlacerDesign::new();
//! let sink = DiagnosticSink::new();
//! let summary = place_design(&mut design, &device, &PlacerConfig::default(), &sink)?;
//! assert!(design.is_fully_placed());
//! assert_eq!(summary.final_cost, 0);
//! # Ok::<(), mosaic_place::PlaceError>(())
//! ```
//!
//! The run is single-threaded and fully deterministic given the seed, the
//! other configuration parameters, and the input design.

#![warn(missing_docs)]

pub mod data;
pub mod error;
pub mod geom;
pub mod ids;
pub mod placement;

pub use data::{MacroInst, MacroTemplate, Net, PinRecord, PlacerDesign};
pub use error::{PlaceError, PlaceResult};
pub use geom::{convex_hull, smallest_enclosing_circle_center, Point};
pub use ids::{HardMacroId, MacroInstId, NetId, PathId, TemplateId};
pub use placement::{
    place, BlockPlacer, HardMacro, Move, Path, PathPort, PlacementSummary, PlacerConfig,
};

use mosaic_device::Device;
use mosaic_diagnostics::DiagnosticSink;

/// Places every macro instance of the design onto the device.
///
/// Convenience entry point equivalent to [`placement::place`]: builds the
/// placement model, runs the annealing loop, fine-tunes, and commits a
/// final legal, non-overlapping placement back into the design.
///
/// # Errors
///
/// Returns a [`PlaceError`] naming the offending macro when no legal initial
/// placement or no conflict-free final site exists, or a consistency error
/// if the incremental cost model is detected to be corrupt.
pub fn place_design(
    design: &mut PlacerDesign,
    device: &Device,
    config: &PlacerConfig,
    sink: &DiagnosticSink,
) -> PlaceResult<PlacementSummary> {
    placement::place(design, device, config, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_device::SiteType;

    fn linked_design() -> PlacerDesign {
        let mut design = PlacerDesign::new();
        let t = design.add_template(MacroTemplate {
            id: TemplateId::from_raw(0),
            name: "pair".into(),
            site_type: SiteType::Logic,
            anchor: (0, 0),
            footprint: vec![(0, 0), (1, 0)],
        });
        let a = design.add_instance(MacroInst {
            id: MacroInstId::from_raw(0),
            name: "a".into(),
            template: t,
            placement: None,
        });
        let b = design.add_instance(MacroInst {
            id: MacroInstId::from_raw(0),
            name: "b".into(),
            template: t,
            placement: None,
        });
        design.add_net(Net {
            id: NetId::from_raw(0),
            name: "w".into(),
            source: Some(PinRecord {
                inst: Some(a),
                tile: (0, 0),
            }),
            sinks: vec![PinRecord {
                inst: Some(b),
                tile: (1, 0),
            }],
        });
        design
    }

    #[test]
    fn place_design_places_everything() {
        let device = Device::grid(8, 8, SiteType::Logic);
        let mut design = linked_design();
        let mut config = PlacerConfig::default();
        config.seed = 13;
        config.moves_per_temperature = 20;
        config.max_extra_moves = 40;
        config.start_temp_factor = 0.5;
        let sink = DiagnosticSink::new();

        let summary = place_design(&mut design, &device, &config, &sink).unwrap();
        assert!(design.is_fully_placed());
        assert!(summary.temperature_steps > 0);
        assert!(summary.proposed_moves >= summary.accepted_moves);
        assert!(!sink.has_errors());
    }

    #[test]
    fn summary_serde_roundtrip() {
        let device = Device::grid(8, 8, SiteType::Logic);
        let mut design = linked_design();
        let mut config = PlacerConfig::default();
        config.moves_per_temperature = 10;
        config.max_extra_moves = 20;
        config.start_temp_factor = 0.2;
        let sink = DiagnosticSink::new();
        let summary = place_design(&mut design, &device, &config, &sink).unwrap();

        let json = serde_json::to_string(&summary).unwrap();
        let restored: PlacementSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.final_cost, summary.final_cost);
        assert_eq!(restored.proposed_moves, summary.proposed_moves);
    }

    #[test]
    fn reexports_available() {
        let _ = PlacerDesign::new();
        let _ = PlacerConfig::default();
        let _ = Point::new(0, 0);
        let _ = HardMacroId::from_raw(0);
        let _ = PathId::from_raw(0);
        let _: PlaceResult<()> = Ok(());
    }
}
