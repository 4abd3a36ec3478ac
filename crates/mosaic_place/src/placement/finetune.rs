//! Post-anneal fine-tuning: centroid relocation of small macros.

use crate::data::PlacerDesign;
use crate::geom::{smallest_enclosing_circle_center, Point};
use crate::ids::HardMacroId;
use crate::placement::anneal::BlockPlacer;
use crate::placement::moves::Move;
use mosaic_diagnostics::{Diagnostic, DiagnosticSink, Stage};

impl BlockPlacer<'_> {
    /// Relocates small macros toward the center of the tiles their wires
    /// touch.
    ///
    /// For every macro cheap enough to move, gathers the tiles of all
    /// non-self endpoints of its connected paths, finds the smallest
    /// enclosing circle of that point set, and attempts to re-anchor the
    /// macro on the site at the circle's center tile. The relocation is
    /// reverted if it worsens the macro's worst connected-path length by
    /// more than the configured regret bound.
    pub fn fine_tune(&mut self, design: &PlacerDesign, sink: &DiagnosticSink) {
        let mut moved = 0usize;
        for idx in 0..self.macros.len() {
            let id = HardMacroId::from_raw(idx as u32);
            if self.macros[idx].tile_size >= self.config.finetune_max_tiles {
                continue;
            }
            if self.macros[idx].connected_paths.is_empty() {
                continue;
            }
            let Some(old_site) = self.macros[idx].temp_anchor else {
                continue;
            };

            let mut points = Vec::new();
            for &pid in &self.macros[idx].connected_paths {
                for port in &self.paths[pid.as_raw() as usize].ports {
                    if port.makro != Some(id) {
                        points.push(Point::new(port.tile.1, port.tile.0));
                    }
                }
            }
            let Some(center) = smallest_enclosing_circle_center(&points) else {
                continue;
            };

            let target = self.macros[idx].valid_placements.iter().copied().find(|&site| {
                let tile = self.device.site_tile(site);
                tile.row as i32 == center.y && tile.col as i32 == center.x
            });
            let Some(target) = target else { continue };
            if target == old_site || self.occupancy.contains_key(&target) {
                continue;
            }

            let old_worst = self.worst_connected_length(id);
            let mv = Move::relocate(id, old_site, target);
            mv.apply(&mut self.macros, &mut self.occupancy, self.device, design);
            if !self.block_is_legal(id) {
                mv.undo(&mut self.macros, &mut self.occupancy, self.device, design);
                continue;
            }
            self.recompute_move_paths(&mv);
            let new_worst = self.worst_connected_length(id);
            if new_worst > old_worst + self.config.finetune_regret {
                mv.undo(&mut self.macros, &mut self.occupancy, self.device, design);
                self.recompute_move_paths(&mv);
            } else {
                moved += 1;
            }
        }
        self.summary.finetune_moves = moved;
        if self.config.verbose {
            sink.emit(Diagnostic::note(
                Stage::FineTune,
                format!("relocated {moved} macros toward path centroids"),
            ));
        }
    }
}
