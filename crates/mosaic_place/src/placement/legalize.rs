//! Final deterministic legalization: conflict-free placement commit.
//!
//! Converts the annealed (bounding-box approximate) placement into one with
//! zero tile conflicts. Macros commit in descending footprint-size order
//! against a single monotonically growing used-tile set; a macro whose
//! annealed site is taken searches outward in a square spiral, then falls
//! back to a device-wide scan before the run fails.

use crate::data::PlacerDesign;
use crate::error::{PlaceError, PlaceResult};
use crate::placement::anneal::BlockPlacer;
use mosaic_device::{Device, SiteId, TileId};
use mosaic_diagnostics::{Diagnostic, DiagnosticSink, Stage};
use std::collections::{HashMap, HashSet};

impl BlockPlacer<'_> {
    /// Commits a final, non-overlapping site assignment for every macro into
    /// the design.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError::Legalization`] if any macro has no
    /// conflict-free site anywhere on the device.
    pub fn legalize(
        &mut self,
        design: &mut PlacerDesign,
        sink: &DiagnosticSink,
    ) -> PlaceResult<()> {
        // Biggest, most constrained macros commit first.
        let mut order: Vec<usize> = (0..self.macros.len()).collect();
        order.sort_by(|&a, &b| {
            self.macros[b]
                .tile_size
                .cmp(&self.macros[a].tile_size)
                .then(a.cmp(&b))
        });

        let mut used_tiles: HashSet<TileId> = HashSet::new();
        let (rows, cols) = self.device.dimensions();
        let max_ring = rows.max(cols) as i32;
        let mut displaced = 0usize;

        for &idx in &order {
            let footprint = design.template(self.macros[idx].template).footprint.clone();
            let desired = self.macros[idx].temp_anchor;

            // First site per tile wins, in valid-placement order.
            let mut site_by_tile: HashMap<(u32, u32), SiteId> = HashMap::new();
            for &site in &self.macros[idx].valid_placements {
                let tile = self.device.site_tile(site);
                site_by_tile.entry((tile.row, tile.col)).or_insert(site);
            }

            let mut chosen = None;
            if let Some(desired) = desired {
                if footprint_free(self.device, &footprint, desired, &used_tiles) {
                    chosen = Some(desired);
                } else {
                    let tile = self.device.site_tile(desired);
                    let (base_row, base_col) = (tile.row as i32, tile.col as i32);
                    'spiral: for ring in 1..=max_ring {
                        let mut offsets = ring_offsets(ring);
                        if ring % 2 == 0 {
                            offsets.reverse();
                        }
                        for (dr, dc) in offsets {
                            let row = base_row + dr;
                            let col = base_col + dc;
                            if !self.device.in_bounds(row, col) {
                                continue;
                            }
                            if let Some(&site) = site_by_tile.get(&(row as u32, col as u32)) {
                                if footprint_free(self.device, &footprint, site, &used_tiles) {
                                    chosen = Some(site);
                                    break 'spiral;
                                }
                            }
                        }
                    }
                }
            }
            if chosen.is_none() {
                // Exhaustive device-wide scan over the compatible sites.
                chosen = self.macros[idx]
                    .valid_placements
                    .iter()
                    .copied()
                    .find(|&site| footprint_free(self.device, &footprint, site, &used_tiles));
            }

            let Some(site) = chosen else {
                let name = self.macros[idx].name.clone();
                sink.emit(
                    Diagnostic::error(Stage::Legalize, "no conflict-free site on the device")
                        .with_macro(&name),
                );
                return Err(PlaceError::Legalization { name });
            };

            if desired != Some(site) {
                displaced += 1;
            }
            self.macros[idx].set_temp_anchor(site, self.device, &footprint);
            let tile = self.device.site_tile(site);
            for &(dr, dc) in &footprint {
                let row = tile.row as i32 + dr;
                let col = tile.col as i32 + dc;
                if let Some(covered) = self.device.tile_at(row as u32, col as u32) {
                    used_tiles.insert(covered);
                }
            }
            design.place_instance(self.macros[idx].inst, site);
        }

        if self.config.verbose {
            sink.emit(Diagnostic::note(
                Stage::Legalize,
                format!("committed {} macros, {displaced} displaced", order.len()),
            ));
        }
        Ok(())
    }
}

/// Returns whether a macro footprint anchored at `site` stays on the grid
/// and touches no used tile.
fn footprint_free(
    device: &Device,
    footprint: &[(i32, i32)],
    site: SiteId,
    used: &HashSet<TileId>,
) -> bool {
    let tile = device.site_tile(site);
    footprint.iter().all(|&(dr, dc)| {
        let row = tile.row as i32 + dr;
        let col = tile.col as i32 + dc;
        if !device.in_bounds(row, col) {
            return false;
        }
        match device.tile_at(row as u32, col as u32) {
            Some(covered) => !used.contains(&covered),
            None => false,
        }
    })
}

/// The offsets of the square ring at Chebyshev radius `ring`, enumerated
/// clockwise from the top-left corner: top edge, right edge, bottom edge,
/// left edge.
fn ring_offsets(ring: i32) -> Vec<(i32, i32)> {
    let mut offsets = Vec::with_capacity((8 * ring) as usize);
    for dc in -ring..=ring {
        offsets.push((-ring, dc));
    }
    for dr in (-ring + 1)..=ring {
        offsets.push((dr, ring));
    }
    for dc in (-ring..ring).rev() {
        offsets.push((ring, dc));
    }
    for dr in ((-ring + 1)..ring).rev() {
        offsets.push((dr, -ring));
    }
    offsets
}
