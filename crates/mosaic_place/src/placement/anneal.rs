//! Simulated annealing placement of hard macros.
//!
//! [`BlockPlacer`] builds the placement model from a design, then repeatedly
//! proposes anchor swaps and relocations, accepting or rejecting each move
//! with the Metropolis criterion. The temperature decreases geometrically;
//! the number of moves per temperature step adapts to how far the acceptance
//! rate drifts from a target rate.

use crate::data::PlacerDesign;
use crate::error::{PlaceError, PlaceResult};
use crate::ids::{HardMacroId, PathId};
use crate::placement::config::PlacerConfig;
use crate::placement::model::{HardMacro, Path, PathPort};
use crate::placement::moves::Move;
use crate::placement::PlacementSummary;
use mosaic_device::{Device, SiteId};
use mosaic_diagnostics::{Diagnostic, DiagnosticSink, Stage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Proposals allowed per temperature step, as a multiple of the accepted-move
/// target. Bounds the step when acceptance collapses near convergence.
const PROPOSAL_LIMIT_FACTOR: u64 = 64;

/// Macro switches allowed inside one move proposal, as a multiple of the
/// macro count, before the proposal gives up.
const SWITCH_LIMIT_FACTOR: usize = 8;

/// The annealing orchestrator.
///
/// Owns the placement model (hard macros, paths, and the anchor-occupancy
/// map) and the single seeded random generator; a run is fully deterministic
/// given the configuration and the input design.
#[derive(Debug)]
pub struct BlockPlacer<'a> {
    pub(crate) device: &'a Device,
    pub(crate) config: &'a PlacerConfig,
    rng: StdRng,
    pub(crate) macros: Vec<HardMacro>,
    pub(crate) paths: Vec<Path>,
    pub(crate) occupancy: HashMap<SiteId, HardMacroId>,
    pub(crate) summary: PlacementSummary,
}

impl<'a> BlockPlacer<'a> {
    /// Builds the placement model from a design.
    ///
    /// Enumerates valid placement sites per template (cached for templates
    /// with multiple instances), constructs one [`HardMacro`] per instance,
    /// and anchors each on the first candidate site that does not conflict
    /// with any already-placed macro. Then builds one [`Path`] per net that
    /// crosses a macro boundary and registers it on every macro it touches.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError::Configuration`] if any macro has no
    /// conflict-free initial site.
    pub fn build(
        design: &PlacerDesign,
        device: &'a Device,
        config: &'a PlacerConfig,
        sink: &DiagnosticSink,
    ) -> PlaceResult<Self> {
        let mut valid_cache: HashMap<crate::ids::TemplateId, Vec<SiteId>> = HashMap::new();
        let mut macros: Vec<HardMacro> = Vec::with_capacity(design.instance_count());
        let mut occupancy: HashMap<SiteId, HardMacroId> = HashMap::new();

        for inst in &design.instances {
            let template = design.template(inst.template);
            let valid = valid_cache
                .entry(inst.template)
                .or_insert_with(|| template.valid_anchor_sites(device))
                .clone();

            // One macro per instance, created in instance order, so the raw
            // indices of MacroInstId and HardMacroId coincide.
            let id = HardMacroId::from_raw(macros.len() as u32);
            let mut mac = HardMacro::new(
                id,
                inst.id,
                inst.name.clone(),
                inst.template,
                valid,
                template.tile_size(),
            );

            let mut chosen = None;
            for i in 0..mac.valid_placements.len() {
                let site = mac.valid_placements[i];
                mac.set_temp_anchor(site, device, &template.footprint);
                if !macros.iter().any(|other| mac.conflicts_with(other, config.halo)) {
                    chosen = Some(site);
                    break;
                }
            }
            match chosen {
                Some(site) => {
                    occupancy.insert(site, id);
                    macros.push(mac);
                }
                None => {
                    sink.emit(
                        Diagnostic::error(Stage::Build, "no legal initial placement")
                            .with_macro(&inst.name),
                    );
                    return Err(PlaceError::Configuration {
                        name: inst.name.clone(),
                    });
                }
            }
        }

        let mut paths: Vec<Path> = Vec::new();
        for net in &design.nets {
            let Some(source) = net.source else { continue };
            let source_macro = source.inst.map(|i| HardMacroId::from_raw(i.as_raw()));
            let crosses = net
                .sinks
                .iter()
                .any(|sink_pin| sink_pin.inst.map(|i| HardMacroId::from_raw(i.as_raw())) != source_macro);
            if !crosses {
                continue;
            }

            let id = PathId::from_raw(paths.len() as u32);
            let mut ports = Vec::with_capacity(1 + net.sinks.len());
            ports.push(make_port(&source, design));
            for sink_pin in &net.sinks {
                ports.push(make_port(sink_pin, design));
            }
            paths.push(Path {
                id,
                name: net.name.clone(),
                ports,
                length: 0,
            });
        }

        for path in &paths {
            for port in &path.ports {
                if let Some(m) = port.makro {
                    let list = &mut macros[m.as_raw() as usize].connected_paths;
                    if !list.contains(&path.id) {
                        list.push(path.id);
                    }
                }
            }
        }

        let mut placer = Self {
            device,
            config,
            rng: StdRng::seed_from_u64(config.seed),
            macros,
            paths,
            occupancy,
            summary: PlacementSummary::default(),
        };
        let initial = placer.recompute_all_paths();
        placer.summary.initial_cost = initial;
        if config.verbose {
            sink.emit(Diagnostic::note(
                Stage::Build,
                format!(
                    "{} macros, {} paths, initial cost {initial}",
                    placer.macros.len(),
                    placer.paths.len()
                ),
            ));
        }
        Ok(placer)
    }

    /// Returns the hard macros of the placement model.
    pub fn macros(&self) -> &[HardMacro] {
        &self.macros
    }

    /// Returns the paths of the placement model.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Recomputes every path length from scratch and returns the system cost.
    pub(crate) fn recompute_all_paths(&mut self) -> u64 {
        for i in 0..self.paths.len() {
            self.paths[i].calculate_length(&self.macros, self.device);
        }
        self.system_cost()
    }

    /// Returns the system cost from the currently stored path lengths: the
    /// sum of all path lengths plus the critical-path weight times the worst
    /// path length.
    pub(crate) fn system_cost(&self) -> u64 {
        let mut total = 0u64;
        let mut worst = 0u64;
        for path in &self.paths {
            total += path.length as u64;
            worst = worst.max(path.length as u64);
        }
        total + self.config.critical_path_weight * worst
    }

    /// Recomputes the lengths of the paths attached to the macros touched by
    /// the given move; all other path lengths are still valid.
    pub(crate) fn recompute_move_paths(&mut self, mv: &Move) {
        self.recompute_connected(mv.block0);
        if let Some(block1) = mv.block1 {
            self.recompute_connected(block1);
        }
    }

    fn recompute_connected(&mut self, id: HardMacroId) {
        let idx = id.as_raw() as usize;
        for i in 0..self.macros[idx].connected_paths.len() {
            let pid = self.macros[idx].connected_paths[i];
            self.paths[pid.as_raw() as usize].calculate_length(&self.macros, self.device);
        }
    }

    /// Returns whether the given macro's current placement is legal: its
    /// anchor is a member of its valid-placement set and its bounding box
    /// conflicts with no other macro within the halo margin.
    pub(crate) fn block_is_legal(&self, id: HardMacroId) -> bool {
        let mac = &self.macros[id.as_raw() as usize];
        let anchored = match mac.temp_anchor {
            Some(site) => mac.can_anchor(site),
            None => false,
        };
        anchored
            && !self
                .macros
                .iter()
                .any(|other| other.id != id && mac.conflicts_with(other, self.config.halo))
    }

    fn move_is_legal(&self, mv: &Move) -> bool {
        self.block_is_legal(mv.block0) && mv.block1.map_or(true, |b| self.block_is_legal(b))
    }

    /// The worst length among the paths connected to a macro.
    pub(crate) fn worst_connected_length(&self, id: HardMacroId) -> u32 {
        self.macros[id.as_raw() as usize]
            .connected_paths
            .iter()
            .map(|pid| self.paths[pid.as_raw() as usize].length)
            .max()
            .unwrap_or(0)
    }

    fn random_macro(&mut self) -> HardMacroId {
        let n = self.macros.len();
        HardMacroId::from_raw(self.rng.gen_range(0..n) as u32)
    }

    /// Proposes and tentatively applies the next candidate move.
    ///
    /// Picks a random macro and a random site from its valid-placement set.
    /// An occupied site becomes a swap candidate, an empty one a relocation;
    /// either is kept only if every involved macro ends up legal. Retries
    /// are budgeted at ten times the macro's valid-site count; when the
    /// budget runs out the proposal switches to a freshly chosen macro, so
    /// one macro with a saturated neighborhood cannot starve the search.
    /// Returns `None` only after the global switch bound is exhausted.
    ///
    /// The returned move is already applied; the caller decides acceptance
    /// and calls [`Move::undo`] to reject.
    pub(crate) fn next_move(&mut self, design: &PlacerDesign) -> Option<Move> {
        if self.macros.is_empty() {
            return None;
        }
        let max_switches = SWITCH_LIMIT_FACTOR * self.macros.len();
        let mut switches = 0usize;
        let mut block = self.random_macro();
        let mut budget = 10 * self.macros[block.as_raw() as usize].valid_placements.len();

        loop {
            if budget == 0 {
                switches += 1;
                if switches > max_switches {
                    return None;
                }
                block = self.random_macro();
                budget = 10 * self.macros[block.as_raw() as usize].valid_placements.len();
                continue;
            }
            budget -= 1;

            let (old_site, candidate) = {
                let mac = &self.macros[block.as_raw() as usize];
                if mac.valid_placements.is_empty() {
                    budget = 0;
                    continue;
                }
                let pick = self.rng.gen_range(0..mac.valid_placements.len());
                match mac.temp_anchor {
                    Some(old) => (old, mac.valid_placements[pick]),
                    None => {
                        budget = 0;
                        continue;
                    }
                }
            };
            if candidate == old_site {
                continue;
            }

            let mv = match self.occupancy.get(&candidate).copied() {
                Some(displaced) if displaced != block => {
                    // The displaced macro must be able to anchor on the
                    // vacated site for a swap to make sense at all.
                    if !self.macros[displaced.as_raw() as usize].can_anchor(old_site) {
                        continue;
                    }
                    Move::swap(block, old_site, candidate, displaced)
                }
                Some(_) => continue,
                None => Move::relocate(block, old_site, candidate),
            };

            mv.apply(&mut self.macros, &mut self.occupancy, self.device, design);
            if self.move_is_legal(&mv) {
                return Some(mv);
            }
            mv.undo(&mut self.macros, &mut self.occupancy, self.device, design);
        }
    }

    /// The acceptance scale of a move: the number of paths connected to each
    /// involved macro. Highly connected macros are harder to perturb without
    /// a real improvement.
    fn move_path_scale(&self, mv: &Move) -> usize {
        let first = self.macros[mv.block0.as_raw() as usize].connected_paths.len();
        let second = mv
            .block1
            .map_or(0, |b| self.macros[b.as_raw() as usize].connected_paths.len());
        first + second
    }

    /// Runs the annealing loop to convergence.
    ///
    /// Each temperature step proposes moves until enough are accepted, then
    /// cools geometrically and adapts the extra-move budget to the distance
    /// between the observed and target acceptance rates. Stops when the
    /// acceptance rate or the temperature falls below its floor.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError::Consistency`] if the system cost fails to
    /// return to its pre-move value after a rejected move is undone.
    pub fn anneal(&mut self, design: &PlacerDesign, sink: &DiagnosticSink) -> PlaceResult<()> {
        if self.macros.len() < 2 || self.paths.is_empty() {
            return Ok(());
        }

        let mut cost = self.recompute_all_paths();
        let mut temperature = cost as f64 * self.config.start_temp_factor;
        let mut extra_moves = 0usize;

        loop {
            let target = (self.config.moves_per_temperature + extra_moves) as u64;
            let proposal_limit = target.saturating_mul(PROPOSAL_LIMIT_FACTOR).max(1);
            let mut accepted = 0u64;
            let mut proposed = 0u64;
            let mut rejected = 0u64;
            let mut bad_accepted = 0u64;

            while accepted < target && proposed < proposal_limit {
                let Some(mv) = self.next_move(design) else {
                    break;
                };
                proposed += 1;

                self.recompute_move_paths(&mv);
                let new_cost = self.system_cost();
                let delta = new_cost as i64 - cost as i64;
                let scale = self.move_path_scale(&mv) as f64;
                let draw: f64 = self.rng.gen();

                if draw < (-(delta as f64) / (scale * temperature)).exp() {
                    accepted += 1;
                    if delta > 0 {
                        bad_accepted += 1;
                    }
                    cost = new_cost;
                } else {
                    mv.undo(&mut self.macros, &mut self.occupancy, self.device, design);
                    self.recompute_move_paths(&mv);
                    rejected += 1;
                    let restored = self.system_cost();
                    if restored != cost {
                        sink.emit(Diagnostic::error(
                            Stage::Anneal,
                            format!("cost {restored} after undo, expected {cost}"),
                        ));
                        return Err(PlaceError::Consistency {
                            expected: cost,
                            actual: restored,
                        });
                    }
                }
            }

            self.summary.temperature_steps += 1;
            self.summary.proposed_moves += proposed;
            self.summary.accepted_moves += accepted;
            self.summary.rejected_moves += rejected;
            self.summary.bad_accepted_moves += bad_accepted;

            let acceptance_rate = if proposed > 0 {
                accepted as f64 / proposed as f64
            } else {
                0.0
            };
            if self.config.verbose {
                sink.emit(Diagnostic::note(
                    Stage::Anneal,
                    format!(
                        "T={temperature:.4} cost={cost} rate={acceptance_rate:.3} \
                         proposed={proposed} bad={bad_accepted}"
                    ),
                ));
            }

            temperature *= self.config.temp_reduce;
            let drift = (acceptance_rate - self.config.golden_acceptance_rate).abs();
            let boost = (10.0 / drift).abs();
            extra_moves = if boost.is_finite() {
                (boost as usize).min(self.config.max_extra_moves)
            } else {
                self.config.max_extra_moves
            };

            if acceptance_rate < self.config.min_acceptance_rate
                || temperature < self.config.min_temperature
            {
                break;
            }
        }

        self.summary.final_cost = cost;
        Ok(())
    }

    /// Recomputes the final cost from scratch and returns the run summary.
    pub fn finish(&mut self) -> PlacementSummary {
        let cost = self.recompute_all_paths();
        self.summary.final_cost = cost;
        self.summary.clone()
    }
}

/// Builds a path port from a design pin record.
///
/// For a macro-owned pin the offset is the pin tile relative to the owning
/// template's reference anchor; the current tile is derived from the macro's
/// anchor on the next length calculation. For an exogenous pin the tile is
/// fixed.
fn make_port(pin: &crate::data::PinRecord, design: &PlacerDesign) -> PathPort {
    match pin.inst {
        Some(inst) => {
            let template = design.template(design.instance(inst).template);
            let offset = (
                pin.tile.0 as i32 - template.anchor.0 as i32,
                pin.tile.1 as i32 - template.anchor.1 as i32,
            );
            PathPort {
                makro: Some(HardMacroId::from_raw(inst.as_raw())),
                offset,
                tile: offset,
            }
        }
        None => {
            let tile = (pin.tile.0 as i32, pin.tile.1 as i32);
            PathPort {
                makro: None,
                offset: tile,
                tile,
            }
        }
    }
}
