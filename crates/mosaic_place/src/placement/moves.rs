//! Reversible placement transactions.

use crate::data::PlacerDesign;
use crate::ids::HardMacroId;
use crate::placement::model::HardMacro;
use mosaic_device::{Device, SiteId};
use std::collections::HashMap;

/// A reversible placement transaction: relocates one macro into an empty
/// site, or swaps the temporary anchors of two macros.
///
/// Undo runs the same re-anchoring procedure as a forward move with the
/// directions reversed, so the board state after an undo is identical to the
/// state before the move. The anchor-occupancy map is updated only through
/// [`apply`](Self::apply) and [`undo`](Self::undo).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// The macro being moved.
    pub block0: HardMacroId,
    /// `block0`'s anchor before the move.
    pub old0: SiteId,
    /// `block0`'s anchor after the move.
    pub new0: SiteId,
    /// The displaced macro in a swap, if any.
    pub block1: Option<HardMacroId>,
    /// `block1`'s anchor before the move (equals `new0`).
    pub old1: Option<SiteId>,
    /// `block1`'s anchor after the move (equals `old0`).
    pub new1: Option<SiteId>,
}

impl Move {
    /// A relocation of one macro into an unoccupied site.
    pub fn relocate(block0: HardMacroId, old0: SiteId, new0: SiteId) -> Self {
        Self {
            block0,
            old0,
            new0,
            block1: None,
            old1: None,
            new1: None,
        }
    }

    /// A swap: `block0` moves onto `block1`'s anchor and `block1` moves onto
    /// `block0`'s vacated anchor.
    pub fn swap(block0: HardMacroId, old0: SiteId, new0: SiteId, block1: HardMacroId) -> Self {
        Self {
            block0,
            old0,
            new0,
            block1: Some(block1),
            old1: Some(new0),
            new1: Some(old0),
        }
    }

    /// Applies the move: re-anchors the involved macros and updates the
    /// occupancy map.
    pub fn apply(
        &self,
        macros: &mut [HardMacro],
        occupancy: &mut HashMap<SiteId, HardMacroId>,
        device: &Device,
        design: &PlacerDesign,
    ) {
        occupancy.remove(&self.old0);
        if let Some(old1) = self.old1 {
            occupancy.remove(&old1);
        }
        reanchor(macros, self.block0, self.new0, device, design);
        if let (Some(block1), Some(new1)) = (self.block1, self.new1) {
            reanchor(macros, block1, new1, device, design);
        }
        occupancy.insert(self.new0, self.block0);
        if let (Some(block1), Some(new1)) = (self.block1, self.new1) {
            occupancy.insert(new1, block1);
        }
    }

    /// Undoes the move, restoring both macros' anchors and the occupancy map
    /// to their pre-move state.
    pub fn undo(
        &self,
        macros: &mut [HardMacro],
        occupancy: &mut HashMap<SiteId, HardMacroId>,
        device: &Device,
        design: &PlacerDesign,
    ) {
        occupancy.remove(&self.new0);
        if let Some(new1) = self.new1 {
            occupancy.remove(&new1);
        }
        reanchor(macros, self.block0, self.old0, device, design);
        if let (Some(block1), Some(old1)) = (self.block1, self.old1) {
            reanchor(macros, block1, old1, device, design);
        }
        occupancy.insert(self.old0, self.block0);
        if let (Some(block1), Some(old1)) = (self.block1, self.old1) {
            occupancy.insert(old1, block1);
        }
    }
}

/// Re-anchors one macro through the single shared placement path.
fn reanchor(
    macros: &mut [HardMacro],
    block: HardMacroId,
    site: SiteId,
    device: &Device,
    design: &PlacerDesign,
) {
    let mac = &mut macros[block.as_raw() as usize];
    let footprint = &design.template(mac.template).footprint;
    mac.set_temp_anchor(site, device, footprint);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MacroInst, MacroTemplate, PlacerDesign};
    use crate::ids::{MacroInstId, TemplateId};
    use mosaic_device::SiteType;

    fn setup() -> (Device, PlacerDesign, Vec<HardMacro>) {
        let device = Device::grid(4, 4, SiteType::Logic);
        let mut design = PlacerDesign::new();
        let t = design.add_template(MacroTemplate {
            id: TemplateId::from_raw(0),
            name: "unit".into(),
            site_type: SiteType::Logic,
            anchor: (0, 0),
            footprint: vec![(0, 0)],
        });
        let valid = design.template(t).valid_anchor_sites(&device);
        let mut macros = Vec::new();
        for i in 0..2u32 {
            let inst = design.add_instance(MacroInst {
                id: MacroInstId::from_raw(0),
                name: format!("mac_{i}"),
                template: t,
                placement: None,
            });
            macros.push(HardMacro::new(
                crate::ids::HardMacroId::from_raw(i),
                inst,
                format!("mac_{i}"),
                t,
                valid.clone(),
                1,
            ));
        }
        (device, design, macros)
    }

    fn site_at(device: &Device, row: u32, col: u32) -> SiteId {
        let tile = device.tile_at(row, col).unwrap();
        device.sites_at_tile(tile)[0]
    }

    #[test]
    fn relocate_apply_and_undo() {
        let (device, design, mut macros) = setup();
        let a = site_at(&device, 0, 0);
        let b = site_at(&device, 3, 3);
        macros[0].set_temp_anchor(a, &device, &[(0, 0)]);
        let mut occupancy = HashMap::new();
        occupancy.insert(a, macros[0].id);

        let mv = Move::relocate(macros[0].id, a, b);
        mv.apply(&mut macros, &mut occupancy, &device, &design);
        assert_eq!(macros[0].temp_anchor, Some(b));
        assert_eq!((macros[0].top, macros[0].left), (3, 3));
        assert_eq!(occupancy.get(&b), Some(&macros[0].id));
        assert!(!occupancy.contains_key(&a));

        mv.undo(&mut macros, &mut occupancy, &device, &design);
        assert_eq!(macros[0].temp_anchor, Some(a));
        assert_eq!((macros[0].top, macros[0].left), (0, 0));
        assert_eq!(occupancy.get(&a), Some(&macros[0].id));
        assert!(!occupancy.contains_key(&b));
    }

    #[test]
    fn swap_apply_and_undo() {
        let (device, design, mut macros) = setup();
        let a = site_at(&device, 0, 0);
        let b = site_at(&device, 2, 2);
        macros[0].set_temp_anchor(a, &device, &[(0, 0)]);
        macros[1].set_temp_anchor(b, &device, &[(0, 0)]);
        let mut occupancy = HashMap::new();
        occupancy.insert(a, macros[0].id);
        occupancy.insert(b, macros[1].id);

        let mv = Move::swap(macros[0].id, a, b, macros[1].id);
        mv.apply(&mut macros, &mut occupancy, &device, &design);
        assert_eq!(macros[0].temp_anchor, Some(b));
        assert_eq!(macros[1].temp_anchor, Some(a));
        assert_eq!(occupancy.get(&b), Some(&macros[0].id));
        assert_eq!(occupancy.get(&a), Some(&macros[1].id));
        assert_eq!(occupancy.len(), 2);

        mv.undo(&mut macros, &mut occupancy, &device, &design);
        assert_eq!(macros[0].temp_anchor, Some(a));
        assert_eq!(macros[1].temp_anchor, Some(b));
        assert_eq!(occupancy.get(&a), Some(&macros[0].id));
        assert_eq!(occupancy.get(&b), Some(&macros[1].id));
        assert_eq!(occupancy.len(), 2);
    }
}
