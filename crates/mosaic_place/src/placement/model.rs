//! The in-memory placement model: hard macros and the paths between them.
//!
//! [`HardMacro`] wraps a design instance with the placement-only state the
//! annealer mutates: the temporary anchor site, the derived bounding box, and
//! back-references to every incident [`Path`]. Both are constructed once per
//! placement run; only their mutable fields change afterwards.

use crate::ids::{HardMacroId, MacroInstId, PathId, TemplateId};
use mosaic_device::{Device, SiteId};
use std::collections::HashSet;

/// Bounding-box offsets from a macro's anchor tile to its extremal occupied
/// tiles. Computed once, lazily, the first time the macro is anchored.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoxRefs {
    top: i32,
    bottom: i32,
    left: i32,
    right: i32,
}

impl BoxRefs {
    fn from_footprint(footprint: &[(i32, i32)]) -> Self {
        let mut refs = Self {
            top: 0,
            bottom: 0,
            left: 0,
            right: 0,
        };
        for &(dr, dc) in footprint {
            refs.top = refs.top.min(dr);
            refs.bottom = refs.bottom.max(dr);
            refs.left = refs.left.min(dc);
            refs.right = refs.right.max(dc);
        }
        refs
    }
}

/// One placement unit: a rigid, relocatable macro.
///
/// The committed anchor lives in the design; during search only
/// `temp_anchor` moves. The absolute bounding box (`top`, `bottom`, `left`,
/// `right`, in row/column units) is recomputed together with every re-anchor
/// so the two can never disagree.
#[derive(Debug, Clone)]
pub struct HardMacro {
    /// The unique ID of this macro in the placement model.
    pub id: HardMacroId,
    /// The design instance this macro places.
    pub inst: MacroInstId,
    /// Macro name (stable, from the design).
    pub name: String,
    /// The template the instance is stamped from.
    pub template: TemplateId,
    /// Every site where this macro's template fits the device.
    pub valid_placements: Vec<SiteId>,
    /// The current working placement during annealing.
    pub temp_anchor: Option<SiteId>,
    /// Top (minimum row) of the absolute bounding box.
    pub top: i32,
    /// Bottom (maximum row) of the absolute bounding box.
    pub bottom: i32,
    /// Left (minimum column) of the absolute bounding box.
    pub left: i32,
    /// Right (maximum column) of the absolute bounding box.
    pub right: i32,
    /// Paths incident on this macro.
    pub connected_paths: Vec<PathId>,
    /// Distinct tiles the macro occupies (instances plus routing).
    pub tile_size: usize,
    refs: Option<BoxRefs>,
    valid_set: HashSet<SiteId>,
}

impl HardMacro {
    /// Creates an unanchored macro with the given valid-placement set.
    pub fn new(
        id: HardMacroId,
        inst: MacroInstId,
        name: String,
        template: TemplateId,
        valid_placements: Vec<SiteId>,
        tile_size: usize,
    ) -> Self {
        let valid_set = valid_placements.iter().copied().collect();
        Self {
            id,
            inst,
            name,
            template,
            valid_placements,
            temp_anchor: None,
            top: 0,
            bottom: 0,
            left: 0,
            right: 0,
            connected_paths: Vec::new(),
            tile_size,
            refs: None,
            valid_set,
        }
    }

    /// Re-anchors the macro on `site` and recomputes the absolute bounding
    /// box from the anchor tile and the lazily computed reference offsets.
    pub fn set_temp_anchor(&mut self, site: SiteId, device: &Device, footprint: &[(i32, i32)]) {
        let tile = device.site_tile(site);
        let refs = match self.refs {
            Some(refs) => refs,
            None => {
                let refs = BoxRefs::from_footprint(footprint);
                self.refs = Some(refs);
                refs
            }
        };
        self.top = tile.row as i32 + refs.top;
        self.bottom = tile.row as i32 + refs.bottom;
        self.left = tile.col as i32 + refs.left;
        self.right = tile.col as i32 + refs.right;
        self.temp_anchor = Some(site);
    }

    /// Returns whether `site` is a member of the valid-placement set.
    pub fn can_anchor(&self, site: SiteId) -> bool {
        self.valid_set.contains(&site)
    }

    /// Returns whether this macro's bounding box conflicts with another's
    /// within the halo margin.
    ///
    /// Four-way short-circuit separation test; called on every move proposal,
    /// so it must stay allocation-free.
    pub fn conflicts_with(&self, other: &HardMacro, halo: i32) -> bool {
        !(self.left > other.right + halo
            || other.left > self.right + halo
            || self.top > other.bottom + halo
            || other.top > self.bottom + halo)
    }
}

/// One endpoint of a path.
#[derive(Debug, Clone, Copy)]
pub struct PathPort {
    /// The macro this port belongs to, or `None` for an exogenous endpoint.
    pub makro: Option<HardMacroId>,
    /// Offset of the port tile from the owning macro's anchor tile; for an
    /// exogenous port, the absolute tile itself.
    pub offset: (i32, i32),
    /// The current derived (row, col) tile of this port.
    pub tile: (i32, i32),
}

/// A multi-terminal net crossing macro boundaries: a source port plus one or
/// more sink ports, with an incrementally recomputable scalar length.
///
/// `length` is stale immediately after any incident macro moves, until
/// [`calculate_length`](Self::calculate_length) runs again; the placer never
/// reads a stale length into a cost decision.
#[derive(Debug, Clone)]
pub struct Path {
    /// The unique ID of this path.
    pub id: PathId,
    /// Name of the underlying net.
    pub name: String,
    /// The ports; index 0 is the source.
    pub ports: Vec<PathPort>,
    /// The last computed length.
    pub length: u32,
}

impl Path {
    /// Recomputes every port's current tile from its owning macro's anchor,
    /// then recomputes `length` as the sum of Manhattan distances from the
    /// source port to each sink port.
    pub fn calculate_length(&mut self, macros: &[HardMacro], device: &Device) -> u32 {
        for port in &mut self.ports {
            if let Some(id) = port.makro {
                if let Some(anchor) = macros[id.as_raw() as usize].temp_anchor {
                    let tile = device.site_tile(anchor);
                    port.tile = (
                        tile.row as i32 + port.offset.0,
                        tile.col as i32 + port.offset.1,
                    );
                }
            }
        }
        let mut length = 0u32;
        if let Some((source, sinks)) = self.ports.split_first() {
            for sink in sinks {
                length += source.tile.0.abs_diff(sink.tile.0) + source.tile.1.abs_diff(sink.tile.1);
            }
        }
        self.length = length;
        length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_device::SiteType;

    fn device_4x4() -> Device {
        Device::grid(4, 4, SiteType::Logic)
    }

    fn site_at(device: &Device, row: u32, col: u32) -> SiteId {
        let tile = device.tile_at(row, col).unwrap();
        device.sites_at_tile(tile)[0]
    }

    fn test_macro(id: u32, valid: Vec<SiteId>, tile_size: usize) -> HardMacro {
        HardMacro::new(
            HardMacroId::from_raw(id),
            MacroInstId::from_raw(id),
            format!("mac_{id}"),
            TemplateId::from_raw(0),
            valid,
            tile_size,
        )
    }

    #[test]
    fn bounding_box_tracks_anchor() {
        let device = device_4x4();
        let footprint = [(0, 0), (0, 1), (1, 0), (1, 1)];
        let mut mac = test_macro(0, device.sites_of_type(SiteType::Logic), 4);

        mac.set_temp_anchor(site_at(&device, 1, 1), &device, &footprint);
        assert_eq!((mac.top, mac.bottom, mac.left, mac.right), (1, 2, 1, 2));

        mac.set_temp_anchor(site_at(&device, 2, 0), &device, &footprint);
        assert_eq!((mac.top, mac.bottom, mac.left, mac.right), (2, 3, 0, 1));
    }

    #[test]
    fn bounding_box_with_negative_offsets() {
        let device = device_4x4();
        let footprint = [(-1, 0), (0, 0), (0, 2)];
        let mut mac = test_macro(0, device.sites_of_type(SiteType::Logic), 3);
        mac.set_temp_anchor(site_at(&device, 2, 1), &device, &footprint);
        assert_eq!((mac.top, mac.bottom, mac.left, mac.right), (1, 2, 1, 3));
    }

    #[test]
    fn can_anchor_membership() {
        let device = device_4x4();
        let valid = vec![site_at(&device, 0, 0), site_at(&device, 1, 1)];
        let mac = test_macro(0, valid, 1);
        assert!(mac.can_anchor(site_at(&device, 0, 0)));
        assert!(!mac.can_anchor(site_at(&device, 3, 3)));
    }

    #[test]
    fn conflict_within_halo() {
        let device = device_4x4();
        let footprint = [(0, 0)];
        let mut a = test_macro(0, device.sites_of_type(SiteType::Logic), 1);
        let mut b = test_macro(1, device.sites_of_type(SiteType::Logic), 1);

        a.set_temp_anchor(site_at(&device, 0, 0), &device, &footprint);

        // Adjacent tile: inside the 1-tile halo.
        b.set_temp_anchor(site_at(&device, 0, 1), &device, &footprint);
        assert!(a.conflicts_with(&b, 1));
        assert!(b.conflicts_with(&a, 1));

        // One tile of clearance: disjoint.
        b.set_temp_anchor(site_at(&device, 0, 2), &device, &footprint);
        assert!(!a.conflicts_with(&b, 1));
        assert!(!b.conflicts_with(&a, 1));

        // Diagonal with clearance in both axes.
        b.set_temp_anchor(site_at(&device, 2, 2), &device, &footprint);
        assert!(!a.conflicts_with(&b, 1));
    }

    #[test]
    fn conflict_zero_halo_requires_overlap() {
        let device = device_4x4();
        let footprint = [(0, 0), (0, 1)];
        let mut a = test_macro(0, device.sites_of_type(SiteType::Logic), 2);
        let mut b = test_macro(1, device.sites_of_type(SiteType::Logic), 2);
        a.set_temp_anchor(site_at(&device, 0, 0), &device, &footprint);
        b.set_temp_anchor(site_at(&device, 0, 1), &device, &footprint);
        // Boxes [0,1] and [1,2] share column 1.
        assert!(a.conflicts_with(&b, 0));
        b.set_temp_anchor(site_at(&device, 0, 2), &device, &footprint);
        assert!(!a.conflicts_with(&b, 0));
    }

    #[test]
    fn path_length_follows_macro() {
        let device = device_4x4();
        let footprint = [(0, 0)];
        let mut mac = test_macro(0, device.sites_of_type(SiteType::Logic), 1);
        mac.set_temp_anchor(site_at(&device, 0, 0), &device, &footprint);
        let macros = vec![mac];

        let mut path = Path {
            id: PathId::from_raw(0),
            name: "n".into(),
            ports: vec![
                PathPort {
                    makro: Some(HardMacroId::from_raw(0)),
                    offset: (0, 0),
                    tile: (0, 0),
                },
                PathPort {
                    makro: None,
                    offset: (3, 3),
                    tile: (3, 3),
                },
            ],
            length: 0,
        };

        assert_eq!(path.calculate_length(&macros, &device), 6);

        let mut macros = macros;
        macros[0].set_temp_anchor(site_at(&device, 2, 3), &device, &footprint);
        assert_eq!(path.calculate_length(&macros, &device), 1);
        assert_eq!(path.length, 1);
    }

    #[test]
    fn path_length_multiple_sinks() {
        let device = device_4x4();
        let path_ports = vec![
            PathPort {
                makro: None,
                offset: (1, 1),
                tile: (1, 1),
            },
            PathPort {
                makro: None,
                offset: (0, 0),
                tile: (0, 0),
            },
            PathPort {
                makro: None,
                offset: (3, 2),
                tile: (3, 2),
            },
        ];
        let mut path = Path {
            id: PathId::from_raw(0),
            name: "fanout".into(),
            ports: path_ports,
            length: 0,
        };
        // (1,1)->(0,0) = 2, (1,1)->(3,2) = 3
        assert_eq!(path.calculate_length(&[], &device), 5);
    }

    #[test]
    fn port_offset_tracks_anchor_relative_pin() {
        let device = device_4x4();
        let footprint = [(0, 0), (0, 1)];
        let mut mac = test_macro(0, device.sites_of_type(SiteType::Logic), 2);
        mac.set_temp_anchor(site_at(&device, 1, 0), &device, &footprint);
        let macros = vec![mac];

        // Pin one column right of the anchor.
        let mut path = Path {
            id: PathId::from_raw(0),
            name: "n".into(),
            ports: vec![
                PathPort {
                    makro: Some(HardMacroId::from_raw(0)),
                    offset: (0, 1),
                    tile: (0, 0),
                },
                PathPort {
                    makro: None,
                    offset: (1, 1),
                    tile: (1, 1),
                },
            ],
            length: 0,
        };
        path.calculate_length(&macros, &device);
        assert_eq!(path.ports[0].tile, (1, 1));
        assert_eq!(path.length, 0);
    }
}
