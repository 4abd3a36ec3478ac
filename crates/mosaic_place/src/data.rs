//! The placement-facing design model.
//!
//! Defines the input the placer consumes: macro templates (relocatable module
//! footprints), macro instances (the placement units), and nets (driver plus
//! sinks, each pin annotated with its owning instance and tile). The
//! [`PlacerDesign`] is a flat arena structure; the placer reads it to build
//! its internal model and writes final site assignments back through
//! [`place_instance`](PlacerDesign::place_instance).

use crate::ids::{MacroInstId, NetId, TemplateId};
use mosaic_device::{Device, SiteId, SiteType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A relocatable macro template.
///
/// The template describes the physical shape of a pre-implemented module:
/// the compatible anchor site type, a reference anchor tile, and the set of
/// tile offsets (relative to the anchor) the module occupies, covering both
/// instance tiles and the routing-resource tiles its internal wiring touches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroTemplate {
    /// The unique ID of this template.
    pub id: TemplateId,
    /// Template name (e.g., "fir16", "dma_engine").
    pub name: String,
    /// The site type the template's anchor must be placed on.
    pub site_type: SiteType,
    /// The reference anchor tile (row, col); pin tiles are given in this frame.
    pub anchor: (u32, u32),
    /// Distinct (row, col) offsets from the anchor covering every occupied tile.
    pub footprint: Vec<(i32, i32)>,
}

impl MacroTemplate {
    /// Returns the number of distinct tiles the template occupies.
    pub fn tile_size(&self) -> usize {
        self.footprint.len()
    }

    /// Enumerates every site where the template's whole footprint fits the
    /// device: sites of the compatible type whose translated footprint stays
    /// on the grid. Computed once per placement run and cached by the placer.
    pub fn valid_anchor_sites(&self, device: &Device) -> Vec<SiteId> {
        device
            .sites_of_type(self.site_type)
            .into_iter()
            .filter(|&site| {
                let tile = device.site_tile(site);
                self.footprint.iter().all(|&(dr, dc)| {
                    device.in_bounds(tile.row as i32 + dr, tile.col as i32 + dc)
                })
            })
            .collect()
    }
}

/// One relocatable macro instance in the design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroInst {
    /// The unique ID of this instance.
    pub id: MacroInstId,
    /// Instance name (stable, from the design).
    pub name: String,
    /// The template this instance is stamped from.
    pub template: TemplateId,
    /// The committed site assignment (`None` = unplaced).
    pub placement: Option<SiteId>,
}

/// One net endpoint: the owning instance (or none, for a connection that
/// terminates outside any macro) and the tile of the connection point.
///
/// For a pin inside a macro, `tile` is in the owning template's reference
/// frame; for an exogenous pin, it is an absolute device tile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PinRecord {
    /// The macro instance this pin belongs to, if any.
    pub inst: Option<MacroInstId>,
    /// The (row, col) tile of the connection point.
    pub tile: (u32, u32),
}

/// A net in the design: one driver pin and zero or more sink pins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// The unique ID of this net.
    pub id: NetId,
    /// Net name (e.g., "axi_wdata[3]").
    pub name: String,
    /// The driver pin, if the net has one.
    pub source: Option<PinRecord>,
    /// The sink pins.
    pub sinks: Vec<PinRecord>,
}

/// The placement-facing design: templates, instances, and nets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacerDesign {
    /// All macro templates.
    pub templates: Vec<MacroTemplate>,
    /// All macro instances.
    pub instances: Vec<MacroInst>,
    /// All nets.
    pub nets: Vec<Net>,
    /// Auxiliary index: instance name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub inst_by_name: HashMap<String, MacroInstId>,
}

impl PlacerDesign {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
            instances: Vec::new(),
            nets: Vec::new(),
            inst_by_name: HashMap::new(),
        }
    }

    /// Adds a template and returns its ID.
    ///
    /// The footprint is normalized: offsets are sorted and deduplicated.
    pub fn add_template(&mut self, mut template: MacroTemplate) -> TemplateId {
        let id = TemplateId::from_raw(self.templates.len() as u32);
        template.id = id;
        template.footprint.sort_unstable();
        template.footprint.dedup();
        self.templates.push(template);
        id
    }

    /// Adds an instance and returns its ID.
    pub fn add_instance(&mut self, mut inst: MacroInst) -> MacroInstId {
        let id = MacroInstId::from_raw(self.instances.len() as u32);
        inst.id = id;
        self.inst_by_name.insert(inst.name.clone(), id);
        self.instances.push(inst);
        id
    }

    /// Adds a net and returns its ID.
    pub fn add_net(&mut self, mut net: Net) -> NetId {
        let id = NetId::from_raw(self.nets.len() as u32);
        net.id = id;
        self.nets.push(net);
        id
    }

    /// Returns the template with the given ID.
    pub fn template(&self, id: TemplateId) -> &MacroTemplate {
        &self.templates[id.as_raw() as usize]
    }

    /// Returns the instance with the given ID.
    pub fn instance(&self, id: MacroInstId) -> &MacroInst {
        &self.instances[id.as_raw() as usize]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.as_raw() as usize]
    }

    /// Returns the number of instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Commits a site assignment for an instance.
    pub fn place_instance(&mut self, inst: MacroInstId, site: SiteId) {
        self.instances[inst.as_raw() as usize].placement = Some(site);
    }

    /// Returns whether all instances have a committed placement.
    pub fn is_fully_placed(&self) -> bool {
        self.instances.iter().all(|i| i.placement.is_some())
    }

    /// Rebuilds auxiliary name indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.inst_by_name.clear();
        for (i, inst) in self.instances.iter().enumerate() {
            self.inst_by_name
                .insert(inst.name.clone(), MacroInstId::from_raw(i as u32));
        }
    }
}

impl Default for PlacerDesign {
    fn default() -> Self {
        Self::new()
    }
}
