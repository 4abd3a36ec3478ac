//! Shared data types for the device grid model.
//!
//! Defines the structural elements the placement engine sees: tiles (coarse
//! grid positions) and sites (placement locations within tiles). Routing
//! wires and intra-site elements are owned by other parts of the toolkit and
//! do not appear here.

use crate::ids::{SiteId, TileId};
use serde::{Deserialize, Serialize};

/// The functional type of a site.
///
/// Two sites are interchangeable for placement purposes only when their types
/// match and they belong to the same tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteType {
    /// A configurable logic site (LUTs, FFs, carry chains).
    Logic,
    /// A block RAM site.
    Bram,
    /// A DSP multiply-accumulate site.
    Dsp,
    /// An I/O pad site for external pin connections.
    Io,
    /// A clock management site (PLL/MMCM).
    Clock,
}

/// A single tile in the device grid.
///
/// Tiles are the coarse-grained building blocks of the device, arranged in a
/// regular grid addressed by (row, column). Each tile contains zero or more
/// sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// The unique ID of this tile.
    pub id: TileId,
    /// Row index in the device grid (0-based).
    pub row: u32,
    /// Column index in the device grid (0-based).
    pub col: u32,
    /// The sites (placement locations) contained in this tile.
    pub sites: Vec<SiteId>,
}

/// A site (placement location) within a tile.
///
/// Sites carry their own instance coordinates in addition to the owning
/// tile's grid position; the two coordinate systems coincide on uniform
/// fabrics but diverge on devices with multi-site tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// The unique ID of this site.
    pub id: SiteId,
    /// The functional type of this site.
    pub site_type: SiteType,
    /// Instance x coordinate of this site.
    pub x: u32,
    /// Instance y coordinate of this site.
    pub y: u32,
    /// The tile this site belongs to.
    pub tile: TileId,
}
