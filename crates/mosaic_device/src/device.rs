//! The device grid and its placement-facing queries.

use crate::ids::{SiteId, TileId};
use crate::types::{Site, SiteType, Tile};
use serde::{Deserialize, Serialize};

/// A physical device grid: tiles in row-major order plus their sites.
///
/// The placement engine treats this as read-only geometry. All lookups by ID
/// are O(1) arena indexing; `tile_at` is O(1) arithmetic on the row-major
/// layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    rows: u32,
    cols: u32,
    tiles: Vec<Tile>,
    sites: Vec<Site>,
}

impl Device {
    /// Creates an empty device with the given grid dimensions.
    ///
    /// Tiles are allocated immediately (row-major, no sites); sites are added
    /// with [`add_site`](Self::add_site).
    pub fn new(rows: u32, cols: u32) -> Self {
        let mut tiles = Vec::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            for col in 0..cols {
                tiles.push(Tile {
                    id: TileId::from_raw(row * cols + col),
                    row,
                    col,
                    sites: Vec::new(),
                });
            }
        }
        Self {
            rows,
            cols,
            tiles,
            sites: Vec::new(),
        }
    }

    /// Builds a uniform synthetic fabric with one site of `site_type` per tile.
    ///
    /// The site's instance coordinates mirror the tile's (column, row). Used
    /// by tests and by callers that do not have a real device database.
    pub fn grid(rows: u32, cols: u32, site_type: SiteType) -> Self {
        let mut device = Self::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                let tile = TileId::from_raw(row * cols + col);
                device.add_site(site_type, col, row, tile);
            }
        }
        device
    }

    /// Adds a site to the given tile and returns its ID.
    pub fn add_site(&mut self, site_type: SiteType, x: u32, y: u32, tile: TileId) -> SiteId {
        let id = SiteId::from_raw(self.sites.len() as u32);
        self.sites.push(Site {
            id,
            site_type,
            x,
            y,
            tile,
        });
        self.tiles[tile.as_raw() as usize].sites.push(id);
        id
    }

    /// Returns the grid dimensions as (rows, columns).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    /// Returns the number of sites on the device.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Returns the site with the given ID.
    pub fn site(&self, id: SiteId) -> &Site {
        &self.sites[id.as_raw() as usize]
    }

    /// Returns the tile with the given ID.
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id.as_raw() as usize]
    }

    /// Returns the tile containing the given site.
    pub fn site_tile(&self, id: SiteId) -> &Tile {
        self.tile(self.site(id).tile)
    }

    /// Returns the tile at the given grid coordinates, if it exists.
    pub fn tile_at(&self, row: u32, col: u32) -> Option<TileId> {
        if row < self.rows && col < self.cols {
            Some(TileId::from_raw(row * self.cols + col))
        } else {
            None
        }
    }

    /// Returns whether signed grid coordinates fall inside the device.
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as u32) < self.rows && (col as u32) < self.cols
    }

    /// Returns all sites of the given type, in ID order.
    pub fn sites_of_type(&self, site_type: SiteType) -> Vec<SiteId> {
        self.sites
            .iter()
            .filter(|s| s.site_type == site_type)
            .map(|s| s.id)
            .collect()
    }

    /// Returns the sites contained in the given tile.
    pub fn sites_at_tile(&self, tile: TileId) -> &[SiteId] {
        &self.tiles[tile.as_raw() as usize].sites
    }

    /// Returns whether two sites are interchangeable for placement.
    ///
    /// Interchangeable means same functional type and same owning tile.
    pub fn interchangeable(&self, a: SiteId, b: SiteId) -> bool {
        let sa = self.site(a);
        let sb = self.site(b);
        sa.site_type == sb.site_type && sa.tile == sb.tile
    }

    /// Returns the Manhattan distance between two tiles in grid units.
    pub fn tile_distance(&self, a: TileId, b: TileId) -> u32 {
        let ta = self.tile(a);
        let tb = self.tile(b);
        ta.row.abs_diff(tb.row) + ta.col.abs_diff(tb.col)
    }
}
