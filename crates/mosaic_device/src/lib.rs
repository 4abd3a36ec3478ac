//! Physical device grid model for the Mosaic placement toolkit.
//!
//! This crate provides the [`Device`] grid that the placement engine consumes
//! through a narrow interface: tiles arranged in a row/column grid, sites
//! (placement locations) belonging to tiles, and the queries the placer needs
//! (site/tile lookup, type-compatible site enumeration, tile distances).
//!
//! # Usage
//!
//! Real device databases are built elsewhere in the toolkit; tests and small
//! host tools use the synthetic uniform grid builder:
//!
//! ```
//! use mosaic_device::{Device, SiteType};
//!
//! let device = Device::grid(8, 8, SiteType::Logic);
//! assert_eq!(device.dimensions(), (8, 8));
//! assert_eq!(device.site_count(), 64);
//! ```

#![warn(missing_docs)]

pub mod device;
pub mod ids;
pub mod types;

pub use device::Device;
pub use ids::{SiteId, TileId};
pub use types::{Site, SiteType, Tile};
