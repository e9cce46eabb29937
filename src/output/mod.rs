//! Documents written next to the videos: catalog, per-asset meta and VTT tracks

pub mod catalog;
pub mod meta;
pub mod vtt;

pub use catalog::{mosaic_dim, Catalog, CatalogStats};
pub use meta::MetaDocument;
