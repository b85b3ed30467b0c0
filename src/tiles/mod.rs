pub mod grid;
pub mod source;

// Re-exports for convenience
pub use grid::{tile_zoom, visible_tiles, Tile};
pub use source::{TileCatalog, TileProvider, TileSource};
