//! Which background tiles cover the viewport, and where they go on screen.

use crate::core::camera::CameraState;
use crate::core::geo::{Point, TileCoord};
use crate::core::projection;
use crate::prelude::HashSet;
use serde::{Deserialize, Serialize};

/// Deepest tile level requested from providers
pub const MAX_TILE_ZOOM: u8 = 22;

/// One background tile placed on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: TileCoord,
    /// Top-left corner relative to the viewport
    pub screen: Point,
    /// Edge length on screen; differs from the tile size at fractional zoom
    pub size: f64,
}

/// Integer tile level used for a (possibly fractional) camera zoom
pub fn tile_zoom(zoom: f64) -> u8 {
    zoom.round().clamp(0.0, MAX_TILE_ZOOM as f64) as u8
}

/// Tiles covering the viewport plus one tile of padding on each edge.
///
/// Column indices wrap around the antimeridian; rows outside the world are
/// skipped. Each `(x, y, z)` appears at most once. Order is unspecified.
pub fn visible_tiles(camera: &CameraState, tile_size: f64) -> Vec<Tile> {
    let size = camera.size;
    if size.x <= 0.0 || size.y <= 0.0 || tile_size <= 0.0 {
        return Vec::new();
    }

    let z = tile_zoom(camera.zoom);
    let edge = tile_size * 2_f64.powf(camera.zoom - z as f64);
    let center_pixel = projection::project(&camera.center, z as f64, tile_size);
    let center_tile_x = (center_pixel.x / tile_size).floor() as i64;
    let center_tile_y = (center_pixel.y / tile_size).floor() as i64;

    let tiles_x = (size.x / edge).ceil() as i64 + 2;
    let tiles_y = (size.y / edge).ceil() as i64 + 2;

    let mut seen = HashSet::default();
    let mut tiles = Vec::with_capacity(((tiles_x + 1) * (tiles_y + 1)) as usize);

    for dx in -(tiles_x / 2)..=(tiles_x + 1) / 2 {
        for dy in -(tiles_y / 2)..=(tiles_y + 1) / 2 {
            let ix = center_tile_x + dx;
            let iy = center_tile_y + dy;
            let Some(coord) = TileCoord::wrapped(ix, iy, z) else {
                continue;
            };
            if !seen.insert(coord) {
                continue;
            }

            let screen = Point::new(
                size.x / 2.0 + (ix as f64 - center_pixel.x / tile_size) * edge,
                size.y / 2.0 + (iy as f64 - center_pixel.y / tile_size) * edge,
            );
            tiles.push(Tile {
                coord,
                screen,
                size: edge,
            });
        }
    }

    log::trace!("{} tiles visible at z{}", tiles.len(), z);
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn state(lat: f64, lng: f64, zoom: f64, width: f64, height: f64) -> CameraState {
        CameraState {
            center: LatLng::new(lat, lng),
            zoom,
            size: Point::new(width, height),
        }
    }

    fn assert_in_range(tiles: &[Tile]) {
        for tile in tiles {
            let n = 1_u32 << tile.coord.z;
            assert!(tile.coord.x < n, "x out of range: {:?}", tile.coord);
            assert!(tile.coord.y < n, "y out of range: {:?}", tile.coord);
        }
    }

    #[test]
    fn test_tiles_cover_viewport() {
        let tiles = visible_tiles(&state(0.0, 0.0, 4.0, 800.0, 600.0), 256.0);
        assert!(!tiles.is_empty());
        assert_in_range(&tiles);

        let covers = |x: f64, y: f64| {
            tiles.iter().any(|t| {
                x >= t.screen.x && x < t.screen.x + t.size && y >= t.screen.y && y < t.screen.y + t.size
            })
        };
        for &(x, y) in &[(0.0, 0.0), (799.0, 0.0), (0.0, 599.0), (799.0, 599.0), (400.0, 300.0)] {
            assert!(covers(x, y), "pixel {x},{y} uncovered");
        }
    }

    #[test]
    fn test_center_tile_placement() {
        let tiles = visible_tiles(&state(0.0, 0.0, 2.0, 800.0, 600.0), 256.0);
        // The world is 1024px at z2, so tile (2, 2) starts exactly at the center.
        let tile = tiles
            .iter()
            .find(|t| t.coord == TileCoord::new(2, 2, 2))
            .unwrap();
        assert_eq!(tile.screen, Point::new(400.0, 300.0));
        assert_eq!(tile.size, 256.0);
    }

    #[test]
    fn test_rows_dropped_and_columns_wrapped() {
        let tiles = visible_tiles(&state(84.0, 179.0, 3.0, 1024.0, 768.0), 256.0);
        assert_in_range(&tiles);
        assert!(tiles.iter().any(|t| t.coord.x == 0));
        assert!(tiles.iter().any(|t| t.coord.x == 7));
        assert!(tiles.iter().any(|t| t.coord.y == 0));
    }

    #[test]
    fn test_no_duplicates_when_viewport_wider_than_world() {
        let tiles = visible_tiles(&state(0.0, 0.0, 1.0, 2000.0, 1200.0), 256.0);
        assert_in_range(&tiles);
        let mut coords: Vec<_> = tiles.iter().map(|t| t.coord).collect();
        let total = coords.len();
        coords.sort_by_key(|c| (c.x, c.y));
        coords.dedup();
        assert_eq!(coords.len(), total);
        assert_eq!(total, 4);
    }

    #[test]
    fn test_fractional_zoom_scales_tiles() {
        let tiles = visible_tiles(&state(10.0, 20.0, 2.5, 800.0, 600.0), 256.0);
        assert_in_range(&tiles);
        assert!(tiles.iter().all(|t| t.coord.z == 3));
        let expected = 256.0 * 2_f64.powf(-0.5);
        assert!(tiles.iter().all(|t| (t.size - expected).abs() < 1e-9));
    }

    #[test]
    fn test_empty_viewport() {
        assert!(visible_tiles(&state(0.0, 0.0, 2.0, 0.0, 600.0), 256.0).is_empty());
    }
}
