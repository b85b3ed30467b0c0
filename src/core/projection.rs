//! Spherical Web Mercator projection between geographic coordinates and the
//! continuous world pixel space of a zoom level.

use crate::core::geo::{LatLng, Point};
use std::f64::consts::PI;

/// Edge length of the square world, in pixels, at `zoom`
pub fn world_size(zoom: f64, tile_size: f64) -> f64 {
    2_f64.powf(zoom) * tile_size
}

/// Degrees of longitude covered by one pixel at `zoom`
pub fn degrees_per_pixel(zoom: f64, tile_size: f64) -> f64 {
    360.0 / world_size(zoom, tile_size)
}

/// Projects a coordinate to world pixels.
///
/// Valid for `|lat| < 85.05`; callers clamp latitude first. Longitude is not
/// wrapped, values past ±180 land left or right of the world.
pub fn pixel_for(lat: f64, lng: f64, zoom: f64, tile_size: f64) -> Point {
    let size = world_size(zoom, tile_size);
    let x = (lng + 180.0) / 360.0 * size;
    let lat_rad = lat.to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * size;
    Point::new(x, y)
}

/// [`pixel_for`] taking a [`LatLng`]
pub fn project(lat_lng: &LatLng, zoom: f64, tile_size: f64) -> Point {
    pixel_for(lat_lng.lat, lat_lng.lng, zoom, tile_size)
}

/// Inverse of [`pixel_for`]
pub fn lat_lng_for(pixel: &Point, zoom: f64, tile_size: f64) -> LatLng {
    let size = world_size(zoom, tile_size);
    let lng = pixel.x / size * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * pixel.y / size)).sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: f64 = 256.0;

    #[test]
    fn test_origin_projects_to_world_center() {
        let p = pixel_for(0.0, 0.0, 0.0, TILE);
        assert!((p.x - 128.0).abs() < 1e-9);
        assert!((p.y - 128.0).abs() < 1e-9);

        let p = pixel_for(0.0, 0.0, 2.0, TILE);
        assert!((p.x - 512.0).abs() < 1e-9);
        assert!((p.y - 512.0).abs() < 1e-9);
    }

    #[test]
    fn test_finite_across_supported_range() {
        for zoom in 1..=10 {
            let mut lat = -84.99;
            while lat < 85.0 {
                let mut lng = -180.0;
                while lng <= 180.0 {
                    let p = pixel_for(lat, lng, zoom as f64, TILE);
                    assert!(p.is_finite(), "non-finite at {lat},{lng},{zoom}");
                    lng += 7.5;
                }
                lat += 4.25;
            }
        }
        assert!(pixel_for(85.04, 179.9, 10.0, TILE).is_finite());
        assert!(pixel_for(-85.04, -180.0, 10.0, TILE).is_finite());
    }

    #[test]
    fn test_monotonic_in_longitude() {
        for lat in [-60.0, 0.0, 45.0] {
            let mut previous = f64::NEG_INFINITY;
            let mut lng = -180.0;
            while lng <= 180.0 {
                let x = pixel_for(lat, lng, 3.0, TILE).x;
                assert!(x > previous);
                previous = x;
                lng += 0.5;
            }
        }
    }

    #[test]
    fn test_north_is_up() {
        let north = pixel_for(60.0, 0.0, 2.0, TILE);
        let south = pixel_for(-60.0, 0.0, 2.0, TILE);
        assert!(north.y < south.y);
    }

    #[test]
    fn test_inverse_projection() {
        let original = LatLng::new(-25.2744, 133.7751);
        let pixel = project(&original, 4.5, TILE);
        let back = lat_lng_for(&pixel, 4.5, TILE);
        assert!((back.lat - original.lat).abs() < 1e-9);
        assert!((back.lng - original.lng).abs() < 1e-9);
    }

    #[test]
    fn test_degrees_per_pixel() {
        assert!((degrees_per_pixel(0.0, TILE) - 360.0 / 256.0).abs() < 1e-12);
        assert!((degrees_per_pixel(1.0, TILE) - 360.0 / 512.0).abs() < 1e-12);
    }
}
