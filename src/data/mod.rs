pub mod geojson;
pub mod palette;
pub mod point;

pub use geojson::{points_from_geojson_str, points_from_json_str};
pub use palette::{category_color, marker_size, Rgb};
pub use point::GeoPoint;
