pub mod clustering;
pub mod culling;

pub use clustering::{cluster_points, unclustered, Cluster};
pub use culling::Culling;
