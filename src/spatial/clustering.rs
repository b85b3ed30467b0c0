use crate::core::{
    camera::Camera,
    config::ClusteringConfig,
    geo::{LatLng, Point},
};
use crate::data::point::GeoPoint;
use crate::prelude::HashMap;
use crate::spatial::culling::Culling;

/// Points sharing a rounded-coordinate bucket at the current zoom.
///
/// Clusters are rebuilt on every render and carry no identity between
/// renders. `members` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<'a> {
    /// Members in input order
    pub members: Vec<&'a GeoPoint>,
    /// Mean coordinate of the members
    pub centroid: LatLng,
    /// Most common category, earliest seen on a tie
    pub dominant_category: String,
    /// Centroid position relative to the viewport's top-left
    pub screen: Point,
}

impl<'a> Cluster<'a> {
    /// Get the number of points in the cluster
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Check if this is a single-point cluster
    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }

    /// First member in input order
    pub fn first(&self) -> &'a GeoPoint {
        self.members[0]
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|p| p.id == id)
    }
}

struct Bucket<'a> {
    members: Vec<&'a GeoPoint>,
    lat_sum: f64,
    lng_sum: f64,
}

/// Groups the points that have a coordinate into grid buckets and keeps the
/// clusters whose centroid lands inside the padded viewport.
///
/// The grid edge is [`ClusteringConfig::grid_size`] degrees at the camera's
/// zoom. Buckets and categories are tracked in first-seen order, so equal
/// input yields equal output.
pub fn cluster_points<'a, I>(points: I, camera: &Camera, config: &ClusteringConfig) -> Vec<Cluster<'a>>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let grid = config.grid_size(camera.zoom());
    let mut index: HashMap<(i64, i64), usize> = HashMap::default();
    let mut buckets: Vec<Bucket<'a>> = Vec::new();

    for point in points {
        let Some(position) = point.position() else {
            continue;
        };
        let key = (
            (position.lat / grid).round() as i64,
            (position.lng / grid).round() as i64,
        );
        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(Bucket {
                members: Vec::new(),
                lat_sum: 0.0,
                lng_sum: 0.0,
            });
            buckets.len() - 1
        });
        let bucket = &mut buckets[slot];
        bucket.members.push(point);
        bucket.lat_sum += position.lat;
        bucket.lng_sum += position.lng;
    }

    let viewport = Culling::padded_viewport(&camera.size(), config.padding);
    let clusters: Vec<Cluster<'a>> = buckets
        .into_iter()
        .filter_map(|bucket| {
            let n = bucket.members.len() as f64;
            let centroid = LatLng::new(bucket.lat_sum / n, bucket.lng_sum / n);
            let screen = camera.lat_lng_to_screen(&centroid);
            if !Culling::point_visible(&viewport, &screen) {
                return None;
            }
            Some(Cluster {
                dominant_category: dominant_category(&bucket.members),
                members: bucket.members,
                centroid,
                screen,
            })
        })
        .collect();

    log::trace!(
        "{} clusters at zoom {} (grid {grid} deg)",
        clusters.len(),
        camera.zoom()
    );
    clusters
}

/// One cluster per point with a coordinate, culled like [`cluster_points`]
pub fn unclustered<'a, I>(points: I, camera: &Camera, config: &ClusteringConfig) -> Vec<Cluster<'a>>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let viewport = Culling::padded_viewport(&camera.size(), config.padding);
    points
        .into_iter()
        .filter_map(|point| {
            let position = point.position()?;
            let screen = camera.lat_lng_to_screen(&position);
            Culling::point_visible(&viewport, &screen).then(|| Cluster {
                members: vec![point],
                centroid: position,
                dominant_category: point.category.clone(),
                screen,
            })
        })
        .collect()
}

fn dominant_category(members: &[&GeoPoint]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for member in members {
        match counts.iter_mut().find(|(category, _)| *category == member.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((member.category.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (category, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((category, count));
        }
    }
    best.map(|(category, _)| category.to_string())
        .unwrap_or_default()
}
