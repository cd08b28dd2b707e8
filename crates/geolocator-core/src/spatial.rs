// crates/geolocator-core/src/spatial.rs

//! # Spatial Index
//!
//! Great-circle proximity queries over any collection exposing
//! [`HasCoordinates`].
//!
//! Points are stored in an R*-tree (via `rstar`) as unit vectors on the
//! sphere. Straight-line (chord) distance between unit vectors grows
//! monotonically with the great-circle angle, so the tree's nearest-neighbour
//! order is the haversine order. Distances handed back to callers are always
//! recomputed with [`haversine`].

use crate::traits::HasCoordinates;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Mean Earth radius used by every distance in this crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Results closer than this (≈0.1 m) are treated as the query point itself.
pub const SELF_EPSILON_KM: f64 = 0.0001;

/// A point coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Cartesian unit vector for this coordinate.
    fn unit_vector(self) -> [f64; 3] {
        let (lat, lon) = (self.lat.to_radians(), self.lon.to_radians());
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

/// Great-circle distance in km between two `(lon, lat)` pairs in degrees.
pub fn haversine(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lon1, lat1, lon2, lat2) = (
        lon1.to_radians(),
        lat1.to_radians(),
        lon2.to_radians(),
        lat2.to_radians(),
    );
    let dlon = lon2 - lon1;
    let dlat = lat2 - lat1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Clamp: rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();
    c * EARTH_RADIUS_KM
}

/// Great-circle distance in km between two points.
pub fn distance_km(a: Point, b: Point) -> f64 {
    haversine(a.lon, a.lat, b.lon, b.lat)
}

/// Distance between two entities, if both carry coordinates.
pub fn distance_between<A: HasCoordinates, B: HasCoordinates>(a: &A, b: &B) -> Option<f64> {
    Some(distance_km(a.point()?, b.point()?))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Slot {
    index: usize,
    point: Point,
}

type Node = GeomWithData<[f64; 3], Slot>;

/// Nearest-neighbour structure over one collection.
///
/// Query results are `(index, distance_km)` pairs where `index` is the
/// position of the entity in the slice the index was built from.
pub struct SpatialIndex {
    tree: RTree<Node>,
    count: usize,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl SpatialIndex {
    /// Builds the index, skipping entries without coordinates.
    pub fn build<T: HasCoordinates>(items: &[T]) -> Self {
        let nodes: Vec<Node> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let point = item.point()?;
                Some(GeomWithData::new(point.unit_vector(), Slot { index, point }))
            })
            .collect();
        let count = nodes.len();
        Self {
            tree: RTree::bulk_load(nodes),
            count,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The `n` closest entries to `point`, nearest first.
    ///
    /// One extra neighbour is fetched so that the query point's own entry (or
    /// an exact coordinate duplicate) can be dropped without shrinking the
    /// result. The result holds at most `n` entries.
    pub fn k_nearest(&self, point: Point, n: usize) -> Vec<(usize, f64)> {
        if n == 0 {
            return Vec::new();
        }
        let query = point.unit_vector();
        let mut hits: Vec<(usize, f64)> = self
            .tree
            .nearest_neighbor_iter(&query)
            .take(n + 1)
            .map(|node| (node.data.index, distance_km(point, node.data.point)))
            .filter(|(_, d)| *d >= SELF_EPSILON_KM)
            .collect();
        sort_by_distance(&mut hits);
        hits.truncate(n);
        hits
    }

    /// Every entry within `radius_km` of `point`, nearest first.
    pub fn within_radius(&self, point: Point, radius_km: f64) -> Vec<(usize, f64)> {
        if radius_km <= 0.0 || !radius_km.is_finite() {
            return Vec::new();
        }
        let angle = (radius_km / EARTH_RADIUS_KM).min(std::f64::consts::PI);
        let chord = 2.0 * (angle / 2.0).sin();
        let query = point.unit_vector();
        let mut hits: Vec<(usize, f64)> = self
            .tree
            .locate_within_distance(query, chord * chord + 1e-12)
            .map(|node| (node.data.index, distance_km(point, node.data.point)))
            .filter(|(_, d)| *d >= SELF_EPSILON_KM && *d <= radius_km)
            .collect();
        sort_by_distance(&mut hits);
        hits
    }
}

fn sort_by_distance(hits: &mut [(usize, f64)]) {
    hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
}
