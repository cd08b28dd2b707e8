// crates/geolocator-core/src/repository.rs

//! # Entity Repositories
//!
//! A `Repository<T>` owns one collection (countries, regions or cities) in
//! source order and keeps the lookup maps over it:
//!
//! * identifier → index (first occurrence wins, later duplicates counted)
//! * exact label → indices (names plus alternate labels)
//! * folded label → indices (built on first folded query)
//! * ISO code → indices (full code and, for composite codes, the suffix)
//! * spatial index (built on first proximity query)
//!
//! Derived structures are dropped and rebuilt by [`Repository::reload`].

use crate::config::LookupMode;
use crate::spatial::{Point, SpatialIndex};
use crate::text::fold_key;
use crate::traits::Entity;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use tracing::warn;

pub struct Repository<T: Entity> {
    items: Vec<T>,
    by_id: HashMap<String, usize>,
    duplicate_ids: Vec<String>,
    by_label: HashMap<String, Vec<usize>>,
    by_iso: HashMap<String, Vec<usize>>,
    by_folded: OnceCell<HashMap<String, Vec<usize>>>,
    spatial: OnceCell<SpatialIndex>,
}

impl<T: Entity> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("kind", &T::KIND)
            .field("len", &self.items.len())
            .field("duplicates", &self.duplicate_ids.len())
            .finish_non_exhaustive()
    }
}

impl<T: Entity> Default for Repository<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(items: Vec<T>) -> Self {
        let mut repo = Self {
            items: Vec::new(),
            by_id: HashMap::new(),
            duplicate_ids: Vec::new(),
            by_label: HashMap::new(),
            by_iso: HashMap::new(),
            by_folded: OnceCell::new(),
            spatial: OnceCell::new(),
        };
        repo.reload(items);
        repo
    }

    /// Replaces the collection and rebuilds every index.
    pub fn reload(&mut self, items: Vec<T>) {
        self.items = items;
        self.by_id.clear();
        self.duplicate_ids.clear();
        self.by_label.clear();
        self.by_iso.clear();
        self.by_folded = OnceCell::new();
        self.spatial = OnceCell::new();

        for (idx, item) in self.items.iter().enumerate() {
            if self.by_id.contains_key(item.id()) {
                self.duplicate_ids.push(item.id().to_string());
            } else {
                self.by_id.insert(item.id().to_string(), idx);
            }

            push_unique(&mut self.by_label, item.name_str().to_string(), idx);
            for label in item.labels() {
                push_unique(&mut self.by_label, label.clone(), idx);
            }

            if let Some(iso) = item.iso() {
                push_unique(&mut self.by_iso, iso.to_string(), idx);
                if let Some((_, suffix)) = iso.split_once('-') {
                    push_unique(&mut self.by_iso, suffix.to_string(), idx);
                }
            }
        }

        if !self.duplicate_ids.is_empty() {
            warn!(
                kind = %T::KIND,
                duplicates = self.duplicate_ids.len(),
                first = %self.duplicate_ids[0],
                "duplicate identifiers; keeping first occurrence"
            );
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Rows whose identifier was already taken by an earlier row.
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_ids.len()
    }

    pub fn duplicate_ids(&self) -> &[String] {
        &self.duplicate_ids
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn by_id(&self, id: &str) -> Option<&T> {
        self.index_of(id).map(|idx| &self.items[idx])
    }

    /// Indices of entities named (or labelled) `name`.
    pub fn indices_by_name(&self, name: &str, mode: LookupMode) -> &[usize] {
        let hits = match mode {
            LookupMode::Exact => self.by_label.get(name),
            LookupMode::Folded => self.folded().get(&fold_key(name)),
        };
        hits.map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_name(&self, name: &str, mode: LookupMode) -> Vec<&T> {
        self.indices_by_name(name, mode)
            .iter()
            .map(|&idx| &self.items[idx])
            .collect()
    }

    /// Indices of entities whose ISO code is `code`, or ends in `-code`.
    pub fn indices_by_iso(&self, code: &str) -> &[usize] {
        self.by_iso.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_iso(&self, code: &str) -> Vec<&T> {
        self.indices_by_iso(code)
            .iter()
            .map(|&idx| &self.items[idx])
            .collect()
    }

    fn folded(&self) -> &HashMap<String, Vec<usize>> {
        self.by_folded.get_or_init(|| {
            let mut map = HashMap::new();
            for (label, indices) in &self.by_label {
                for &idx in indices {
                    push_unique(&mut map, fold_key(label), idx);
                }
            }
            for indices in map.values_mut() {
                indices.sort_unstable();
            }
            map
        })
    }

    /// The nearest-neighbour index over this collection, built on first use.
    pub fn spatial_index(&self) -> &SpatialIndex {
        self.spatial.get_or_init(|| SpatialIndex::build(&self.items))
    }

    /// `n` nearest entities to `point`, nearest first, with km distances.
    pub fn nearest(&self, point: Point, n: usize) -> Vec<(&T, f64)> {
        self.spatial_index()
            .k_nearest(point, n)
            .into_iter()
            .map(|(idx, d)| (&self.items[idx], d))
            .collect()
    }

    /// Entities within `radius_km` of `point`, nearest first.
    pub fn within(&self, point: Point, radius_km: f64) -> Vec<(&T, f64)> {
        self.spatial_index()
            .within_radius(point, radius_km)
            .into_iter()
            .map(|(idx, d)| (&self.items[idx], d))
            .collect()
    }
}

fn push_unique(map: &mut HashMap<String, Vec<usize>>, key: String, idx: usize) {
    let slot = map.entry(key).or_default();
    if !slot.contains(&idx) {
        slot.push(idx);
    }
}
