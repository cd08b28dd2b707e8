// crates/geolocator-core/src/traits.rs
use crate::common::EntityKind;
use crate::spatial::Point;
use crate::text::fold_key;

/// Name-based matching helpers for types that expose a canonical display name.
///
/// This trait centralizes Unicode‑aware, accent-insensitive and case-insensitive
/// comparisons based on [`fold_key`]. Implementors provide a `&str` view of
/// their canonical name via [`NameMatch::name_str`], and get convenient helpers:
/// - [`NameMatch::is_named`]: equality on folded form
/// - [`NameMatch::name_contains`]: substring match on folded form
///
/// # Examples
/// ```rust
/// use geolocator_core::traits::NameMatch;
///
/// struct Place(&'static str);
/// impl NameMatch for Place {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Place("Wien").is_named("WIEN"));
/// assert!(Place("Zürich").name_contains("zuri"));
/// ```
pub trait NameMatch {
    /// Returns the canonical display name used for matching.
    fn name_str(&self) -> &str;

    /// Accent-insensitive and case-insensitive name comparison.
    #[inline]
    fn is_named(&self, q: &str) -> bool {
        fold_key(self.name_str()) == fold_key(q)
    }

    /// Accent-insensitive + case-insensitive substring match.
    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        fold_key(self.name_str()).contains(&fold_key(q))
    }
}

/// Anything that may carry a point coordinate.
///
/// Entities without both latitude and longitude return `None` and are left
/// out of spatial indexes.
pub trait HasCoordinates {
    fn point(&self) -> Option<Point>;
}

pub trait HasPopulation {
    fn population(&self) -> Option<u64>;

    /// Population with missing values counted as zero, for ranking.
    #[inline]
    fn population_or_zero(&self) -> u64 {
        self.population().unwrap_or(0)
    }
}

/// Common surface of countries, regions and cities, used by the generic
/// [`Repository`](crate::repository::Repository).
pub trait Entity: NameMatch + HasCoordinates + HasPopulation {
    const KIND: EntityKind;

    /// Stable external identifier (e.g. a Wikidata Q-id).
    fn id(&self) -> &str;

    /// ISO code, if the kind has one.
    fn iso(&self) -> Option<&str> {
        None
    }

    /// Alternate names the entity is also known by.
    fn labels(&self) -> &[String] {
        &[]
    }
}
