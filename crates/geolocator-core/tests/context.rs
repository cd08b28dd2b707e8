// crates/geolocator-core/tests/context.rs
mod common;

use approx::assert_relative_eq;
use geolocator_core::{EntityKind, Location, LocationContext, Point};

fn ctx() -> LocationContext {
    LocationContext::from_snapshot(common::snapshot())
}

#[test]
fn every_resolvable_city_is_linked() {
    let ctx = ctx();
    for (idx, city) in ctx.cities().iter().enumerate() {
        if city.id == "Q0" {
            assert_eq!(ctx.hierarchy().region_of_city(idx), None);
            continue;
        }
        let region = ctx.hierarchy().region_of_city(idx).expect("region linked");
        let country = ctx.hierarchy().country_of_city(idx).expect("country linked");
        assert_eq!(ctx.regions().get(region).unwrap().id, city.region_id.clone().unwrap());
        assert_eq!(ctx.countries().get(country).unwrap().id, city.country_id.clone().unwrap());
    }
    assert_eq!(ctx.link_report().unresolved, 2);
}

#[test]
fn region_country_is_inherited_from_cities() {
    let ctx = ctx();
    let canton = &ctx.get_regions("Canton of Luxembourg")[0];
    assert_eq!(canton.country_iso(), Some("LU"));
    assert_eq!(ctx.link_report().propagated, 1);
}

#[test]
fn stats_count_duplicates() {
    let stats = ctx().stats();
    assert_eq!(stats.countries, 10);
    assert_eq!(stats.regions, 13);
    assert_eq!(stats.cities, 16);
    assert_eq!(stats.duplicates, 1);
}

#[test]
fn nearest_countries_to_germany() {
    let ctx = ctx();
    let hits = ctx.nearest(EntityKind::Country, Point::new(51.0, 9.0), 3);
    let names: Vec<&str> = hits.iter().map(|(l, _)| l.name()).collect();
    // Germany itself sits at the query point and is excluded.
    assert_eq!(names, vec!["Luxembourg", "Netherlands", "Belgium"]);
    assert_relative_eq!(hits[0].1, 244.2, epsilon = 0.5);
    assert!(hits.windows(2).all(|w| w[0].1 <= w[1].1));
}

#[test]
fn within_radius_of_paris() {
    let ctx = ctx();
    let paris = Point::new(48.856667, 2.352222);
    let hits = ctx.within(EntityKind::City, paris, 400.0);
    let names: Vec<&str> = hits.iter().map(|(l, _)| l.name()).collect();
    // The query point's own entry is not reported.
    assert_eq!(names, vec!["Luxembourg", "London"]);
    assert_relative_eq!(hits[1].1, 343.5, epsilon = 1.0);
}

#[test]
fn locate_location_prunes_implied_parents() {
    let ctx = ctx();
    let hits = ctx.locate_location(&["Berlin, Germany"], false);
    let kinds: Vec<EntityKind> = hits.iter().map(Location::kind).collect();
    assert_eq!(kinds, vec![EntityKind::City]);
    assert_eq!(hits[0].name(), "Berlin");
}

#[test]
fn locate_location_verbose_finds_two_word_names() {
    let ctx = ctx();
    let plain = ctx.locate_location(&["Hotels in Los Angeles"], false);
    assert!(plain.is_empty());
    let verbose = ctx.locate_location(&["Hotels in Los Angeles"], true);
    assert_eq!(verbose[0].name(), "Los Angeles");
}

#[test]
fn regions_of_country_by_name() {
    let ctx = ctx();
    let names: Vec<&str> = ctx
        .regions_of_country("Germany")
        .into_iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["Bavaria", "Berlin"]);
}
