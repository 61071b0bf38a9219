use std::collections::{BTreeSet, HashMap};
use std::fs;

use async_trait::async_trait;
use onemap::{ApiError, Geocoder};
use routemap::{cache, customers, map, render, resolver, routes};

struct StubGeocoder {
    table: HashMap<String, (f64, f64)>,
}

impl StubGeocoder {
    fn new(entries: &[(&str, (f64, f64))]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(postal, coordinate)| (postal.to_string(), *coordinate))
                .collect(),
        }
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, postal: &str) -> Result<(f64, f64), ApiError> {
        self.table
            .get(postal)
            .copied()
            .ok_or_else(|| ApiError::NoResult(postal.to_owned()))
    }
}

#[tokio::test]
async fn renders_a_route_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let routes_path = dir.path().join("routes.json");
    let customers_path = dir.path().join("customers.csv");
    let cache_path = dir.path().join("data").join("geo_cache.json");
    let output_path = dir.path().join("routes_map.html");

    fs::write(&routes_path, r#"[["207224", "529538"]]"#).unwrap();
    fs::write(&customers_path, "postal_code,demand\n529538,480000\n").unwrap();

    let geocoder = StubGeocoder::new(&[
        ("207224", (1.30, 103.80)),
        ("529538", (1.35, 103.85)),
    ]);
    let depot = "207224";

    let routes = routes::load_routes(&routes_path).unwrap();
    let demands = customers::load_customers(&customers_path).unwrap();
    let mut coordinates = cache::load(&cache_path).unwrap();
    assert!(coordinates.is_empty());

    let all_postals: BTreeSet<String> = routes.iter().flatten().cloned().collect();
    resolver::ensure_coordinates(&all_postals, &geocoder, &mut coordinates)
        .await
        .unwrap();
    cache::save(&cache_path, &coordinates).unwrap();

    // both stops are now cached on disk
    let persisted = cache::load(&cache_path).unwrap();
    assert_eq!(persisted["207224"], (1.30, 103.80));
    assert_eq!(persisted["529538"], (1.35, 103.85));

    let center_postal = map::center_postal(Some(depot), &all_postals).unwrap();
    let center = coordinates[center_postal];
    assert_eq!(center, (1.30, 103.80));

    let layers =
        render::build_layers(&routes, &coordinates, &demands, Some(depot)).unwrap();
    assert_eq!(layers.len(), 1);

    let layer = &layers[0];
    assert_eq!(layer.markers.len(), 2);
    assert!(layer.markers[0].depot);
    assert_eq!(layer.markers[0].label, "Depot: 207224");
    assert_eq!((layer.markers[0].latitude, layer.markers[0].longitude), (1.30, 103.80));
    assert!(!layer.markers[1].depot);
    assert_eq!(layer.markers[1].label, "#1: 529538 - 480k");
    assert_eq!((layer.markers[1].latitude, layer.markers[1].longitude), (1.35, 103.85));

    let mut document = map::MapDocument::new(center);
    for layer in layers {
        document.add_layer(layer);
    }
    document.save(&output_path).unwrap();

    let html = fs::read_to_string(&output_path).unwrap();
    assert!(html.contains("setView([1.3, 103.8], 12)"));
    assert!(html.contains("Depot: 207224"));
}

#[tokio::test]
async fn second_run_resolves_nothing_new() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("geo_cache.json");

    let geocoder = StubGeocoder::new(&[("207224", (1.30, 103.80))]);
    let postals: BTreeSet<String> = BTreeSet::from(["207224".to_owned()]);

    let mut coordinates = cache::load(&cache_path).unwrap();
    let first = resolver::ensure_coordinates(&postals, &geocoder, &mut coordinates)
        .await
        .unwrap();
    cache::save(&cache_path, &coordinates).unwrap();
    assert_eq!(first, 1);

    // a fresh process run against the persisted cache
    let mut reloaded = cache::load(&cache_path).unwrap();
    let broken = StubGeocoder::new(&[]);
    let second = resolver::ensure_coordinates(&postals, &broken, &mut reloaded)
        .await
        .unwrap();

    assert_eq!(second, 0);
    assert_eq!(reloaded, coordinates);
}
