use std::collections::HashMap;

use crate::cache::GeoCache;
use crate::{PipelineError, PipelineResult};

/// matplotlib's tab10 palette; route `i` gets `PALETTE[i % 10]`, so
/// coloring is stable for a stable route ordering.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
    "#7f7f7f", "#bcbd22", "#17becf",
];

pub const DEPOT_RADIUS: u32 = 7;
pub const CUSTOMER_RADIUS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: u32,
    pub label: String,
    pub depot: bool,
}

/// Per-route visual layer: colored stop markers plus a polyline over
/// the same coordinates in visit order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLayer {
    pub color: &'static str,
    pub tooltip: String,
    pub markers: Vec<Marker>,
    pub path: Vec<(f64, f64)>,
}

pub fn build_layers(
    routes: &[Vec<String>],
    coordinates: &GeoCache,
    demands: &HashMap<String, i64>,
    depot: Option<&str>,
) -> PipelineResult<Vec<RouteLayer>> {
    routes
        .iter()
        .enumerate()
        .map(|(idx, route)| build_layer(idx, route, coordinates, demands, depot))
        .collect()
}

fn build_layer(
    idx: usize,
    route: &[String],
    coordinates: &GeoCache,
    demands: &HashMap<String, i64>,
    depot: Option<&str>,
) -> PipelineResult<RouteLayer> {
    let color = PALETTE[idx % PALETTE.len()];
    let mut markers = Vec::with_capacity(route.len());
    let mut path = Vec::with_capacity(route.len());
    let mut visit_order = 1;

    for postal in route {
        let &(latitude, longitude) = coordinates
            .get(postal)
            .ok_or_else(|| PipelineError::MissingCoordinate(postal.clone()))?;

        let marker = if depot == Some(postal.as_str()) {
            Marker {
                latitude,
                longitude,
                radius: DEPOT_RADIUS,
                label: format!("Depot: {postal}"),
                depot: true,
            }
        } else {
            let demand = demands.get(postal).copied().unwrap_or(0);
            let label =
                format!("#{visit_order}: {postal} - {:.0}k", demand as f64 / 1000.0);
            visit_order += 1;
            Marker {
                latitude,
                longitude,
                radius: CUSTOMER_RADIUS,
                label,
                depot: false,
            }
        };

        path.push((latitude, longitude));
        markers.push(marker);
    }

    Ok(RouteLayer {
        color,
        tooltip: format!("Truck {}", idx + 1),
        markers,
        path,
    })
}
