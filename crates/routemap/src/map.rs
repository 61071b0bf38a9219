use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::render::RouteLayer;
use crate::{PipelineError, PipelineResult};

pub const DEFAULT_ZOOM: u32 = 12;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Pick the postal code the map is centered on: the configured depot,
/// or the first of the (sorted) stop set when no depot is set.
pub fn center_postal<'a>(
    depot: Option<&'a str>,
    postals: &'a BTreeSet<String>,
) -> Option<&'a str> {
    depot.or_else(|| postals.first().map(String::as_str))
}

/// Assembles route layers into a self-contained Leaflet HTML document.
pub struct MapDocument {
    center: (f64, f64),
    zoom: u32,
    layers: Vec<RouteLayer>,
}

impl MapDocument {
    pub fn new(center: (f64, f64)) -> Self {
        Self {
            center,
            zoom: DEFAULT_ZOOM,
            layers: Vec::new(),
        }
    }

    pub fn add_layer(&mut self, layer: RouteLayer) {
        self.layers.push(layer);
    }

    pub fn to_html(&self) -> String {
        let mut script = String::new();
        script.push_str(&format!(
            "var map = L.map(\"map\").setView([{}, {}], {});\n",
            self.center.0, self.center.1, self.zoom
        ));
        script.push_str(&format!(
            "L.tileLayer({}, {{ maxZoom: 19, attribution: {} }}).addTo(map);\n",
            js_string(TILE_URL),
            js_string(TILE_ATTRIBUTION)
        ));
        script.push_str("L.control.scale().addTo(map);\n");

        for layer in &self.layers {
            let color = js_string(layer.color);
            for marker in &layer.markers {
                let label = js_string(&marker.label);
                script.push_str(&format!(
                    "L.circleMarker([{}, {}], {{ radius: {}, color: {color}, \
                     fill: true, fillColor: {color} }})\
                     .addTo(map).bindPopup({label}).bindTooltip({label});\n",
                    marker.latitude, marker.longitude, marker.radius
                ));
            }

            let points: Vec<String> = layer
                .path
                .iter()
                .map(|(latitude, longitude)| format!("[{}, {}]", latitude, longitude))
                .collect();
            script.push_str(&format!(
                "L.polyline([{}], {{ color: {color}, weight: 4, opacity: 0.8 }})\
                 .addTo(map).bindTooltip({});\n",
                points.join(", "),
                js_string(&layer.tooltip)
            ));
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Routes</title>\n\
             <link rel=\"stylesheet\" href=\"{LEAFLET_CSS}\">\n\
             <script src=\"{LEAFLET_JS}\"></script>\n\
             <style>html, body, #map {{ height: 100%; margin: 0; }}</style>\n\
             </head>\n<body>\n<div id=\"map\"></div>\n\
             <script>\n{script}</script>\n</body>\n</html>\n"
        )
    }

    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        fs::write(path, self.to_html()).map_err(|source| PipelineError::Io {
            path: path.to_owned(),
            source,
        })
    }
}

/// Encode a string as a JS string literal (JSON encoding is a subset).
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}
