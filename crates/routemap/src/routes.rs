use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::{PipelineError, PipelineResult};

/// Load and normalize a routes file: either a top-level array of routes
/// or an object carrying them under `routes`. Each route is an ordered
/// list of postal codes; entries are trimmed and empties dropped.
pub fn load_routes(path: &Path) -> PipelineResult<Vec<Vec<String>>> {
    let raw = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_owned(),
        source,
    })?;
    let value: Value = raw.parse().map_err(|why| {
        PipelineError::malformed(format!("{}: {}", path.display(), why))
    })?;
    normalize(value)
}

pub fn normalize(value: Value) -> PipelineResult<Vec<Vec<String>>> {
    let routes = match value {
        Value::Object(mut object) => object.remove("routes").ok_or_else(|| {
            PipelineError::malformed(
                "routes JSON must be a list or an object with key 'routes'",
            )
        })?,
        other => other,
    };

    let Value::Array(routes) = routes else {
        return Err(PipelineError::malformed(
            "routes JSON must be a list or an object with key 'routes'",
        ));
    };

    let mut normalized = Vec::with_capacity(routes.len());
    for (idx, route) in routes.into_iter().enumerate() {
        let Value::Array(stops) = route else {
            return Err(PipelineError::malformed(format!(
                "route {} is not a list",
                idx
            )));
        };

        let mut postals = Vec::with_capacity(stops.len());
        for stop in stops {
            let postal = match stop {
                Value::String(text) => text.trim().to_owned(),
                Value::Number(number) => number.to_string(),
                other => {
                    return Err(PipelineError::malformed(format!(
                        "route {} contains a non-scalar stop: {}",
                        idx, other
                    )))
                }
            };
            if !postal.is_empty() {
                postals.push(postal);
            }
        }
        normalized.push(postals);
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_and_object_forms_are_equivalent() {
        let list = normalize(json!([["207224", "529538"], ["207224"]])).unwrap();
        let object = normalize(json!({
            "routes": [["207224", "529538"], ["207224"]],
            "cost": 42,
        }))
        .unwrap();

        assert_eq!(list, object);
        assert_eq!(list, vec![vec!["207224", "529538"], vec!["207224"]]);
    }

    #[test]
    fn trims_and_drops_empty_entries() {
        let routes = normalize(json!([[" 207224 ", "", "  "]])).unwrap();
        assert_eq!(routes, vec![vec!["207224"]]);
    }

    #[test]
    fn numeric_postals_are_stringified() {
        let routes = normalize(json!([[207224, "529538"]])).unwrap();
        assert_eq!(routes, vec![vec!["207224", "529538"]]);
    }

    #[test]
    fn empty_route_is_kept_as_noop() {
        let routes = normalize(json!([[]])).unwrap();
        assert_eq!(routes, vec![Vec::<String>::new()]);
    }

    #[test]
    fn rejects_non_list_top_level() {
        assert!(normalize(json!({"cost": 42})).is_err());
        assert!(normalize(json!("207224")).is_err());
    }

    #[test]
    fn rejects_non_list_route() {
        let result = normalize(json!([["207224"], "529538"]));
        let why = result.unwrap_err().to_string();
        assert!(why.contains("route 1"));
    }
}
