use std::collections::BTreeSet;

use onemap::Geocoder;

use crate::cache::GeoCache;
use crate::{PipelineError, PipelineResult};

/// Resolve every postal code in `postals` that the cache does not
/// already cover, inserting the results. Lookups are sequential in
/// sorted order and fail fast: a single unresolvable postal aborts the
/// batch so no partial map is ever rendered. The caller persists the
/// cache afterwards.
///
/// Returns the number of fresh lookups performed.
pub async fn ensure_coordinates<G>(
    postals: &BTreeSet<String>,
    geocoder: &G,
    cache: &mut GeoCache,
) -> PipelineResult<usize>
where
    G: Geocoder + ?Sized,
{
    let missing: Vec<&String> = postals
        .iter()
        .filter(|postal| !cache.contains_key(*postal))
        .collect();

    log::info!(
        "{} of {} postal codes cached, resolving {}",
        postals.len() - missing.len(),
        postals.len(),
        missing.len()
    );

    let resolved = missing.len();
    for postal in missing {
        let coordinate = geocoder.resolve(postal).await.map_err(|source| {
            PipelineError::Resolution {
                postal: postal.clone(),
                source,
            }
        })?;
        log::info!(
            "resolved {} to ({:.5}, {:.5})",
            postal,
            coordinate.0,
            coordinate.1
        );
        cache.insert(postal.clone(), coordinate);
    }

    Ok(resolved)
}
