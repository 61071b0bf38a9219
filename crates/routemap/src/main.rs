use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use onemap::{OneMapClient, OneMapCredentials};
use routemap::{cache, customers, map, render, resolver, PipelineError, PipelineResult};

/// Render VRP routes onto an interactive map.
#[derive(Parser, Debug)]
#[command(name = "routemap", version)]
struct Args {
    /// Path to the routes JSON file
    #[arg(long, default_value = "data/routes.json")]
    routes: PathBuf,

    /// Customers CSV path
    #[arg(long, default_value = "data/customers.csv")]
    customers: PathBuf,

    /// Output HTML map path
    #[arg(long, default_value = "routes_map.html")]
    output: PathBuf,

    /// Geocode cache file
    #[arg(long, default_value = "data/geo_cache.json")]
    cache: PathBuf,

    /// Warehouse postal code for centering; pass an empty value to
    /// center on the first route stop instead
    #[arg(long, default_value = "207224")]
    warehouse: String,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(why) = run(Args::parse()).await {
        eprintln!("Error: {why}");
        process::exit(1);
    }
}

async fn run(args: Args) -> PipelineResult<()> {
    let routes = routemap::routes::load_routes(&args.routes)?;
    let demands = customers::load_customers(&args.customers)?;
    let warehouse = match args.warehouse.trim() {
        "" => None,
        postal => Some(postal.to_owned()),
    };

    let credentials = OneMapCredentials::from_env()?;
    let client = OneMapClient::authenticate(&credentials).await?;

    let mut coordinates = cache::load(&args.cache)?;
    let all_postals: BTreeSet<String> =
        routes.iter().flatten().cloned().collect();

    resolver::ensure_coordinates(&all_postals, &client, &mut coordinates).await?;
    cache::save(&args.cache, &coordinates)?;

    let center_postal = map::center_postal(warehouse.as_deref(), &all_postals)
        .ok_or_else(|| {
            PipelineError::malformed(
                "no stops in any route and no warehouse configured",
            )
        })?
        .to_owned();

    // The warehouse may not appear in any route; resolve it separately.
    if !coordinates.contains_key(&center_postal) {
        let extra = BTreeSet::from([center_postal.clone()]);
        resolver::ensure_coordinates(&extra, &client, &mut coordinates).await?;
        cache::save(&args.cache, &coordinates)?;
    }

    let center = coordinates
        .get(&center_postal)
        .copied()
        .ok_or_else(|| PipelineError::MissingCoordinate(center_postal.clone()))?;

    let layers =
        render::build_layers(&routes, &coordinates, &demands, warehouse.as_deref())?;

    let mut document = map::MapDocument::new(center);
    for layer in layers {
        document.add_layer(layer);
    }
    document.save(&args.output)?;

    println!("Saved map to {}", args.output.display());
    Ok(())
}
