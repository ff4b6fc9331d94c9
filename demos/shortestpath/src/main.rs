//! shortestpath — command-line front end for the routing engine.
//!
//! Routes between two lng/lat points over a street network loaded from a
//! vertex CSV, a GeoJSON FeatureCollection, or an SQLite feature store, or
//! over a small built-in Trondheim network when `--network` is omitted.
//!
//! ```text
//! shortestpath --network roads.geojson --start 10.395,63.4306 --end 10.3931,63.4264
//! shortestpath --batch pairs.csv --router astar
//! ```
//!
//! Results go to stdout, one JSON document per request; logs go to stderr
//! (filter with `RUST_LOG`).

mod network;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sp_core::{GeoPoint, RouteConfig};
use sp_network::{AStarRouter, Feature, Router};
use sp_route::{
    FeatureSource, NoopObserver, OrchestratorBuilder, Route, RoutingOrchestrator, RoutingResult,
};
use sp_source::{InMemorySource, SqliteSource, load_features_csv, parse_feature_collection};

use network::{build_network, default_endpoints};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(version, about = "Shortest path between two points over a street network")]
struct Args {
    /// Network file: `.csv` (one row per vertex), `.json`/`.geojson`, or
    /// `.sqlite`/`.db`.  Built-in network when omitted.
    #[arg(long)]
    network: Option<PathBuf>,

    /// Start point as "lng,lat".
    #[arg(long, allow_hyphen_values = true)]
    start: Option<GeoPoint>,

    /// End point as "lng,lat".
    #[arg(long, allow_hyphen_values = true)]
    end: Option<GeoPoint>,

    /// CSV of requests with columns start_lng,start_lat,end_lng,end_lat.
    /// Routed in parallel; overrides --start/--end.
    #[arg(long)]
    batch: Option<PathBuf>,

    /// JSON routing configuration; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = RouterKind::Dijkstra)]
    router: RouterKind,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Emit route geometry as lng/lat instead of projected coordinates.
    #[arg(long)]
    geographic: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RouterKind {
    Dijkstra,
    Astar,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `{"success": ..., "features": [{"geometry": WKT, "attributes": [...]}]}`
    Json,
    /// One WKT line per route segment.
    Wkt,
}

#[derive(Deserialize)]
struct BatchRow {
    start_lng: f64,
    start_lat: f64,
    end_lng:   f64,
    end_lat:   f64,
}

type SharedSource = Box<dyn FeatureSource + Send + Sync>;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<RouteConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RouteConfig::default(),
    };

    match args.router {
        RouterKind::Dijkstra => run(&args, OrchestratorBuilder::new(config).build()?),
        RouterKind::Astar => {
            run(&args, OrchestratorBuilder::new(config).router(AStarRouter).build()?)
        }
    }
}

fn run<R: Router>(args: &Args, orchestrator: RoutingOrchestrator<R>) -> Result<()> {
    let source = open_source(args.network.as_deref(), &orchestrator)?;

    let requests = match &args.batch {
        Some(path) => read_batch(path)?,
        None => {
            let (default_start, default_end) = default_endpoints();
            vec![(args.start.unwrap_or(default_start), args.end.unwrap_or(default_end))]
        }
    };
    info!(
        requests = requests.len(),
        router = ?args.router,
        projection = orchestrator.config().projection.epsg(),
        "routing"
    );

    let t0 = Instant::now();
    let outcomes: Vec<RoutingResult<Route>> = requests
        .par_iter()
        .map(|&(start, end)| {
            orchestrator.try_route(start, end, None, source.as_ref(), &mut NoopObserver)
        })
        .collect();
    let routed = outcomes.iter().filter(|o| o.is_ok()).count();
    info!(
        routed,
        failed = outcomes.len() - routed,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "done"
    );

    for outcome in &outcomes {
        match args.format {
            OutputFormat::Json => {
                println!("{}", render_json(outcome, &orchestrator, args.geographic)?);
            }
            OutputFormat::Wkt => match outcome {
                Ok(route) => {
                    for line in render_wkt(route, &orchestrator, args.geographic)? {
                        println!("{line}");
                    }
                }
                Err(e) => eprintln!("routing failed: {e}"),
            },
        }
    }
    Ok(())
}

// ── Sources ───────────────────────────────────────────────────────────────────

fn open_source<R: Router>(
    path:         Option<&Path>,
    orchestrator: &RoutingOrchestrator<R>,
) -> Result<SharedSource> {
    let Some(path) = path else {
        let features = build_network(&orchestrator.reprojector())?;
        info!(features = features.len(), "using built-in network");
        return Ok(Box::new(InMemorySource::new(features)));
    };

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();
    if matches!(ext.as_str(), "sqlite" | "db") {
        let source = SqliteSource::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        info!(path = %path.display(), features = source.count()?, "opened sqlite store");
        return Ok(Box::new(source));
    }

    let features: Vec<Feature> = match ext.as_str() {
        "csv" => load_features_csv(path)?,
        "json" | "geojson" => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_feature_collection(&text)?
        }
        other => bail!("unsupported network file extension {other:?}"),
    };
    info!(path = %path.display(), features = features.len(), "loaded network");
    Ok(Box::new(InMemorySource::new(features)))
}

fn read_batch(path: &Path) -> Result<Vec<(GeoPoint, GeoPoint)>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening batch file {}", path.display()))?;
    let mut out = Vec::new();
    for row in reader.deserialize() {
        let row: BatchRow = row?;
        out.push((
            GeoPoint::new(row.start_lng, row.start_lat),
            GeoPoint::new(row.end_lng, row.end_lat),
        ));
    }
    Ok(out)
}

// ── Output ────────────────────────────────────────────────────────────────────

fn render_json<R: Router>(
    outcome:      &RoutingResult<Route>,
    orchestrator: &RoutingOrchestrator<R>,
    geographic:   bool,
) -> Result<Value> {
    let route = match outcome {
        Ok(route) => route,
        Err(e) => return Ok(json!({ "success": false, "error": e.to_string() })),
    };
    let wkt = render_wkt(route, orchestrator, geographic)?;
    let features: Vec<Value> = route
        .segments
        .iter()
        .zip(wkt)
        .map(|(seg, geometry)| {
            let a = &seg.attributes;
            json!({
                "geometry":   geometry,
                "attributes": [a.id, a.point_a, a.point_b, a.point_c],
                "cost":       seg.cost,
                "length":     seg.length,
            })
        })
        .collect();
    Ok(json!({
        "success":      true,
        "total_cost":   route.total_cost,
        "total_length": route.total_length,
        "attempts":     route.attempts,
        "features":     features,
    }))
}

fn render_wkt<R: Router>(
    route:        &Route,
    orchestrator: &RoutingOrchestrator<R>,
    geographic:   bool,
) -> Result<Vec<String>> {
    if !geographic {
        return Ok(route.segments.iter().map(|s| s.to_wkt()).collect());
    }
    let reprojector = orchestrator.reprojector();
    route
        .segments
        .iter()
        .map(|seg| {
            let coords = seg
                .to_geographic(&reprojector)?
                .iter()
                .map(|p| format!("{} {}", p.lng, p.lat))
                .collect::<Vec<_>>()
                .join(", ");
            Ok(format!("LineString ({coords})"))
        })
        .collect()
}
