use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;
use waymark::geodesic::{
    calculate_bearing, calculate_inverse_bearing, destination_point, endpoint_from_intersection,
    generate_circle, geodesic_distance_km, LatLon,
};
use waymark::graph::{ElementGraph, GraphCfg, LayerSnapshot, RepairReport};

mod provenance;

#[derive(Parser)]
#[command(name = "waymark")]
#[command(about = "Geodesic helpers and map layer maintenance")]
#[command(version = waymark::VERSION)]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Point reached from FROM after DISTANCE km along BEARING degrees
    Destination {
        #[arg(long, value_parser = parse_latlon, allow_hyphen_values = true)]
        from: LatLon,
        #[arg(long)]
        distance_km: f64,
        #[arg(long, allow_negative_numbers = true)]
        bearing: f64,
    },
    /// Initial bearing and great-circle distance between two positions
    Bearing {
        #[arg(long, value_parser = parse_latlon, allow_hyphen_values = true)]
        from: LatLon,
        #[arg(long, value_parser = parse_latlon, allow_hyphen_values = true)]
        to: LatLon,
        /// Report the bearing from TO back to FROM instead
        #[arg(long)]
        inverse: bool,
    },
    /// Closed ring of N points at RADIUS km around CENTER
    Circle {
        #[arg(long, value_parser = parse_latlon, allow_hyphen_values = true)]
        center: LatLon,
        #[arg(long)]
        radius_km: f64,
        #[arg(long, default_value_t = 360)]
        points: usize,
    },
    /// Endpoint of the map-straight ray FROM through VIA at DISTANCE km
    Intersect {
        #[arg(long, value_parser = parse_latlon, allow_hyphen_values = true)]
        from: LatLon,
        #[arg(long, value_parser = parse_latlon, allow_hyphen_values = true)]
        via: LatLon,
        #[arg(long)]
        distance_km: f64,
    },
    /// Load a layer snapshot, repair its references and write it back out
    Repair {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Coordinate match tolerance in degrees
        #[arg(long, env = "WAYMARK_TOLERANCE")]
        tolerance: Option<f64>,
    },
    /// Entity counts and invariant check of a layer snapshot
    Stats {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, env = "WAYMARK_TOLERANCE")]
        tolerance: Option<f64>,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Destination {
            from,
            distance_km,
            bearing,
        } => print_json(&destination_point(from, distance_km, bearing)),
        Action::Bearing { from, to, inverse } => {
            let bearing = if inverse {
                calculate_inverse_bearing(from, to)
            } else {
                calculate_bearing(from, to)
            };
            print_json(&json!({
                "bearing": bearing,
                "distanceKm": geodesic_distance_km(from, to),
            }))
        }
        Action::Circle {
            center,
            radius_km,
            points,
        } => print_json(&generate_circle(center, radius_km, points)),
        Action::Intersect {
            from,
            via,
            distance_km,
        } => print_json(&endpoint_from_intersection(from, via, distance_km)),
        Action::Repair {
            input,
            out,
            tolerance,
        } => {
            let report = repair(&input, &out, graph_cfg(tolerance))?;
            print_json(&report)
        }
        Action::Stats { input, tolerance } => stats(&input, graph_cfg(tolerance)),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn graph_cfg(tolerance: Option<f64>) -> GraphCfg {
    let mut cfg = GraphCfg::default();
    if let Some(t) = tolerance {
        cfg.tolerance_deg = t;
    }
    cfg
}

/// Parse `lat,lon` in decimal degrees.
fn parse_latlon(s: &str) -> std::result::Result<LatLon, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lon`, got `{s}`"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("latitude: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("longitude: {e}"))?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} outside [-90, 90]"));
    }
    Ok(LatLon::new(lat, lon))
}

fn load_snapshot(input: &Path, cfg: GraphCfg) -> Result<(ElementGraph, RepairReport)> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let snapshot = LayerSnapshot::from_json(&text)
        .with_context(|| format!("parsing layer snapshot {}", input.display()))?;
    Ok(ElementGraph::from_snapshot(snapshot, cfg))
}

fn repair(input: &Path, out: &Path, cfg: GraphCfg) -> Result<RepairReport> {
    let (graph, report) = load_snapshot(input, cfg)?;
    tracing::info!(input = %input.display(), out = %out.display(), clean = report.is_clean(), "repair");

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let text = graph.export_layers().to_json_pretty()?;
    std::fs::write(out, text).with_context(|| format!("writing {}", out.display()))?;

    let prov = provenance::RepairProvenance::new(
        input,
        out,
        cfg.tolerance_deg,
        graph.counts(),
        &report,
    );
    let prov_path = provenance::write_sidecar(out, &prov)?;
    tracing::info!(provenance = %prov_path.display(), "provenance written");
    Ok(report)
}

fn stats(input: &Path, cfg: GraphCfg) -> Result<()> {
    let (graph, report) = load_snapshot(input, cfg)?;
    let violations: Vec<String> = graph
        .check_invariants()
        .iter()
        .map(ToString::to_string)
        .collect();
    print_json(&json!({
        "counts": graph.counts(),
        "repair": report,
        "violations": violations,
    }))?;
    if !violations.is_empty() {
        bail!("{} invariant violations after load", violations.len());
    }
    Ok(())
}
