//! gemca CLI - inspect geometry files and query zones.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use gemca::{EvalConfig, Loader, Point3, Ray, Vec3, Workspace};
use log::LevelFilter;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gemca")]
#[command(about = "CSG geometry inspection for particle transport", long_about = None)]
struct Cli {
    /// TOML file with tolerances and the zone-exit step cap
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display bodies, zones and media of a geometry file
    Info {
        /// Geometry file
        geo: PathBuf,
        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },
    /// Find the zone containing a point
    Locate {
        /// Geometry file
        geo: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
        /// Direction; also reports the distance to the zone boundary
        #[arg(long, num_args = 3, value_names = ["U", "V", "W"], allow_negative_numbers = true)]
        dir: Option<Vec<f64>>,
    },
    /// Follow a ray through consecutive zones
    Trace {
        /// Geometry file
        geo: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
        #[arg(allow_negative_numbers = true)]
        u: f64,
        #[arg(allow_negative_numbers = true)]
        v: f64,
        #[arg(allow_negative_numbers = true)]
        w: f64,
        /// Stop after this many zones
        #[arg(long, default_value_t = 1000)]
        max_zones: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EvalConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => EvalConfig::default(),
    };

    match cli.command {
        Commands::Info { geo, json } => {
            let ws = load(&geo, config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&Summary::new(&ws))?);
            } else {
                show_info(&ws);
            }
        }
        Commands::Locate { geo, x, y, z, dir } => {
            let ws = load(&geo, config)?;
            let dir = match dir.as_deref() {
                Some([u, v, w]) => Some(direction(*u, *v, *w)?),
                Some(_) => anyhow::bail!("--dir takes three components"),
                None => None,
            };
            locate(&ws, Point3::new(x, y, z), dir);
        }
        Commands::Trace {
            geo,
            x,
            y,
            z,
            u,
            v,
            w,
            max_zones,
        } => {
            let ws = load(&geo, config)?;
            let ray = Ray::new(Point3::new(x, y, z), direction(u, v, w)?);
            trace(&ws, &ray, max_zones);
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load(path: &Path, config: EvalConfig) -> Result<Workspace> {
    Loader::new()
        .config(config)
        .load(path)
        .with_context(|| format!("Failed to load {}", path.display()))
}

fn direction(u: f64, v: f64, w: f64) -> Result<Vec3> {
    let dir = Vec3::new(u, v, w);
    if dir.norm() == 0.0 {
        anyhow::bail!("Direction must not be zero");
    }
    Ok(dir)
}

fn show_info(ws: &Workspace) {
    if let Some(source) = ws.source() {
        println!("Geometry: {}", source.display());
    }
    println!("Bodies: {}", ws.bodies().len());
    for body in ws.bodies() {
        println!(
            "  {:<12} {}  line {:>4}  {} surfaces",
            body.name,
            body.kind.body_type(),
            body.line,
            body.surfaces().len()
        );
    }
    println!("Zones: {}", ws.zones().len());
    for zone in ws.zones() {
        println!(
            "  {:>4} {:<12} medium {:>3}  {}",
            zone.id, zone.name, zone.medium, zone.expression
        );
        println!("       {}", ws.render_zone(zone));
    }
}

fn locate(ws: &Workspace, point: Point3, dir: Option<Vec3>) {
    let ray = Ray::new(point, dir.unwrap_or_else(Vec3::z));
    let Some(id) = ws.zone_of(&ray) else {
        println!("({}, {}, {}) is outside every zone", point.x, point.y, point.z);
        return;
    };
    let (name, medium) = ws
        .zone(id)
        .map(|z| (z.name.as_str(), z.medium))
        .unwrap_or(("?", 0));
    println!("zone {id} ({name}), medium {medium}");
    if dir.is_some() {
        println!("distance to boundary: {}", ws.distance_to_boundary(id, &ray));
    }
}

fn trace(ws: &Workspace, ray: &Ray, max_zones: usize) {
    let segments = ws.trace(ray, max_zones);
    if segments.is_empty() {
        println!("start point is outside every zone");
        return;
    }
    println!(
        "{:>4}  {:<12} {:>6}  {:>36}  {:>14}",
        "zone", "name", "medium", "entry point", "length"
    );
    for seg in &segments {
        let (name, medium) = ws
            .zone(seg.zone)
            .map(|z| (z.name.as_str(), z.medium))
            .unwrap_or(("?", 0));
        let entry = format!("({:.6}, {:.6}, {:.6})", seg.start.x, seg.start.y, seg.start.z);
        println!(
            "{:>4}  {:<12} {:>6}  {:>36}  {:>14.6}",
            seg.zone, name, medium, entry, seg.length
        );
    }
    let total: f64 = segments.iter().map(|s| s.length).sum();
    println!("total track length: {total:.6}");
}

#[derive(Serialize)]
struct Summary<'a> {
    source: Option<&'a Path>,
    bodies: Vec<BodySummary<'a>>,
    zones: Vec<ZoneSummary<'a>>,
}

#[derive(Serialize)]
struct BodySummary<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    keyword: &'static str,
    line: usize,
    surfaces: usize,
}

#[derive(Serialize)]
struct ZoneSummary<'a> {
    id: usize,
    name: &'a str,
    medium: u32,
    expression: &'a str,
    tree: String,
    line: usize,
}

impl<'a> Summary<'a> {
    fn new(ws: &'a Workspace) -> Self {
        Self {
            source: ws.source(),
            bodies: ws
                .bodies()
                .iter()
                .map(|b| BodySummary {
                    name: &b.name,
                    keyword: b.kind.body_type().keyword(),
                    line: b.line,
                    surfaces: b.surfaces().len(),
                })
                .collect(),
            zones: ws
                .zones()
                .iter()
                .map(|z| ZoneSummary {
                    id: z.id.0,
                    name: &z.name,
                    medium: z.medium,
                    expression: &z.expression,
                    tree: ws.render_zone(z),
                    line: z.line,
                })
                .collect(),
        }
    }
}
