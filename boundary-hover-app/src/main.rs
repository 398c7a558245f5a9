//! boundary-hover-app - inspect boundary map configurations without a browser
//!
//! `dump` prints the sources and layers a preset adds to the style.
//! `simulate` bootstraps the map on the headless engine and replays pointer
//! events, printing each hover transition and the flags left set.

use anyhow::{bail, Context, Result};
use boundary_hover::prelude::*;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "boundary-hover-app")]
#[command(about = "Inspect and replay boundary hover map configurations")]
struct Cli {
    /// Built-in preset: north-america or light
    #[arg(long, global = true, default_value = "north-america")]
    preset: String,

    /// JSON map config; overrides --preset
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the source and layer definitions as JSON
    Dump,

    /// Print the resolved map config as JSON
    Config,

    /// Replay pointer events against the headless engine
    Simulate {
        /// JSON array of map events; a short built-in session when omitted
        #[arg(long)]
        events: Option<PathBuf>,

        /// Access token handed to the map view
        #[arg(long, env = "MAPBOX_ACCESS_TOKEN", default_value = "pk.headless")]
        token: String,

        /// Pretend the graphics capability check fails
        #[arg(long)]
        unsupported: bool,
    },
}

fn main() -> Result<()> {
    boundary_hover::init_logging();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Dump => dump(&config),
        Command::Config => {
            println!("{}", config.to_json_string()?);
            Ok(())
        }
        Command::Simulate {
            events,
            token,
            unsupported,
        } => simulate(config, events, &token, unsupported),
    }
}

fn load_config(cli: &Cli) -> Result<MapConfig> {
    if let Some(path) = &cli.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return MapConfig::from_json_str(&text)
            .with_context(|| format!("parsing {}", path.display()));
    }
    match BoundaryPreset::from_name(&cli.preset) {
        Some(preset) => Ok(preset.resolve()),
        None => bail!("unknown preset `{}` (expected north-america or light)", cli.preset),
    }
}

fn dump(config: &MapConfig) -> Result<()> {
    let sources: serde_json::Map<String, serde_json::Value> = config
        .boundaries
        .iter()
        .map(|boundary| {
            let source = boundary.source();
            (source.id.clone(), source.to_json())
        })
        .collect();
    let layers: Vec<serde_json::Value> = config
        .boundaries
        .iter()
        .flat_map(|boundary| boundary.layers(&config.worldview))
        .map(|layer| layer.to_json())
        .collect();

    let output = json!({
        "style": config.style_url,
        "bounds": config.bounds.to_lng_lat_pairs(),
        "sources": sources,
        "layers": layers,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Two provinces, then a county, then leaving both layers
fn default_session(config: &MapConfig) -> Vec<MapEvent> {
    let mut events = vec![MapEvent::StyleLoaded];
    if let Some(provinces) = config.boundary(Granularity::Province) {
        let layer = provinces.hit_layer_id();
        events.push(MapEvent::pointer_move(&layer, FeatureId::Number(1).into()));
        events.push(MapEvent::pointer_move(&layer, FeatureHit::None));
        events.push(MapEvent::pointer_move(&layer, FeatureId::Number(2).into()));
        events.push(MapEvent::pointer_leave(&layer));
    }
    if let Some(counties) = config.boundary(Granularity::County) {
        let layer = counties.hit_layer_id();
        events.push(MapEvent::pointer_move(&layer, FeatureId::from("06075").into()));
        events.push(MapEvent::pointer_leave(&layer));
        events.push(MapEvent::pointer_leave(&layer));
    }
    events
}

fn simulate(
    config: MapConfig,
    events: Option<PathBuf>,
    token: &str,
    unsupported: bool,
) -> Result<()> {
    let events = match events {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<Vec<MapEvent>>(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => default_session(&config),
    };

    let platform = if unsupported {
        HeadlessPlatform::unsupported()
    } else {
        HeadlessPlatform::new().with_style_layers(vec![StyleLayer::text_label("place-label")])
    };
    let token = AccessToken::new(token)?;
    let mut banner = ErrorBanner::new();

    let mut map = match BoundaryMap::bootstrap(&platform, config, &token, &mut banner) {
        Ok(map) => map,
        Err(err) => {
            println!("bootstrap failed: {}", err);
            print_banner(&banner);
            return Ok(());
        }
    };

    for event in &events {
        match event {
            MapEvent::StyleLoaded => {
                let report = map.on_style_loaded();
                println!(
                    "load: {} layers added, {} failures",
                    report.added_layers().len(),
                    report.failures()
                );
            }
            MapEvent::PointerMove { layer_id, .. } | MapEvent::PointerLeave { layer_id } => {
                let transition = map.on_pointer(event);
                println!("{} {}: {:?}", event.event_type(), layer_id, transition);
            }
            MapEvent::Error(error) => {
                map.on_error(error);
                println!("error: {}", error.message);
            }
        }
    }

    println!("layer order: {}", map.engine().layer_order().join(", "));
    for boundary in &map.config().boundaries {
        let flagged = map
            .engine()
            .flagged(&boundary.source_id, &boundary.source_layer, "hover");
        println!("{} hovered: {:?}", boundary.granularity, flagged);
    }
    println!("cursor: {:?}", map.engine().cursor());
    drop(map);
    print_banner(&banner);
    Ok(())
}

fn print_banner(banner: &ErrorBanner) {
    for message in banner.history() {
        println!("banner: {}", message);
    }
}
