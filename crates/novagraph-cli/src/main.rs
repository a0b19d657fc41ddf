use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use novagraph::{
    AssetProvider, BundledAssets, DirAssets, Embedder, IdSource, Injection, LayoutParams,
    RandomIds, RecordingSink, SeededIds, WidgetConfig, build_html,
};
use novagraph_graph::GraphData;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author = "Simon Zeng", version, about = "Render force-directed graph widgets")]
struct Args {
    /// Enable verbose output
    #[arg(short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a graph JSON file into a widget document
    Render {
        /// Graph data file with `nodes` and `links`
        #[arg()]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Widget config file (TOML)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Directory holding index.html, global.css and novagraph.js (defaults to the bundled copy)
        #[arg(long)]
        assets_dir: Option<PathBuf>,

        /// How data reaches the bundle: 'event' or 'placeholder' (default: from config, else event)
        #[arg(long, value_parser = ["event", "placeholder"])]
        injection: Option<String>,

        /// Width of the main visualization window
        #[arg(long)]
        width: Option<f64>,

        /// Iframe height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Force strength between nodes, range [-200, 60)
        #[arg(long, allow_hyphen_values = true)]
        node_strength: Option<f64>,

        /// Force strength of links, range [0, 5)
        #[arg(long)]
        link_strength: Option<f64>,

        /// Link distance, range [0, width / 3)
        #[arg(long)]
        link_distance: Option<f64>,

        /// Force strength to avoid node collision, range [0, 20)
        #[arg(long)]
        collide_strength: Option<f64>,

        /// Emit the notebook iframe fragment instead of the bare document
        #[arg(long)]
        iframe: bool,

        /// Seed for the iframe id (random when omitted)
        #[arg(long, requires = "iframe")]
        seed: Option<u64>,
    },
    /// Print structural diagnostics for a graph JSON file
    Inspect {
        /// Graph data file with `nodes` and `links`
        #[arg()]
        input: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_graph(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read graph file {}: {}", path.display(), e))?;
    let data = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse graph file {}: {}", path.display(), e))?;
    Ok(data)
}

fn parse_injection(name: &str) -> Injection {
    match name {
        "event" => Injection::Event,
        "placeholder" => Injection::Placeholder,
        _ => unreachable!("Invalid injection validated by clap"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    tracing::debug!(?args, "parsed arguments");

    match args.command {
        Command::Render {
            input,
            output,
            config,
            assets_dir,
            injection,
            width,
            height,
            node_strength,
            link_strength,
            link_distance,
            collide_strength,
            iframe,
            seed,
        } => {
            let mut config = match config {
                Some(path) => WidgetConfig::from_file(&path)?,
                None => WidgetConfig::default(),
            };

            // Command-line flags win over the config file
            if let Some(name) = injection {
                config.injection = parse_injection(&name);
            }
            config.width = width.or(config.width);
            config.height = height.or(config.height);
            config.node_strength = node_strength.or(config.node_strength);
            config.link_strength = link_strength.or(config.link_strength);
            config.link_distance = link_distance.or(config.link_distance);
            config.collide_strength = collide_strength.or(config.collide_strength);

            let params: LayoutParams = config.layout();
            let data = read_graph(&input)?;

            let assets: Box<dyn AssetProvider> = match assets_dir {
                Some(dir) => Box::new(DirAssets::new(dir)),
                None => Box::new(BundledAssets),
            };

            let rendered = if iframe {
                let ids: Box<dyn IdSource> = match seed {
                    Some(seed) => Box::new(SeededIds::new(seed)),
                    None => Box::new(RandomIds),
                };
                let mut embedder = Embedder::new(assets, ids, RecordingSink::new())
                    .with_injection(config.injection);
                embedder.render(&data, &params)?;
                embedder.into_sink().items.concat()
            } else {
                build_html(&data, &params, assets, config.injection)?.into_string()
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
                    tracing::info!(path = %path.display(), "wrote widget");
                }
                None => println!("{rendered}"),
            }
        }
        Command::Inspect { input } => {
            let data = read_graph(&input)?;
            let graph: GraphData = serde_json::from_value(data).map_err(|e| {
                format!(
                    "Graph file {} does not match the nodes/links shape: {}",
                    input.display(),
                    e
                )
            })?;
            print!("{}", graph.summary());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render_flags() {
        let args = Args::parse_from([
            "novagraph",
            "render",
            "graph.json",
            "--node-strength",
            "-50",
            "--injection",
            "placeholder",
            "--iframe",
            "--seed",
            "3",
        ]);

        match args.command {
            Command::Render {
                input,
                node_strength,
                injection,
                iframe,
                seed,
                ..
            } => {
                assert_eq!(input, PathBuf::from("graph.json"));
                assert_eq!(node_strength, Some(-50.0));
                assert_eq!(injection.as_deref(), Some("placeholder"));
                assert!(iframe);
                assert_eq!(seed, Some(3));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_seed_requires_iframe() {
        let result = Args::try_parse_from(["novagraph", "render", "g.json", "--seed", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_injection_values() {
        assert_eq!(parse_injection("event"), Injection::Event);
        assert_eq!(parse_injection("placeholder"), Injection::Placeholder);
        assert!(Args::try_parse_from(["novagraph", "render", "g.json", "--injection", "svg"]).is_err());
    }

    #[test]
    fn test_read_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(&path, r#"{"nodes":[],"links":[]}"#).unwrap();

        let data = read_graph(&path).unwrap();
        assert!(data["nodes"].as_array().unwrap().is_empty());

        let missing = read_graph(&dir.path().join("missing.json")).unwrap_err();
        assert!(missing.to_string().starts_with("Failed to read graph file"));
    }
}
