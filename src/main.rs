use anomalab::config::AppConfig;
use anomalab::dashboard::{present, Dashboard, DashboardSnapshot};
use anomalab::dataset;
use anomalab::engine::PlaybackRunner;
use anomalab::prediction::HttpPredictionClient;
use anomalab::telemetry::equipment;
use anomalab::AppContext;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "anomalab", about = "Simulated telemetry and anomaly scoring", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// YAML or JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Playback speed multiplier
    #[arg(long, global = true)]
    speed: Option<f64>,
    /// Seed for the telemetry generator
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Print the final dashboard snapshot as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the simulated equipment catalog
    Equipment,
    /// Connect to simulated equipment and play its telemetry
    Simulate {
        #[arg(long, default_value = "industrial-pump")]
        equipment: String,
    },
    /// Replay a CSV or JSON dataset
    Replay {
        file: PathBuf,
        /// Label the file through the prediction endpoint first
        #[arg(long)]
        predict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "anomalab=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.common)?;
    let mut ctx = AppContext::new(config);

    match cli.command {
        Commands::Equipment => {
            for profile in equipment::catalog() {
                println!(
                    "{:<16} {} ({} channels)",
                    profile.id,
                    profile.name,
                    profile.channels.len()
                );
                println!("{:<16} {}", "", profile.description);
            }
            return Ok(());
        }
        Commands::Simulate { equipment } => {
            ctx.connect(&equipment)
                .with_context(|| format!("failed to connect to {}", equipment))?;
        }
        Commands::Replay { file, predict } => {
            if predict {
                let client = HttpPredictionClient::from_config(&ctx.config().prediction)?;
                ctx.upload(&client, &file)
                    .await
                    .with_context(|| format!("prediction failed for {:?}", file))?;
            } else {
                let data = dataset::load_file(&file)
                    .with_context(|| format!("failed to load {:?}", file))?;
                ctx.set_dataset(data);
            }
        }
    }

    let dashboard = ctx
        .open_dashboard()
        .context("no data source: connect equipment or load a dataset")?;
    let snapshot = play(dashboard, cli.common.speed).await?;

    if cli.common.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_summary(&snapshot);
    }
    Ok(())
}

fn load_config(args: &CommonArgs) -> Result<AppConfig> {
    let config = match &args.config {
        Some(path) => AppConfig::load(path).with_context(|| format!("failed to load {:?}", path))?,
        None => AppConfig::default(),
    };
    let mut config = config.with_env_overrides()?;
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    Ok(config)
}

async fn play(dashboard: Dashboard, speed: Option<f64>) -> Result<DashboardSnapshot> {
    let label = dashboard.source().label();
    let mut runner = PlaybackRunner::new(dashboard, label);
    if let Some(speed) = speed {
        runner.set_speed(speed)?;
    }

    let mut progress = runner.subscribe();
    if runner.run_info().is_complete() {
        println!("Nothing to play");
    } else {
        runner.play()?;
        loop {
            tokio::select! {
                changed = progress.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let run = *progress.borrow_and_update();
                    println!(
                        "{:>5.1}%  {}/{} points, {} anomalies",
                        run.progress_percent(),
                        run.processed_points(),
                        run.total_points(),
                        run.anomalies_found()
                    );
                    if run.is_complete() {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!("Interrupted");
                    break;
                }
            }
        }
        runner.stop();
    }

    println!("\n{}", runner.monitor().generate_report());
    Ok(runner.read(present))
}

fn print_summary(snapshot: &DashboardSnapshot) {
    println!("\nSource: {}", snapshot.source_label);
    println!(
        "Distribution: {} normal, {} anomaly",
        snapshot.distribution.normal, snapshot.distribution.anomaly
    );

    if !snapshot.feature_importance.is_empty() {
        println!("\nFeature importance:");
        for feature in &snapshot.feature_importance {
            println!("  {:<24} {:.3}", feature.name, feature.value);
        }
    }

    println!("\nChannels:");
    for channel in &snapshot.channels {
        let current = channel
            .current_value
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<16} {:>10} {:<6} [{:.2}, {:.2}] {}",
            channel.name,
            current,
            channel.unit,
            channel.normal_range.min,
            channel.normal_range.max,
            channel.status.name()
        );
    }
}
