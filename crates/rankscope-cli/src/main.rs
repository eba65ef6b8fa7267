use clap::{Parser, Subcommand};

use rankscope_engine::{build_snapshot_rows, snapshot_chart, MarketEngine};

#[derive(Debug, Parser)]
#[command(name = "rankscope-cli")]
#[command(about = "SEO market analysis command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a full market analysis and print it as JSON.
    Analyze {
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        /// Print only the summary block.
        #[arg(long)]
        summary: bool,
    },
    /// Print the dual-axis SEO snapshot chart configuration as JSON.
    Chart {
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = rankscope_core::load_app_config_from_env()?;
    let engine = MarketEngine::from_config(&config)?;

    match cli.command {
        Commands::Analyze {
            city,
            state,
            summary,
        } => {
            let analysis = engine.analyze(&city, &state).await?;
            if summary {
                println!("{}", serde_json::to_string_pretty(&analysis.summary)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            }
        }
        Commands::Chart { city, state } => {
            let analysis = engine.analyze(&city, &state).await?;
            let config = snapshot_chart(&build_snapshot_rows(&analysis));
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
