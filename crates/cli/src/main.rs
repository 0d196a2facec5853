use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use engine::{run_pipeline, EvaluationProtocol, EvaluationResult, PipelineOutcome};
use store::{StoreClient, DEFAULT_NAMESPACE};
use strategies::{ItemAverageStrategy, ItemUserAverageStrategy, StrategyRegistry};
use tracing::info;

/// MediaAdviser - batch recommendation pipeline
///
/// Scores every registered recommendation strategy against held-out
/// ratings from the store, then persists the winner's per-user
/// recommendation lists back to the store. One pass, then exit.
#[derive(Parser)]
#[command(name = "media-adviser")]
#[command(about = "Selects the best recommendation strategy and persists per-user recommendations", long_about = None)]
struct Cli {
    /// Key-value store host
    host: String,

    /// Key-value store port
    port: u16,

    /// Namespace for rating input and recommendation output keys
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting media-adviser batch pass");

    // No store connection at all is the one fatal condition
    let store = StoreClient::connect(&cli.host, cli.port, cli.namespace)
        .await
        .context("could not reach the key-value store")?;

    // Registration order doubles as the selection tie-break order
    let registry = StrategyRegistry::new()
        .register(ItemAverageStrategy)
        .register(ItemUserAverageStrategy);

    let outcome = run_pipeline(&store, &registry, &EvaluationProtocol::default()).await?;
    print_outcome(&outcome);

    Ok(())
}

/// Render the terminal outcome of the pass
fn print_outcome(outcome: &PipelineOutcome) {
    match outcome {
        PipelineOutcome::Completed {
            selected,
            evaluations,
            written,
            write_failures,
        } => {
            print_scores(evaluations);
            println!("{} Selected {}", "✓".green(), selected.bold());
            if *write_failures > 0 {
                println!(
                    "Persisted recommendation lists for {} users ({} writes failed)",
                    written,
                    write_failures.to_string().red()
                );
            } else {
                println!("Persisted recommendation lists for {} users", written);
            }
        }
        PipelineOutcome::NoUsableStrategy { evaluations } => {
            print_scores(evaluations);
            println!("{}", "No recommendations found.".yellow());
        }
    }
}

fn print_scores(evaluations: &[EvaluationResult]) {
    for result in evaluations {
        match result.score {
            Some(score) => println!(
                "Evaluated {} with score {:.4}",
                result.strategy.bold(),
                score
            ),
            None => println!("Evaluated {} with no usable score", result.strategy.bold()),
        }
    }
}
