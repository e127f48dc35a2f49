use std::process::ExitCode;

use clap::Parser;
use healthman::{
    client::{PlanClient, SubmitError, DEFAULT_ENDPOINT},
    model::{PlanKind, RawForm},
};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Submit the fitness form to a running healthman proxy and print the plan.
#[derive(Debug, Parser)]
#[command(name = "healthman-cli", version)]
struct Args {
    #[arg(long, env = "HEALTHMAN_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    #[arg(long, default_value = "")]
    name: String,
    /// Weight in kg
    #[arg(long, default_value = "")]
    weight: String,
    /// Height in cm
    #[arg(long, default_value = "")]
    height: String,
    #[arg(long, default_value = "")]
    age: String,
    /// male, female or other
    #[arg(long, default_value = "")]
    gender: String,
    #[arg(long = "goal", default_value = "")]
    fitness_goal: String,
    #[arg(long = "level", default_value = "")]
    fitness_level: String,
    /// Ask for a diet recommendation instead of an exercise plan
    #[arg(long)]
    diet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let kind = if args.diet {
        PlanKind::Diet
    } else {
        PlanKind::Exercise
    };
    let raw = RawForm {
        name: args.name,
        weight: args.weight,
        height: args.height,
        age: args.age,
        gender: args.gender,
        fitness_goal: args.fitness_goal,
        fitness_level: args.fitness_level,
        plan: String::new(),
    };

    let client = PlanClient::new(args.endpoint);
    eprintln!("Loading...");

    match client.submit(&raw, kind).await {
        Ok(report) => {
            println!("{}", report.to_text());
            ExitCode::SUCCESS
        }
        Err(SubmitError::Form(err)) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
        Err(SubmitError::Request(err)) => {
            error!(%err, "failed to fetch plan");
            eprintln!("{}", kind.failure_message());
            ExitCode::FAILURE
        }
    }
}
