//! Route preview binary - prints computed directions without starting the server
//!
//! Usage:
//!   cargo run --bin route -- <from-id> <to-id> [language]
//!   cargo run --bin route -- --demo 1 7 he     # Against an in-memory demo campus
//!
//! Optional environment variables:
//! - DATABASE_URL (defaults to sqlite://data/wayfinder.sqlite)

use anyhow::{bail, Context, Result};
use tracing::info;
use wayfinder::db::Database;

const USAGE: &str = "Usage: route [--demo] <from-id> <to-id> [language]";

struct PreviewArgs {
    demo: bool,
    from_id: i64,
    to_id: i64,
    language: String,
}

fn parse_args(args: &[String]) -> Result<PreviewArgs> {
    let demo = args.iter().any(|arg| arg == "--demo");
    let positional: Vec<&String> = args.iter().filter(|arg| !arg.starts_with("--")).collect();

    let (from, to) = match positional.as_slice() {
        [from, to, ..] => (from, to),
        _ => bail!(USAGE),
    };
    let from_id = from
        .trim()
        .parse()
        .with_context(|| format!("Invalid origin id '{}'", from))?;
    let to_id = to
        .trim()
        .parse()
        .with_context(|| format!("Invalid destination id '{}'", to))?;
    let language = positional
        .get(2)
        .map(|l| l.to_string())
        .unwrap_or_else(|| "en".to_string());

    Ok(PreviewArgs {
        demo,
        from_id,
        to_id,
        language,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wayfinder=warn".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    let db = if args.demo {
        let db = Database::connect_in_memory().await?;
        db.seed_demo_data().await.context("Failed to seed demo data")?;
        db
    } else {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/wayfinder.sqlite".to_string());
        info!("Opening {}", url);
        Database::connect(&url).await?
    };

    let result = db
        .compute_directions(args.from_id, args.to_id, &args.language)
        .await
        .context("Failed to compute directions")?;

    println!("\n{}", "=".repeat(60));
    println!("{} -> {} ({})", result.from.name, result.to.name, result.language);
    println!("{}", "=".repeat(60));
    if result.steps.is_empty() {
        println!("You are already there.");
    }
    for (index, step) in result.steps.iter().enumerate() {
        println!("{:>2}. {}", index + 1, step.instruction);
    }
    println!("{}", "-".repeat(60));
    println!("Total: {} m in {} steps", result.total_distance, result.steps.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(&args(&["1", "7", "he"])).unwrap();
        assert_eq!((parsed.from_id, parsed.to_id), (1, 7));
        assert_eq!(parsed.language, "he");
        assert!(!parsed.demo);

        let parsed = parse_args(&args(&["--demo", "2", "3"])).unwrap();
        assert!(parsed.demo);
        assert_eq!(parsed.language, "en");
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(parse_args(&args(&["1"])).is_err());
        assert!(parse_args(&args(&["one", "2"])).is_err());
    }
}
