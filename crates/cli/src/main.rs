use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use agent_client::StageOutput;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{ActivityRef, Recommendation, ReferenceCatalog};
use pipeline::{normalize, AgentResult, RecommendationError};
use server::{
    build_runner, init_tracing, AgentBackend, ErrorResponse, MultiActivityRequest,
    RecommendationResponse, RecommendationService, SingleActivityRequest,
};

/// GreenRecs - sustainability recommendation engine
#[derive(Parser)]
#[command(name = "green-recs")]
#[command(about = "Emission reduction recommendations from an agent pipeline", long_about = None)]
struct Cli {
    /// Path to the reference dataset
    #[arg(short, long, default_value = "data/reference_catalog.json")]
    catalog: PathBuf,

    /// Agent backend answering the stages (llm or catalog)
    #[arg(short, long, default_value = "llm", value_parser = parse_backend)]
    backend: AgentBackend,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommendations for one activity, skipping earlier ones
    Single {
        #[arg(long)]
        activity_id: String,

        #[arg(long)]
        activity_name: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "2")]
        amount: NonZeroU32,

        /// A previously issued recommendation (repeatable)
        #[arg(long)]
        history: Vec<String>,

        #[arg(long, default_value = "1.1")]
        scope: String,

        #[arg(long, default_value = "org-local")]
        organization_id: String,
    },

    /// Recommendations across several activities
    Multi {
        /// Activity as id:name (repeatable)
        #[arg(long = "activity", required = true, value_parser = parse_activity)]
        activities: Vec<ActivityRef>,

        /// Maximum number of recommendations to return
        #[arg(long, default_value = "2")]
        amount: NonZeroU32,

        #[arg(long, default_value = "1.1")]
        scope: String,

        #[arg(long, default_value = "org-local")]
        organization_id: String,
    },

    /// List activities in the reference dataset
    Activities {
        /// Case-insensitive substring of the activity name
        #[arg(long)]
        search: Option<String>,
    },

    /// Classify and normalize a saved agent output
    Normalize {
        /// File holding the raw agent output
        file: PathBuf,
    },
}

fn parse_backend(s: &str) -> Result<AgentBackend> {
    s.parse()
}

fn parse_activity(s: &str) -> Result<ActivityRef> {
    let (id, name) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("expected id:name, got {s:?}"))?;
    if id.trim().is_empty() || name.trim().is_empty() {
        return Err(anyhow!("activity id and name must not be empty: {s:?}"));
    }
    Ok(ActivityRef::new(id.trim(), name.trim()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("warn");

    let cli = Cli::parse();

    match cli.command {
        Commands::Single {
            activity_id,
            activity_name,
            amount,
            history,
            scope,
            organization_id,
        } => {
            let service = build_service(&cli.catalog, cli.backend)?;
            let request = SingleActivityRequest {
                scope_name: scope.clone(),
                scope,
                recommendation_amount: amount,
                activity_id,
                activity_name,
                organization_id,
                recommendation_history: history,
            };
            let start = Instant::now();
            let result = service.single_activity(&request).await;
            print_result(result, cli.json, start)?;
        }
        Commands::Multi {
            activities,
            amount,
            scope,
            organization_id,
        } => {
            let service = build_service(&cli.catalog, cli.backend)?;
            let request = MultiActivityRequest {
                scope_name: scope.clone(),
                scope,
                max_recommendation_amount: amount,
                activities,
                organization_id,
            };
            let start = Instant::now();
            let result = service.multi_activity(&request).await;
            print_result(result, cli.json, start)?;
        }
        Commands::Activities { search } => {
            let catalog = load_catalog(&cli.catalog)?;
            handle_activities(&catalog, search, cli.json)?;
        }
        Commands::Normalize { file } => handle_normalize(&file, cli.json)?,
    }

    Ok(())
}

fn load_catalog(path: &Path) -> Result<Arc<ReferenceCatalog>> {
    let catalog = ReferenceCatalog::load_from_file(path)
        .with_context(|| format!("Failed to load reference dataset from {}", path.display()))?;
    Ok(Arc::new(catalog))
}

fn build_service(catalog: &Path, backend: AgentBackend) -> Result<RecommendationService> {
    let catalog = load_catalog(catalog)?;
    let runner = build_runner(backend)?;
    Ok(RecommendationService::new(runner, catalog))
}

/// Handle the 'activities' command
fn handle_activities(catalog: &ReferenceCatalog, search: Option<String>, json: bool) -> Result<()> {
    let needle = search.map(|s| s.to_lowercase());
    let activities: Vec<ActivityRef> = catalog
        .activities()
        .into_iter()
        .filter(|a| {
            needle
                .as_ref()
                .map_or(true, |n| a.name.to_lowercase().contains(n.as_str()))
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&activities)?);
        return Ok(());
    }

    let (activity_count, record_count) = catalog.counts();
    println!(
        "{}",
        format!(
            "Reference dataset: {} activities, {} records",
            activity_count, record_count
        )
        .bold()
        .blue()
    );
    if activities.is_empty() {
        println!("{}", "No matching activities".yellow());
    }
    for activity in &activities {
        let stats = catalog.get_activity_stats(&activity.id);
        println!(
            "{}  {} ({} recommendations, avg reduction {:.1}%, best feasibility {:.2})",
            activity.id.green(),
            activity.name.bold(),
            stats.map(|s| s.recommendation_count).unwrap_or(0),
            stats.map(|s| s.avg_reduction_percentage).unwrap_or(0.0),
            stats.map(|s| s.best_feasibility_score).unwrap_or(0.0),
        );
    }
    Ok(())
}

/// Handle the 'normalize' command
fn handle_normalize(file: &Path, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let result = AgentResult::classify(&StageOutput::from_raw(raw));

    if !json {
        let shape = match &result {
            AgentResult::Parsed(_) => "parsed JSON".to_string(),
            AgentResult::Sentinel(flag) => format!("sentinel ({})", flag),
            AgentResult::Malformed(reason) => format!("malformed ({})", reason),
        };
        println!("{} {}", "Classified as:".bold(), shape);
    }

    let recommendations = normalize(&result).map(|recommendations| RecommendationResponse {
        recommendations,
        token_usage: None,
    });
    print_result(recommendations, json, Instant::now())
}

fn print_result(
    result: std::result::Result<RecommendationResponse, RecommendationError>,
    json: bool,
    start: Instant,
) -> Result<()> {
    match result {
        Ok(response) if json => println!("{}", serde_json::to_string_pretty(&response)?),
        Ok(response) => {
            print_recommendations(&response.recommendations);
            if let Some(tokens) = response.token_usage {
                println!("{} {}", "Tokens used:".cyan(), tokens);
            }
            println!("{} {:.2?}", "Elapsed:".cyan(), start.elapsed());
        }
        Err(err) if json => {
            println!("{}", serde_json::to_string_pretty(&ErrorResponse::from(err))?)
        }
        Err(err) => println!("{} [{}] {}", "✗".red(), err.code(), err),
    }
    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[Recommendation]) {
    print!("{}", "Recommendations:\n".bold().blue());
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} [{}]",
            (i + 1).to_string().green(),
            rec.recommendation.bold(),
            rec.activity_name
        );
        println!(
            "   impact {} | feasibility {} ({:.2}) | reduction {:.1}% | cost {:.0}",
            rec.impact_level, rec.feasibility_level, rec.feasibility_score,
            rec.estimated_reduction_percentage, rec.cost
        );
        println!(
            "   {} / {}",
            rec.technology_status, rec.infrastructure_requirements
        );
    }
}
