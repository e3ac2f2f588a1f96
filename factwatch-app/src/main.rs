use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use factwatch_common::observability::init_logging;
use factwatch_common::Source;
use factwatch_config::{
    analysis_from_file, default_config_path, default_settings_path, FactwatchConfig,
    FactwatchConfigLoader, JsonFileStore,
};
use std::path::PathBuf;
use wiring::{build_aggregator, build_fact_checker, load_settings};

mod wiring;

#[derive(Parser, Debug)]
#[command(name = "factwatch", about = "Claim analytics over social posts", version)]
struct Cli {
    /// YAML config file; defaults to the per-user factwatch.yaml when present.
    #[arg(long, global = true, env = "FACTWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Settings JSON holding the fact-check keys.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect and analyse posts matching a query; prints the result as JSON.
    Analyze {
        query: String,
        /// Sources to query. Defaults to the ones enabled in the config.
        #[arg(long, value_delimiter = ',')]
        sources: Vec<Source>,
        /// Analysis settings file replacing the `analysis` section.
        #[arg(long)]
        analysis: Option<PathBuf>,
        /// Answer from the built-in mock data set.
        #[arg(long)]
        mock: bool,
    },
    /// Extract and verify the factual claims in a post.
    FactCheck {
        text: String,
        /// Rate every extracted claim on the 1-3 confidence scale instead.
        #[arg(long)]
        score: bool,
    },
    /// Store fact-check credentials.
    Settings {
        #[arg(long)]
        openai_key: Option<String>,
        #[arg(long)]
        perplexity_key: Option<String>,
        #[arg(long)]
        demo_mode: Option<bool>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<FactwatchConfig> {
    let loader = FactwatchConfigLoader::new();
    let loader = match (path, default_config_path()) {
        (Some(p), _) => loader.with_file(p),
        (None, Some(p)) => loader.with_optional_file(p),
        (None, None) => loader,
    };
    loader.load().context("loading factwatch config")
}

fn settings_store(path: Option<PathBuf>) -> Result<JsonFileStore> {
    path.or_else(default_settings_path)
        .map(JsonFileStore::new)
        .context("no settings path; pass --settings")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_ref())?;
    let log_path = init_logging(cfg.logging.to_log_config("factwatch"))?;
    tracing::debug!(log = %log_path.display(), "factwatch.start");

    match cli.command {
        Command::Analyze {
            query,
            sources,
            analysis,
            mock,
        } => {
            let mut analysis_cfg = match analysis {
                Some(p) => analysis_from_file(&p)
                    .with_context(|| format!("loading analysis settings {}", p.display()))?,
                None => cfg.analysis.clone(),
            };
            if mock {
                analysis_cfg.collection.use_mock_data = true;
            }
            let selected = if sources.is_empty() {
                analysis_cfg.collection.sources.enabled()
            } else {
                sources
            };

            let aggregator = build_aggregator(&cfg.services, &analysis_cfg)?;
            let result = aggregator.analyze(&query, &selected, &analysis_cfg).await;
            print_json(&result)
        }
        Command::FactCheck { text, score } => {
            let store = settings_store(cli.settings)?;
            let settings = load_settings(&store, &cfg.services)?;
            let checker = build_fact_checker(&settings, &cfg.services)?;
            if score {
                let claims = checker.extract_claims(&text).await;
                let mut scored = Vec::with_capacity(claims.len());
                for claim in &claims {
                    scored.push(checker.score_claim(claim).await);
                }
                print_json(&scored)
            } else {
                print_json(&checker.check(&text).await)
            }
        }
        Command::Settings {
            openai_key,
            perplexity_key,
            demo_mode,
        } => {
            let mut store = settings_store(cli.settings)?;
            let mut settings = factwatch_config::ExtensionSettings::load(&store)?;
            if let Some(k) = openai_key {
                settings.openai_key = k;
            }
            if let Some(k) = perplexity_key {
                settings.perplexity_key = k;
            }
            if let Some(d) = demo_mode {
                settings.demo_mode = d;
            }
            settings.save(&mut store)?;
            tracing::info!(path = %store.path().display(), "settings.saved");
            println!("saved {}", store.path().display());
            Ok(())
        }
    }
}
