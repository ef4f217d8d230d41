use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use nlc_stub::{
    ClassifierParams, ClassifyParams, CreateClassifierParams, InputSource, MemoryStore,
    NaturalLanguageClassifier, NlcConfig, NlcError, Response,
};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snapshot file of the local store (defaults to the user data directory)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a classifier from a metadata file and a training data file
    Create {
        /// JSON file with `language` and optional `name`
        #[arg(short, long)]
        metadata: PathBuf,
        /// Training file with one `phrase,class_name` per line
        #[arg(short, long)]
        training_data: PathBuf,
    },
    /// List all classifiers
    List,
    /// Show the status of a classifier
    Status { classifier_id: String },
    /// Classify a text
    Classify { classifier_id: String, text: String },
    /// Delete a classifier
    Delete { classifier_id: String },
}

fn render<T: Serialize>(response: Response<T>) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&response)?)
}

async fn run(
    nlc: &NaturalLanguageClassifier<MemoryStore>,
    command: Command,
) -> anyhow::Result<String> {
    match command {
        Command::Create { metadata, training_data } => {
            let metadata = InputSource::open_file(&metadata)
                .await
                .with_context(|| format!("Failed to open metadata file {:?}", metadata))?;
            let training_data = InputSource::open_file(&training_data)
                .await
                .with_context(|| format!("Failed to open training data file {:?}", training_data))?;
            let params = CreateClassifierParams {
                training_metadata: Some(metadata),
                training_data: Some(training_data),
            };
            render(nlc.create_classifier(params).await?)
        }
        Command::List => render(nlc.list_classifiers().await?),
        Command::Status { classifier_id } => {
            render(nlc.get_classifier(ClassifierParams::new(classifier_id)).await?)
        }
        Command::Classify { classifier_id, text } => {
            render(nlc.classify(ClassifyParams::new(classifier_id, text)).await?)
        }
        Command::Delete { classifier_id } => {
            render(nlc.delete_classifier(ClassifierParams::new(classifier_id)).await?)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => NlcConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => NlcConfig::default(),
    };
    let mut config = config.with_env_overrides()?;
    if let Some(snapshot) = args.snapshot {
        config.store.snapshot_path = Some(snapshot);
    }

    let snapshot = config.snapshot_path();
    info!("Using store snapshot {:?}", snapshot);
    let store = MemoryStore::open(&snapshot).await?;

    let result = match NaturalLanguageClassifier::connect(store, config).await {
        Ok(nlc) => run(&nlc, args.command).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(err) => match err.downcast_ref::<NlcError>() {
            Some(nlc_error) => {
                eprintln!("{}", serde_json::to_string_pretty(&nlc_error.body())?);
                std::process::exit(1);
            }
            None => Err(err),
        },
    }
}
