// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
// Three commands are supported:
//   1. `init`     — build a fresh model bundle
//   2. `inspect`  — list the component types inside a bundle
//   3. `classify` — score an episode file with a bundle
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{ClassifyArgs, Commands, InitArgs, InspectArgs};

/// The main CLI struct
#[derive(Parser, Debug)]
#[command(
    name = "fontshot",
    version,
    about = "Few-shot classifier: learn a class from a few examples, then score new inputs."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init(args)     => run_init(args),
            Commands::Inspect(args)  => run_inspect(args),
            Commands::Classify(args) => run_classify(args),
        }
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    use crate::application::init_use_case::InitUseCase;

    tracing::info!("Initialising model bundle in: {}", args.out_dir);
    let size = InitUseCase::new((&args).into(), args.out_dir.clone()).execute()?;

    println!("Model saved to '{}' ({} bytes).", args.out_dir, size);
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let report = InspectUseCase::new(args.bundle_dir.clone()).execute()?;
    println!("bundle:     {} ({} bytes)", args.bundle_dir, report.bytes);
    println!("encoder:    {}", report.encoder);
    println!("mixer:      {}", report.mixer);
    println!("classifier: {}", report.classifier);
    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    use crate::application::classify_use_case::ClassifyUseCase;
    use crate::data::loader::EpisodeLoader;
    use crate::domain::traits::{EpisodeSource, FewShotClassifier};

    let episode = EpisodeLoader::new(&args.episode).load_episode()?;
    let classifier = ClassifyUseCase::new(args.bundle_dir)?;
    let rows = classifier.classify(&episode)?;

    for row in rows {
        let values = if args.logits { row.logits.clone() } else { row.probabilities() };
        let shown: Vec<String> = values.iter().map(|v| format!("{v:.4}")).collect();
        println!("query {:>3}: {}", row.query, shown.join(" "));
    }
    Ok(())
}
