// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `init`, `inspect`, `classify`
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use crate::application::init_use_case::{FewShotConfig, MixerKind};

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a freshly initialised model and save it as a bundle
    Init(InitArgs),

    /// Show which component types a bundle contains
    Inspect(InspectArgs),

    /// Score the queries of an episode file against its examples
    Classify(ClassifyArgs),
}

/// Mixer choice as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MixerArg {
    Concat,
    Add,
}

impl From<MixerArg> for MixerKind {
    fn from(m: MixerArg) -> Self {
        match m {
            MixerArg::Concat => MixerKind::Concat,
            MixerArg::Add    => MixerKind::Add,
        }
    }
}

/// All arguments for the `init` command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write model.bin and fewshot_config.json into
    #[arg(long, default_value = "bundle")]
    pub out_dir: String,

    /// Width of one flattened example image
    #[arg(long, default_value_t = 64)]
    pub example_dim: usize,

    /// Width of one flattened query image
    #[arg(long, default_value_t = 64)]
    pub input_dim: usize,

    /// Width of the knowledge vector the encoder emits per example
    #[arg(long, default_value_t = 32)]
    pub knowledge_dim: usize,

    /// Hidden layer sizes of the encoder, comma separated
    #[arg(long, value_delimiter = ',', default_value = "128")]
    pub encoder_hidden: Vec<usize>,

    /// How knowledge and query rows are combined
    #[arg(long, value_enum, default_value_t = MixerArg::Concat)]
    pub mixer: MixerArg,

    /// Output width of the add mixer (ignored for concat)
    #[arg(long, default_value_t = 64)]
    pub mixed_dim: usize,

    /// Hidden layer sizes of the classifier, comma separated
    #[arg(long, value_delimiter = ',', default_value = "64")]
    pub classifier_hidden: Vec<usize>,

    /// Number of scores per query
    #[arg(long, default_value_t = 1)]
    pub num_outputs: usize,
}

/// Convert CLI InitArgs into the application-layer FewShotConfig.
impl From<&InitArgs> for FewShotConfig {
    fn from(a: &InitArgs) -> Self {
        FewShotConfig {
            example_dim:       a.example_dim,
            input_dim:         a.input_dim,
            knowledge_dim:     a.knowledge_dim,
            encoder_hidden:    a.encoder_hidden.clone(),
            mixer:             a.mixer.into(),
            mixed_dim:         a.mixed_dim,
            classifier_hidden: a.classifier_hidden.clone(),
            num_outputs:       a.num_outputs,
        }
    }
}

/// All arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Bundle directory written by `init`
    #[arg(long, default_value = "bundle")]
    pub bundle_dir: String,
}

/// All arguments for the `classify` command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Episode JSON file: {"examples": [[..]], "inputs": [[..]]}
    #[arg(long)]
    pub episode: String,

    /// Bundle directory written by `init`
    #[arg(long, default_value = "bundle")]
    pub bundle_dir: String,

    /// Print raw pre-sigmoid scores instead of probabilities
    #[arg(long)]
    pub logits: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_init_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "fontshot", "init",
            "--example-dim", "16",
            "--encoder-hidden", "32,8",
            "--mixer", "add",
            "--classifier-hidden", "4",
        ])
        .unwrap();

        let Commands::Init(args) = cli.command else { panic!("expected init") };
        let cfg = FewShotConfig::from(&args);
        assert_eq!(cfg.example_dim, 16);
        assert_eq!(cfg.encoder_hidden, vec![32, 8]);
        assert_eq!(cfg.mixer, MixerKind::Add);
        assert_eq!(cfg.classifier_hidden, vec![4]);
        assert_eq!(args.out_dir, "bundle");
    }

    #[test]
    fn test_classify_requires_episode() {
        assert!(Cli::try_parse_from(["fontshot", "classify"]).is_err());
    }
}
