use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use declarative::InstanceIdentity;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ssmdoc")]
#[command(version)]
#[command(about = "Deploy AWS SSM documents from declarative inputs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create or update the document described by the inputs file
    Deploy(DeployArgs),

    /// Delete the deployed document and forget its state
    Remove(InstanceArgs),

    /// Show the recorded state of an instance
    Status(StatusArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Which deployed instance a command acts on
#[derive(Args, Debug, Clone)]
pub struct InstanceArgs {
    /// Application name
    #[arg(long, env = "SSMDOC_APP")]
    pub app: Option<String>,

    /// Stage (dev, prod, ...)
    #[arg(long, env = "SSMDOC_STAGE", default_value = "dev")]
    pub stage: String,

    /// Instance name; generated document names are stable when set
    #[arg(long, env = "SSMDOC_INSTANCE")]
    pub instance: Option<String>,

    /// State file (default: <state dir>/state.toml)
    #[arg(long, env = "SSMDOC_STATE_FILE")]
    pub state_file: Option<PathBuf>,
}

impl InstanceArgs {
    pub fn identity(&self) -> InstanceIdentity {
        let mut identity = InstanceIdentity::new(self.stage.trim());
        if let Some(app) = self.app.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            identity = identity.with_app(app);
        }
        if let Some(instance) = self
            .instance
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty())
        {
            identity = identity.with_instance(instance);
        }
        identity
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    #[command(flatten)]
    pub instance: InstanceArgs,

    /// Inputs file (default: ssmdoc.toml, .yml, .yaml or .json in the current directory)
    #[arg(short, long)]
    pub inputs: Option<PathBuf>,

    /// Show what would change without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[command(flatten)]
    pub instance: InstanceArgs,

    /// Also read the live document and its share permissions
    #[arg(long)]
    pub live: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_deploy() {
        let cli = Cli::try_parse_from([
            "ssmdoc",
            "deploy",
            "--app",
            "billing",
            "--stage",
            "prod",
            "--instance",
            "patching",
            "--inputs",
            "docs/ssmdoc.yaml",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Command::Deploy(args) => {
                assert!(args.dry_run);
                assert_eq!(args.inputs, Some(PathBuf::from("docs/ssmdoc.yaml")));
                assert_eq!(args.instance.identity().key(), "billing.prod.patching");
            }
            _ => panic!("expected deploy"),
        }
    }

    #[test]
    fn test_blank_flags_ignored() {
        let args = InstanceArgs {
            app: Some("  ".to_string()),
            stage: "dev".to_string(),
            instance: None,
            state_file: None,
        };
        let identity = args.identity();
        assert_eq!(identity.app, None);
        assert!(!identity.is_stable());
    }
}
