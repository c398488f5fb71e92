use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(
    name = "sandboxctl",
    about = "Cloud Ops Sandbox deployment manager",
    long_about = "Provisions and tears down the Cloud Ops Sandbox demo application \
                  on GKE by driving gcloud and terraform",
    version,
    propagate_version = true,
    arg_required_else_help = true,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Verbose output (log every external command)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

// Every value-taking flag also accepts its underscore spelling
// (`--cluster_name` etc.), kept from the original tool's interface.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision the sandbox in a Google Cloud project
    Create {
        /// GKE cluster location
        #[arg(long, alias = "cluster_location", value_name = "LOCATION")]
        cluster_location: Option<String>,

        /// GKE cluster name
        #[arg(long, alias = "cluster_name", value_name = "NAME")]
        cluster_name: Option<String>,

        /// Google Cloud project id to deploy into
        #[arg(long, alias = "project_id", value_name = "PROJECT")]
        project_id: Option<String>,

        /// Namespace prefix for the remote terraform state
        #[arg(long, alias = "terraform_prefix", value_name = "PREFIX")]
        terraform_prefix: Option<String>,

        /// Do not install the service mesh
        #[arg(long, alias = "skip_asm")]
        skip_asm: bool,

        /// Do not deploy the synthetic load generator
        #[arg(long, alias = "skip_loadgenerator")]
        skip_loadgenerator: bool,
    },

    /// Tear down a previously provisioned sandbox
    Delete {
        /// Google Cloud project id holding the deployment
        #[arg(long, alias = "project_id", value_name = "PROJECT")]
        project_id: Option<String>,

        /// Namespace prefix the deployment was created under
        #[arg(long, alias = "terraform_prefix", value_name = "PREFIX")]
        terraform_prefix: Option<String>,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
