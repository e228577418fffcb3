use std::path::PathBuf;

use clap::{Parser, Subcommand};

const HELP_EPILOG: &str = r#"Config resolution order:
  1) --config/-c PATH
  2) $BROWNIEJAR_CONFIG
  3) XDG default: ~/.config/browniejar/client.yaml
"#;

#[derive(Debug, Parser)]
#[command(
    name = "browniejar",
    version,
    about = "Shared brownie-points jar for two partners",
    long_about = None,
    after_long_help = HELP_EPILOG,
)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Optional subcommand. Without one, watches the jar and logs changes.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in to the data gateway and save the token in the keyring
    Login {
        /// Gateway URL (e.g., https://abcdefgh.supabase.co). Falls back to config or prompt.
        #[arg(long)]
        service: Option<String>,
        /// Account email. Falls back to prompt.
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account plus its profile row, then sign in
    Signup {
        /// Gateway URL. Falls back to config or prompt.
        #[arg(long)]
        service: Option<String>,
        /// Account email. Falls back to prompt.
        #[arg(long)]
        email: Option<String>,
        /// Display name for the new profile. Falls back to prompt.
        #[arg(long)]
        name: Option<String>,
    },
    /// Forget the saved session token
    Logout,
    /// Fetch everything once and print the shared state
    Status {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Task lifecycle: submit, review, delete
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Gift brownie points to your partner
    Gift {
        /// Number of points
        points: i32,
        /// Message shown next to the points
        message: String,
    },
    /// Reward catalogue and redemption
    Reward {
        #[command(subcommand)]
        action: RewardAction,
    },
    /// Link or unlink the partner account
    Partner {
        #[command(subcommand)]
        action: PartnerAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// Submit a completed task for the partner to review
    Submit {
        /// Short description of what was done
        title: String,
        /// Task kind: mental, physical or both
        #[arg(long, default_value = "both")]
        kind: String,
        /// Self-rated effort, 1..=10
        #[arg(long)]
        rating: i32,
    },
    /// Approve a pending task, awarding points to its owner
    Approve { task_id: String },
    /// Reject a partner's pending task with a comment
    Reject { task_id: String, comment: String },
    /// Delete one of your own tasks
    Delete { task_id: String },
}

#[derive(Debug, Subcommand)]
pub enum RewardAction {
    /// Add a reward to the shared catalogue
    Add {
        title: String,
        /// Cost in brownie points
        #[arg(long)]
        cost: i32,
        #[arg(long, default_value = "")]
        description: String,
        /// Icon name shown by presentation layers
        #[arg(long, default_value = "gift")]
        icon: String,
    },
    /// Redeem a reward, spending oldest points first
    Redeem { reward_id: String },
    /// Remove a reward from the catalogue
    Delete { reward_id: String },
}

#[derive(Debug, Subcommand)]
pub enum PartnerAction {
    /// Link with your partner by their account email
    Link { email: String },
    /// Remove the link on both profiles
    Unlink,
}
