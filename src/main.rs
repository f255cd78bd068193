use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use pr_cli::Result;
use pr_cli::commands::pick::PickArgs;
use pr_cli::commands::{completions, pick};
use pr_cli::error::{PickError, exit_code_for};

#[derive(Parser)]
#[command(name = "pr-cli")]
#[command(about = "Cherry-pick upstream commits onto a new branch and open a pull request")]
#[command(version)]
pub struct Cli {
    /// Print debug output, including every external command
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick commits onto a new branch based on <UPSTREAM_BRANCH>
    #[command(visible_alias = "p")]
    Pick {
        /// Upstream branch to base the new branch on
        #[arg(value_hint = ValueHint::Other)]
        upstream_branch: Option<String>,
        /// Don't fetch the pull remote first
        #[arg(long)]
        skip_fetch: bool,
        /// Push the branch without opening a pull request
        #[arg(long)]
        no_pr: bool,
        /// Name of the branch to create (prompted for if omitted)
        #[arg(short, long, value_hint = ValueHint::Other)]
        branch: Option<String>,
        /// Commits to pick, repeatable or comma separated. Skips the selection menu
        #[arg(long, value_delimiter = ',')]
        commits: Option<Vec<String>>,
        /// Remote holding the upstream branch [default: upstream]
        #[arg(long, env = "PR_CLI_PULL_REMOTE")]
        pull_remote: Option<String>,
        /// Remote to push the new branch to [default: origin]
        #[arg(long, env = "PR_CLI_PUSH_REMOTE")]
        push_remote: Option<String>,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<PickError>() {
                Some(pick_error) if pick_error.is_silent() => {}
                Some(pick_error) => eprintln!("{}", style(pick_error).red()),
                None => eprintln!("{} {:#}", style("fatal:").red().bold(), e),
            }
            ExitCode::from(u8::try_from(exit_code_for(&e)).unwrap_or(1))
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pr_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pr_cli=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Pick {
            upstream_branch,
            skip_fetch,
            no_pr,
            branch,
            commits,
            pull_remote,
            push_remote,
            yes,
        } => {
            let args = PickArgs {
                upstream_branch,
                skip_fetch,
                no_pr,
                branch,
                commits,
                pull_remote,
                push_remote,
                yes,
            };
            pick::pick(&args)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            completions::generate_completions(shell, &mut cmd);
        }
    }

    Ok(())
}
