use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};

use logscope_aws::CloudWatchClient;
use logscope_logs::{ForwardPolicy, Traversal, TraversalOutcome};

mod config;
mod output;

use config::{FileConfig, Settings};
use output::OutputOptions;

/// Logscope - list CloudWatch log groups and print recent events from one
#[derive(Parser, Debug)]
#[command(name = "logscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log group to tail (lists log groups when omitted)
    #[arg(value_name = "GROUP")]
    group: Option<String>,

    /// List log groups instead of tailing one
    #[arg(short, long)]
    list: bool,

    /// Only list log groups whose name matches this regex
    #[arg(long, value_name = "REGEX")]
    pattern: Option<String>,

    /// Maximum number of events to print [default: 100]
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Hide Lambda runtime lines (INIT_START, START, END, REPORT)
    #[arg(short, long)]
    suppress_noise: bool,

    /// Only print events whose message starts with a match for this regex
    #[arg(short, long, value_name = "REGEX")]
    grep: Option<String>,

    /// Print each timestamp once above the events that share it
    #[arg(short = 't', long)]
    group_by_timestamp: bool,

    /// Walk streams newest event first, stopping once the limit is reached
    #[arg(short, long)]
    reverse: bool,

    /// How a forward walk treats the limit
    #[arg(long, value_enum, default_value_t = ForwardPolicyArg::ReadToEnd)]
    forward_policy: ForwardPolicyArg,

    /// AWS region
    #[arg(long)]
    region: Option<String>,

    /// AWS profile from the shared config files
    #[arg(long)]
    profile: Option<String>,

    /// Diagnostic verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    debug: u8,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Config file [default: <config dir>/logscope/config.toml]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ForwardPolicyArg {
    /// Read the whole stream and keep the most recent events
    ReadToEnd,
    /// Stop once the limit is reached, keeping the oldest events
    StopAtLimit,
}

impl From<ForwardPolicyArg> for ForwardPolicy {
    fn from(arg: ForwardPolicyArg) -> Self {
        match arg {
            ForwardPolicyArg::ReadToEnd => Self::ReadToEnd,
            ForwardPolicyArg::StopAtLimit => Self::StopAtLimit,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_tracing(args.debug);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over the -d level
fn init_tracing(debug_level: u8) {
    let level = match debug_level {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::load_default()?,
    };
    let settings = Settings::resolve(&args, file);

    // Conflicting modes and bad patterns fail before any AWS call
    settings.traversal.validate()?;

    let client =
        CloudWatchClient::new(settings.profile.as_deref(), settings.region.as_deref()).await?;
    let outcome = Traversal::new(&client).run(&settings.traversal).await?;

    let options = OutputOptions {
        group_by_timestamp: settings.group_by_timestamp,
        json: settings.json,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &outcome {
        TraversalOutcome::Groups(listing) => output::write_groups(&mut out, &listing.groups, options)?,
        TraversalOutcome::Records(result) => output::write_records(&mut out, &result.records, options)?,
        TraversalOutcome::GroupNotFound { name, .. } => {
            eprintln!("Log group '{}' not found", name);
        }
    }
    out.flush()?;

    tracing::info!(query_count = outcome.query_count(), "Done");
    if settings.debug_level > 0 {
        eprintln!("Total queries: {}", outcome.query_count());
    }

    Ok(())
}
