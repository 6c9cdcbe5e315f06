//! `heir-merkle` command-line front end.
//!
//! ```text
//! heir-merkle [OPTIONS] <COMMAND>
//!
//! Commands:
//!   generate     Build a plan from a JSON request and write the plan files
//!   leaf         Compute the leaf for one heir
//!   verify       Check a heir proof file against a root or plan file
//!   entitlement  Estimate the amount owed for one asset
//!   gate         Evaluate whether a claim is currently possible
//!
//! Options:
//!   -c, --config <FILE>      Engine configuration (JSON)
//!   -p, --profile <PROFILE>  Built-in profile when no config file is given
//!   -v, --verbose            Enable logging (filter via RUST_LOG)
//! ```
//!
//! Every command prints pretty JSON on stdout. `verify` exits with status 1
//! when the proof does not check out.

use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heir_merkle::entitlement::{self, parse_amount};
use heir_merkle::gate::{self, period_seconds_from_days, ClaimFacts};
use heir_merkle::leaf::{pack_leaf, shares_from_values, HeirId};
use heir_merkle::plan::{
    read_heir_file, read_plan_file, read_plan_request, write_plan_files, Address,
};
use heir_merkle::{DistributionPlan, EngineConfig, EngineError, FileError, Hash, Profile};

#[derive(Parser, Debug)]
#[command(name = "heir-merkle", version, about = "Merkle commitments for inheritance plans")]
struct Cli {
    /// Engine configuration file (JSON).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Built-in profile used when no configuration file is given.
    #[arg(short, long, global = true, value_enum, default_value_t = ProfileArg::Standard)]
    profile: ProfileArg,

    /// Enable logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    Standard,
    WebClientV1,
}

impl From<ProfileArg> for Profile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Standard => Profile::Standard,
            ProfileArg::WebClientV1 => Profile::WebClientV1,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a plan from a JSON request and write the plan files.
    Generate {
        /// Plan request (tokens, includeNative, heirs).
        #[arg(short, long)]
        input: PathBuf,
        /// Output directory for merkleTree.json and heir files.
        #[arg(short, long)]
        out_dir: PathBuf,
        /// Owner address recorded in every heir file.
        #[arg(long)]
        owner: Option<String>,
    },
    /// Compute the leaf for one heir.
    Leaf {
        #[arg(long)]
        heir_id: String,
        /// Comma-separated shares in basis points.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        shares: Vec<i64>,
    },
    /// Check a heir proof file against a root or plan file.
    Verify {
        /// Heir proof file.
        #[arg(long)]
        proof: PathBuf,
        /// Plan file providing the root.
        #[arg(long, conflicts_with = "root", required_unless_present = "root")]
        tree: Option<PathBuf>,
        /// Root as 0x-prefixed or bare hex.
        #[arg(long)]
        root: Option<String>,
    },
    /// Estimate the amount owed for one asset.
    Entitlement {
        #[arg(long, allow_negative_numbers = true)]
        share: i64,
        /// Vault balance in base units.
        #[arg(long)]
        balance: String,
        #[arg(long)]
        claimed: bool,
    },
    /// Evaluate whether a claim is currently possible.
    Gate {
        /// Current unix time; defaults to the system clock.
        #[arg(long)]
        now: Option<u64>,
        #[arg(long)]
        switch_enabled: Option<bool>,
        #[arg(long)]
        last_activity: Option<u64>,
        #[arg(long, conflicts_with = "period_days")]
        period: Option<u64>,
        #[arg(long)]
        period_days: Option<u64>,
        #[arg(long)]
        claimed: Option<bool>,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn invalid_arg(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgument { .. } => 2,
            CliError::Engine(_) => 3,
            CliError::File(_) => 4,
            CliError::Json(_) => 5,
        }
    }
}

type CliResult<T> = Result<T, CliError>;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        init_logging();
    }

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(e.exit_code());
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heir_merkle=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> CliResult<EngineConfig> {
    match &cli.config {
        Some(path) => Ok(EngineConfig::from_json_file(path)?),
        None => Ok(EngineConfig::from_profile(cli.profile.into())),
    }
}

/// Executes the command; `Ok(false)` means the command ran but the answer
/// was negative.
fn run(cli: Cli) -> CliResult<bool> {
    let config = load_config(&cli)?;
    tracing::debug!(?config, "configuration resolved");

    match cli.command {
        Commands::Generate {
            input,
            out_dir,
            owner,
        } => {
            let owner = owner.as_deref().map(Address::parse).transpose()?;
            let request = read_plan_request(&input)?;
            let plan = DistributionPlan::from_request(&request, &config)?;
            let written = write_plan_files(&plan, &out_dir, owner)?;
            print_json(&json!({
                "root": plan.root(),
                "heirs": plan.heirs().len(),
                "planFile": written.plan.display().to_string(),
                "heirFiles": written
                    .heirs
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>(),
            }))?;
            Ok(true)
        }
        Commands::Leaf { heir_id, shares } => {
            let heir_id: HeirId = heir_id.parse()?;
            let shares_bps = shares_from_values(&shares)?;
            let leaf = config.leaf_encoder().encode(&heir_id, &shares_bps);
            let packed = pack_leaf(&heir_id, &shares_bps, config.packing);
            print_json(&json!({
                "heirId": heir_id,
                "sharesBps": shares_bps,
                "packing": config.packing,
                "packed": format!("0x{}", hex::encode(packed)),
                "leaf": leaf,
            }))?;
            Ok(true)
        }
        Commands::Verify { proof, tree, root } => {
            let heir = read_heir_file(&proof)?;
            // a plan file carries the packing it was built with
            let (root, in_plan, packing) = match (tree, root) {
                (Some(tree), _) => {
                    let plan = read_plan_file(&tree)?;
                    let in_plan = plan.contains_leaf(&heir.leaf);
                    (plan.root, Some(in_plan), plan.packing)
                }
                (None, Some(root)) => (Hash::from_hex(&root)?, None, config.packing),
                (None, None) => return Err(CliError::invalid_arg("either --tree or --root is required")),
            };
            let leaf_matches = heir.check_leaf(packing);
            let proof_valid = heir.verify_against(&root);
            let valid = leaf_matches && proof_valid && in_plan.unwrap_or(true);
            print_json(&json!({
                "heirId": heir.heir_id,
                "root": root,
                "leafMatches": leaf_matches,
                "proofValid": proof_valid,
                "leafInPlan": in_plan,
                "packing": packing,
                "valid": valid,
            }))?;
            Ok(valid)
        }
        Commands::Entitlement {
            share,
            balance,
            claimed,
        } => {
            let balance = parse_amount(&balance)?;
            let owed = entitlement::entitlement(share, &balance, claimed);
            print_json(&json!({
                "shareBps": share,
                "appliedBps": entitlement::clamp_bps(share),
                "vaultBalance": balance.to_string(),
                "alreadyClaimed": claimed,
                "entitled": owed.to_string(),
            }))?;
            Ok(true)
        }
        Commands::Gate {
            now,
            switch_enabled,
            last_activity,
            period,
            period_days,
            claimed,
        } => {
            let now = match now {
                Some(now) => now,
                None => unix_now()?,
            };
            let facts = ClaimFacts {
                switch_enabled,
                last_activity_at: last_activity,
                period_seconds: period.or(period_days.map(period_seconds_from_days)),
                claimed,
            };
            let report = gate::evaluate(&facts, now);
            print_json(&json!({
                "now": now,
                "report": report,
                "remainingText": report.remaining.map(|remaining| remaining.to_string()),
            }))?;
            Ok(true)
        }
    }
}

fn unix_now() -> CliResult<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|err| CliError::invalid_arg(format!("system clock before unix epoch: {err}")))
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
