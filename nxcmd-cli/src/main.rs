mod output;
mod recent;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use log::debug;
use nxcmd_core::config::Config;
use nxcmd_core::model::CommandModel;
use nxcmd_core::model::record::clean_command;

use output::{PredictionOutput, StatsOutput};

/// Number of recent commands used as context by `suggest`.
const CONTEXT_LEN: usize = 2;

/// Contexts tried by `demo`.
const DEMO_CONTEXTS: [&[&str]; 3] = [&["git", "add"], &["cd", "~"], &["ls", "-la"]];

#[derive(Parser)]
#[command(name = "nxcmd", version, about = "Predict your next shell command from your history")]
struct Cli {
	/// History log (JSON lines); overrides the config file
	#[arg(long, global = true, env = "NXCMD_LOG_PATH")]
	log: Option<PathBuf>,

	/// Config file (TOML)
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	/// Print machine-readable JSON
	#[arg(long, global = true)]
	json: bool,

	/// More logging (-v: progress, -vv: lookup details)
	#[arg(short, long, global = true, action = ArgAction::Count)]
	verbose: u8,

	#[command(subcommand)]
	cmd: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Suggest the next command from the most recent ones in the log
	Suggest {
		/// Maximum number of suggestions
		#[arg(short = 'k', long, default_value_t = 5)]
		top_k: usize,
	},
	/// Show predictions after the given commands (oldest first)
	Simulate {
		/// Context commands, e.g. "git add ." "git commit"
		#[arg(required = true)]
		commands: Vec<String>,
		/// Maximum number of suggestions
		#[arg(short = 'k', long, default_value_t = 5)]
		top_k: usize,
	},
	/// Show model statistics and learned patterns
	Stats {
		/// Number of most frequent commands to list
		#[arg(long, default_value_t = 5)]
		top: usize,
		/// Number of learned patterns to list
		#[arg(long, default_value_t = 10)]
		patterns: usize,
	},
	/// Run a short demonstration over the trained model
	Demo,
}

fn init_logging(verbose: u8) {
	let default_filter = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
		.format_timestamp(None)
		.init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	let mut config = Config::load(cli.config.as_deref())?;
	if let Some(log) = cli.log {
		config = config.with_log_path(log);
	}
	debug!("reading history from {}", config.resolved_log_path().display());

	let model = CommandModel::load_and_train(config)?;
	if !cli.json {
		output::print_training(model.report());
	}

	match cli.cmd {
		Command::Suggest { top_k } => {
			let recent = recent::recent_commands(model.config().resolved_log_path(), CONTEXT_LEN)?;
			if recent.is_empty() && !cli.json {
				println!("No recent commands found. Use a few commands in your shell first (ls, cd, git status...).");
				return Ok(());
			}
			let prediction = model.predict(&recent, top_k);
			if cli.json {
				output::print_json(&PredictionOutput { context: &recent, prediction: &prediction })?;
			} else {
				output::print_prediction(&recent, &prediction);
			}
		}
		Command::Simulate { commands, top_k } => {
			let context: Vec<String> = commands.iter().map(|c| clean_command(c)).collect();
			let prediction = model.predict(&context, top_k);
			if cli.json {
				output::print_json(&PredictionOutput { context: &context, prediction: &prediction })?;
			} else {
				output::print_prediction(&context, &prediction);
			}
		}
		Command::Stats { top, patterns } => {
			let stats = model.stats(top);
			let dump = model.debug_dump(patterns);
			if cli.json {
				output::print_json(&StatsOutput { training: model.report(), stats: &stats, patterns: &dump })?;
			} else {
				output::print_stats(&stats);
				println!();
				output::print_patterns(&dump);
			}
		}
		Command::Demo => {
			output::print_stats(&model.stats(5));
			println!();
			output::print_patterns(&model.debug_dump(10));
			println!();
			for context in DEMO_CONTEXTS {
				let context: Vec<String> = context.iter().map(|c| (*c).to_owned()).collect();
				output::print_prediction(&context, &model.predict(&context, 3));
				println!();
			}
		}
	}

	Ok(())
}
