use nxcmd_core::model::stats::{ContextSummary, ModelStats};
use nxcmd_core::model::{Prediction, Strategy, TrainingReport};
use serde::Serialize;

/// JSON shape of `suggest` / `simulate`.
#[derive(Serialize)]
pub struct PredictionOutput<'a> {
	pub context: &'a [String],
	#[serde(flatten)]
	pub prediction: &'a Prediction,
}

/// JSON shape of `stats`.
#[derive(Serialize)]
pub struct StatsOutput<'a> {
	pub training: &'a TrainingReport,
	pub stats: &'a ModelStats,
	pub patterns: &'a [ContextSummary],
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

/// Progress line printed after training (stderr, so stdout stays clean).
pub fn print_training(report: &TrainingReport) {
	if !report.log_found {
		eprintln!("History log not found, the model is empty.");
		return;
	}
	eprintln!(
		"Parsed {} sessions, learned {} command patterns ({} lines skipped).",
		report.sessions, report.patterns, report.segmentation.malformed
	);
}

pub fn print_prediction(context: &[String], prediction: &Prediction) {
	println!("After: {}", context.join(" → "));

	if prediction.is_empty() {
		println!("No suggestion found. Use more commands to enrich the model.");
		return;
	}

	if prediction.strategy == Strategy::Fuzzy {
		println!("No exact match, closest patterns:");
	} else {
		println!("Suggested next commands:");
	}
	for (i, candidate) in prediction.candidates.iter().enumerate() {
		println!("  {}. {} (seen {} times)", i + 1, candidate.command, candidate.count);
	}
}

pub fn print_stats(stats: &ModelStats) {
	println!("=== Model statistics ===");
	println!("Learned contexts: {}", stats.contexts);
	println!("Distinct transitions: {}", stats.transitions);
	println!("Observed transitions: {}", stats.observations);
	println!("Most frequent commands:");
	for candidate in &stats.top_commands {
		println!("  {} ({})", candidate.command, candidate.count);
	}
}

pub fn print_patterns(patterns: &[ContextSummary]) {
	println!("=== Learned patterns ===");
	for summary in patterns {
		let next: Vec<String> = summary
			.candidates
			.iter()
			.map(|c| format!("{} ({})", c.command, c.count))
			.collect();
		println!("After {}: {}", summary.context, next.join(", "));
	}
}
