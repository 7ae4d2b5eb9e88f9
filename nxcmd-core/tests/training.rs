use std::collections::HashMap;
use std::io::Write;

use nxcmd_core::config::Config;
use nxcmd_core::model::session::segment;
use nxcmd_core::model::{Candidate, CommandModel, Context, Strategy, TransitionStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::NamedTempFile;

const NOW: i64 = 1_750_000_000;
const T0: i64 = 1_700_000_000;

fn record(cmd: &str, ts: i64) -> String {
	format!(r#"{{"cmd":"{cmd}","ts":{ts},"exit_code":0}}"#)
}

fn write_log(lines: &[String]) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	for line in lines {
		writeln!(file, "{line}").unwrap();
	}
	file
}

#[test]
fn learns_from_a_realistic_log_file() {
	let lines = vec![
		record("825  cd ~/project", T0),
		record("git status", T0 + 5),
		r#"{"cmd":"git commit -m "wip"","ts":1700000010}"#.to_owned(),
		record("git push", T0 + 20),
		"not json at all".to_owned(),
		r#"{"cmd":"cargo tset","ts":1700000030,"exit_code":101}"#.to_owned(),
		record("# just a note", T0 + 40),
		// Two hours later: a new session.
		record("cd ~/project", T0 + 7200),
		record("git status", T0 + 7210),
		record("git diff", T0 + 7220),
	];
	let file = write_log(&lines);

	let model = CommandModel::load_and_train(Config::default().with_log_path(file.path())).unwrap();
	let report = model.report();
	assert!(report.log_found);
	assert_eq!(report.sessions, 2);
	assert_eq!(report.segmentation.malformed, 1);
	assert_eq!(report.segmentation.rejected_failed, 1);
	assert_eq!(report.segmentation.rejected_comment, 1);

	let after_status = model.predict(&["cd ~/project", "git status"], 5);
	assert_eq!(after_status.strategy, Strategy::Exact);
	assert_eq!(
		after_status.candidates,
		vec![
			Candidate::new(r#"git commit -m "wip""#, 1),
			Candidate::new("git diff", 1),
			// order-1 context repeats what order-2 already returned
			Candidate::new(r#"git commit -m "wip""#, 1),
			Candidate::new("git diff", 1),
		]
	);

	let after_cd = model.store().get(&Context::unigram("cd ~/project")).unwrap();
	assert_eq!(after_cd.count("git status"), 2);
}

#[test]
fn missing_file_yields_empty_model() {
	let dir = tempfile::tempdir().unwrap();
	let model = CommandModel::load_and_train(Config::default().with_log_path(dir.path().join("absent.jsonl"))).unwrap();
	assert_eq!(model.store(), &TransitionStore::new());
	assert!(model.predict(&["ls"], 3).is_empty());
	assert!(model.stats(5).top_commands.is_empty());
}

#[test]
fn retraining_unchanged_log_is_deterministic() {
	let lines: Vec<String> = ["vim a.rs", "cargo build", "cargo test", "vim a.rs", "cargo build", "cargo run"]
		.iter()
		.enumerate()
		.map(|(i, cmd)| record(cmd, T0 + i as i64 * 60))
		.collect();
	let file = write_log(&lines);
	let config = Config::default().with_log_path(file.path());

	let first = CommandModel::load_and_train(config.clone()).unwrap();
	let second = CommandModel::load_and_train(config).unwrap();
	assert_eq!(first.store(), second.store());
	assert_eq!(first.predict(&["cargo build"], 2), second.predict(&["cargo build"], 2));
	assert_eq!(
		first.predict(&["cargo build"], 2).candidates,
		vec![Candidate::new("cargo run", 1), Candidate::new("cargo test", 1)]
	);
}

#[test]
fn random_logs_respect_session_invariants() {
	let config = Config::default();
	let mut rng = StdRng::seed_from_u64(0x5eed);

	for _ in 0..50 {
		let mut ts = T0;
		let mut lines = Vec::new();
		let mut times = HashMap::new();
		for id in 0..rng.random_range(0..60) {
			ts += if rng.random_bool(0.2) {
				rng.random_range(601..5000)
			} else {
				rng.random_range(0..=600)
			};
			let cmd = format!("cmd{id}");
			times.insert(cmd.clone(), ts);
			lines.push(record(&cmd, ts));
		}

		let result = segment(&lines, &config, NOW);

		let mut previous_id = None;
		for session in &result.sessions {
			assert!(session.len() >= 2, "short session {session:?}");

			for pair in session.commands().windows(2) {
				let gap = times[&pair[1]] - times[&pair[0]];
				assert!(gap <= config.session_gap_secs, "gap {gap} inside a session");
			}

			// Sessions keep log order.
			for cmd in session.commands() {
				let id: usize = cmd[3..].parse().unwrap();
				assert!(previous_id.is_none_or(|p| id > p));
				previous_id = Some(id);
			}
		}

		// A session boundary lies between the two records of every long gap.
		for session in &result.sessions {
			let first = times[&session.commands()[0]];
			let last = times[&session.commands()[session.len() - 1]];
			for (cmd, &t) in &times {
				if t > first && t < last {
					assert!(session.commands().contains(cmd), "{cmd} missing inside its time span");
				}
			}
		}
	}
}
