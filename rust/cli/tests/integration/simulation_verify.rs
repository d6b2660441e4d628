use crate::helpers::cli_runner::CliRunner;
use fivepiles_engine::logger::MatchRecord;
use fivepiles_engine::scoring::Outcome;

fn read_records(path: &std::path::Path) -> Vec<MatchRecord> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid record"))
        .collect()
}

#[test]
fn sim_output_verifies_cleanly() {
    let cli = CliRunner::new();
    let res = cli.run(&[
        "sim", "--games", "5", "--seed", "21", "--output", "out/matches.jsonl",
    ]);
    assert_eq!(res.exit_code, 0, "{}", res.stderr);
    assert!(res.stdout.contains("Simulated: 5 games"));

    let path = cli.path("out/matches.jsonl");
    let records = read_records(&path);
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.result.is_some() && !r.aborted));

    let res = cli.run(&["verify", "--input", "out/matches.jsonl"]);
    assert_eq!(res.exit_code, 0, "{}", res.stderr);
    assert!(res.stdout.contains("Verify: OK (matches=5, completed=5, aborted=0)"));
}

#[test]
fn sim_is_reproducible_with_a_seed() {
    let cli = CliRunner::new();
    let a = cli.run(&["sim", "--games", "3", "--seed", "8", "--output", "a.jsonl"]);
    let b = cli.run(&["sim", "--games", "3", "--seed", "8", "--output", "b.jsonl"]);
    assert_eq!(a.exit_code, 0);
    assert_eq!(b.exit_code, 0);

    let strip = |records: Vec<MatchRecord>| -> Vec<(u64, usize)> {
        records.iter().map(|r| (r.seed, r.actions.len())).collect()
    };
    let ra = read_records(&cli.path("a.jsonl"));
    let rb = read_records(&cli.path("b.jsonl"));
    assert_eq!(
        ra.iter().map(|r| &r.actions).collect::<Vec<_>>(),
        rb.iter().map(|r| &r.actions).collect::<Vec<_>>()
    );
    assert_eq!(strip(ra), strip(rb));
}

#[test]
fn verify_flags_a_tampered_record() {
    let cli = CliRunner::new();
    let res = cli.run(&["sim", "--games", "2", "--seed", "2", "--output", "m.jsonl"]);
    assert_eq!(res.exit_code, 0);

    let path = cli.path("m.jsonl");
    let mut records = read_records(&path);
    if let Some(result) = records[1].result.as_mut() {
        result.winner = if result.winner == Outcome::Tie {
            Outcome::Player1
        } else {
            Outcome::Tie
        };
    }
    let body: Vec<String> = records
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect();
    std::fs::write(&path, format!("\u{feff}{}\r\n", body.join("\r\n"))).unwrap();

    let res = cli.run(&["verify", "--input", "m.jsonl"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stdout.contains("Verify: FAIL (matches=2)"));
    assert!(res.stderr.contains("Record 2: Recorded result differs from replay"));
    assert!(!res.stderr.contains("Record 1:"));
}

#[test]
fn verify_missing_input_exits_two() {
    let cli = CliRunner::new();
    let res = cli.run(&["verify", "--input", "nope.jsonl"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("I/O error"));
}

#[test]
fn break_after_reports_interruption_and_keeps_written_records() {
    let cli = CliRunner::new();
    let res = cli.run_with_env(
        &["sim", "--games", "4", "--seed", "1", "--output", "partial.jsonl"],
        &[("FIVEPILES_SIM_BREAK_AFTER", "2")],
    );
    assert_eq!(res.exit_code, 130);
    assert!(res.stdout.contains("Interrupted: saved 2/4"));
    assert_eq!(read_records(&cli.path("partial.jsonl")).len(), 2);

    let res = cli.run(&["verify", "--input", "partial.jsonl"]);
    assert_eq!(res.exit_code, 0, "{}", res.stderr);
}

#[test]
fn zero_games_is_rejected() {
    let cli = CliRunner::new();
    let res = cli.run(&["sim", "--games", "0"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("games must be >= 1"));
}
