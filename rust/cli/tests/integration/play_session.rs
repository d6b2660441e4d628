use crate::helpers::cli_runner::CliRunner;
use crate::helpers::scripted_input;

#[test]
fn quitting_exits_with_interrupted_code() {
    let cli = CliRunner::new();
    let res = cli.run_with_input(&["play", "--seed", "4"], "q\n");
    assert_eq!(res.exit_code, 130);
    assert!(res.stdout.contains("play: vs=ai seed=4"));
    assert!(res.stdout.contains("Game abandoned."));
}

#[test]
fn closed_stdin_is_an_interruption() {
    let cli = CliRunner::new();
    let res = cli.run_with_input(&["play", "--vs", "human", "--seed", "4"], "");
    assert_eq!(res.exit_code, 130);
}

#[test]
fn full_game_against_baseline_ai() {
    let cli = CliRunner::new();
    let input = scripted_input(314, "baseline");
    let res = cli.run_with_input(&["play", "--seed", "314", "--ai", "baseline"], &input);
    assert_eq!(res.exit_code, 0, "{}", res.stderr);
    assert!(res.stdout.contains("Game over."));
    assert_eq!(res.stdout.matches("\nPile ").count(), 5, "{}", res.stdout);
    assert!(res.stdout.contains("Result: P1 "));
}

#[test]
fn bad_moves_are_reported_and_the_game_continues() {
    let cli = CliRunner::new();
    let input = format!("p Ah 9\nsplit\n{}", scripted_input(8, "baseline"));
    let res = cli.run_with_input(&["play", "--seed", "8"], &input);
    assert_eq!(res.exit_code, 0, "{}", res.stderr);
    let errors: Vec<&str> = res.stderr.lines().collect();
    assert_eq!(errors.len(), 2, "{}", res.stderr);
    assert!(errors[1].contains("Unrecognized command 'split'"));
}

#[test]
fn unknown_ai_exits_two() {
    let cli = CliRunner::new();
    let res = cli.run_with_input(&["play", "--ai", "oracle"], "q\n");
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("unknown AI type: oracle"));
}
