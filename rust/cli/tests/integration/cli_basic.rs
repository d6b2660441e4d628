use crate::helpers::cli_runner::CliRunner;

#[test]
fn help_lists_all_commands() {
    let cli = CliRunner::new();
    let res = cli.run(&["--help"]);
    assert_eq!(res.exit_code, 0, "--help should exit with code 0");
    for cmd in ["deal", "eval", "play", "sim", "verify", "cfg"] {
        assert!(res.stdout.contains(cmd), "help should list `{}`", cmd);
    }
}

#[test]
fn version_prints_and_exits_zero() {
    let cli = CliRunner::new();
    let res = cli.run(&["--version"]);
    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.starts_with("fivepiles "));
}

#[test]
fn unknown_subcommand_exits_two_with_command_list() {
    let cli = CliRunner::new();
    let res = cli.run(&["replay"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stdout.is_empty());
    assert!(res.stderr.contains("Usage: fivepiles <command> [options]"));
    assert!(res.stderr.contains("  verify"));
}

#[test]
fn deal_is_deterministic_for_a_seed() {
    let cli = CliRunner::new();
    let first = cli.run(&["deal", "--seed", "99"]);
    let second = cli.run(&["deal", "--seed", "99"]);
    assert_eq!(first.exit_code, 0);
    assert_eq!(first.stdout, second.stdout);
    assert!(first.stdout.contains("Deck: 41"));
}

#[test]
fn deal_rejects_non_numeric_seed() {
    let cli = CliRunner::new();
    let res = cli.run(&["deal", "--seed", "abc"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("invalid value"));
}

#[test]
fn eval_compares_two_piles() {
    let cli = CliRunner::new();
    let res = cli.run(&["eval", "9h", "9d", "9s", "--vs", "Ah,Ad"]);
    assert_eq!(res.exit_code, 0, "{}", res.stderr);
    assert!(res.stdout.contains("=> Three of a Kind"));
    assert!(res.stdout.contains("=> Pair"));
    assert!(res.stdout.contains("Winner: pile"));
}

#[test]
fn eval_rejects_six_cards() {
    let cli = CliRunner::new();
    let res = cli.run(&["eval", "2c", "3c", "4c", "5c", "6c", "7c"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("at most 5 cards"));
}
