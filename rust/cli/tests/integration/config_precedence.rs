use crate::helpers::cli_runner::CliRunner;
use serde_json::Value;

#[test]
fn cfg_shows_defaults() {
    let cli = CliRunner::new();
    let res = cli.run(&["cfg"]);
    assert_eq!(res.exit_code, 0, "{}", res.stderr);
    let json: Value = serde_json::from_str(&res.stdout).unwrap();

    assert_eq!(json["games"]["value"], 100);
    assert_eq!(json["p1_ai"]["value"], "baseline");
    assert_eq!(json["p2_ai"]["value"], "random");
    assert!(json["seed"]["value"].is_null());
    for key in ["seed", "games", "p1_ai", "p2_ai"] {
        assert_eq!(json[key]["source"], "default", "{key}");
    }
}

#[test]
fn env_beats_file_and_file_beats_default() {
    let cli = CliRunner::new();
    let cfg_path = cli.path("fivepiles.toml");
    std::fs::write(&cfg_path, "seed = 5\ngames = 8\np2_ai = \"baseline\"\n").unwrap();
    let cfg_str = cfg_path.to_string_lossy().to_string();

    let res = cli.run_with_env(
        &["cfg"],
        &[("FIVEPILES_CONFIG", &cfg_str), ("FIVEPILES_GAMES", "3")],
    );
    assert_eq!(res.exit_code, 0, "{}", res.stderr);
    let json: Value = serde_json::from_str(&res.stdout).unwrap();

    assert_eq!(json["seed"]["value"], 5);
    assert_eq!(json["seed"]["source"], "file");
    assert_eq!(json["games"]["value"], 3);
    assert_eq!(json["games"]["source"], "env");
    assert_eq!(json["p2_ai"]["value"], "baseline");
    assert_eq!(json["p2_ai"]["source"], "file");
    assert_eq!(json["p1_ai"]["source"], "default");
}

#[test]
fn flags_beat_env_for_sim() {
    let cli = CliRunner::new();
    let res = cli.run_with_env(
        &["sim", "--games", "1", "--p2", "baseline"],
        &[
            ("FIVEPILES_GAMES", "40"),
            ("FIVEPILES_SEED", "12"),
            ("FIVEPILES_P2_AI", "random"),
        ],
    );
    assert_eq!(res.exit_code, 0, "{}", res.stderr);
    assert!(
        res.stdout
            .contains("sim: games=1 seed=12 p1=BaselineAI p2=BaselineAI"),
        "{}",
        res.stdout
    );
}

#[test]
fn invalid_configuration_exits_two() {
    let cli = CliRunner::new();
    for env in [
        ("FIVEPILES_GAMES", "0"),
        ("FIVEPILES_P1_AI", "oracle"),
        ("FIVEPILES_SEED", "-4"),
    ] {
        let res = cli.run_with_env(&["cfg"], &[env]);
        assert_eq!(res.exit_code, 2, "{env:?}");
        assert!(res.stderr.contains("Invalid configuration"), "{env:?}: {}", res.stderr);
    }
}

#[test]
fn unreadable_config_file_fails_commands_that_need_it() {
    let cli = CliRunner::new();
    let missing = cli.path("missing.toml");
    let missing = missing.to_string_lossy();
    let res = cli.run_with_env(&["sim", "--games", "1"], &[("FIVEPILES_CONFIG", &missing)]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Configuration error"));

    // eval never reads the configuration
    let res = cli.run_with_env(&["eval", "Ah"], &[("FIVEPILES_CONFIG", &missing)]);
    assert_eq!(res.exit_code, 0);
}
