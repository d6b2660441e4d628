use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Variables that would leak the developer's own configuration into a test.
const CONFIG_VARS: [&str; 6] = [
    "FIVEPILES_CONFIG",
    "FIVEPILES_SEED",
    "FIVEPILES_GAMES",
    "FIVEPILES_P1_AI",
    "FIVEPILES_P2_AI",
    "FIVEPILES_SIM_BREAK_AFTER",
];

#[derive(Debug)]
pub struct CliRunner {
    binary_path: PathBuf,
    temp_dir: tempfile::TempDir,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[allow(dead_code)]
impl CliRunner {
    pub fn new() -> Self {
        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_fivepiles")),
            temp_dir: tempfile::tempdir().expect("create CLI scratch directory"),
        }
    }

    /// Scratch directory the binary runs in; removed on drop.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn run(&self, args: &[&str]) -> CliResult {
        self.run_inner(args, &[], None)
    }

    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> CliResult {
        self.run_inner(args, env, None)
    }

    pub fn run_with_input(&self, args: &[&str], input: &str) -> CliResult {
        self.run_inner(args, &[], Some(input))
    }

    fn run_inner(&self, args: &[&str], env: &[(&str, &str)], input: Option<&str>) -> CliResult {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for key in CONFIG_VARS {
            cmd.env_remove(key);
        }
        for (key, value) in env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().expect("failed to spawn CLI binary");
        if let Some(payload) = input
            && let Some(mut stdin) = child.stdin.take()
        {
            // the binary may exit before reading everything
            let _ = stdin.write_all(payload.as_bytes());
        }
        let output = child.wait_with_output().expect("failed to read output");

        CliResult {
            exit_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
