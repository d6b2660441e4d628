//! Configuration command handler.
//!
//! Prints the resolved configuration as pretty JSON, one entry per key with
//! its value and where that value came from:
//!
//! ```json
//! {
//!   "games": {
//!     "value": 100,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if the configuration is unreadable or invalid.
pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(e.into());
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "games": {
            "value": config.games,
            "source": sources.games,
        },
        "p1_ai": {
            "value": config.p1_ai,
            "source": sources.p1_ai,
        },
        "p2_ai": {
            "value": config.p2_ai,
            "source": sources.p2_ai,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GAMES_ENV, P2_AI_ENV};
    use serial_test::serial;

    fn clear_env() {
        for key in [
            config::CONFIG_ENV,
            config::SEED_ENV,
            GAMES_ENV,
            config::P1_AI_ENV,
            P2_AI_ENV,
        ] {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_cfg_displays_values_with_sources() {
        clear_env();
        unsafe {
            std::env::set_var(P2_AI_ENV, "baseline");
        }
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_cfg_command(&mut out, &mut err);
        clear_env();
        result.unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains('\n') && output.contains("  "), "pretty JSON");
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["games"]["value"], 100);
        assert_eq!(json["games"]["source"], "default");
        assert!(json["seed"]["value"].is_null());
        assert_eq!(json["p1_ai"]["value"], "baseline");
        assert_eq!(json["p2_ai"]["value"], "baseline");
        assert_eq!(json["p2_ai"]["source"], "env");
        assert!(err.is_empty());
    }

    #[test]
    #[serial]
    fn test_cfg_reports_invalid_configuration() {
        clear_env();
        unsafe {
            std::env::set_var(GAMES_ENV, "0");
        }
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_cfg_command(&mut out, &mut err);
        clear_env();

        assert!(matches!(result, Err(CliError::Config(_))));
        assert!(out.is_empty());
        let errors = String::from_utf8(err).unwrap();
        assert!(errors.starts_with("Error: Invalid configuration"));
    }
}
