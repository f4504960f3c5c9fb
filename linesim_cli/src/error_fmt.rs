//! Human-readable error descriptions and structured JSON error formatting.

use linesim_core::BuildError;
use linesim_world::WorldError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first; search the whole chain so wrapped errors still match
    for cause in err.chain() {
        if let Some(be) = cause.downcast_ref::<BuildError>() {
            return match be {
                BuildError::NoSensors => {
                    "What happened: The sensor array has no sensors.\nLikely causes: sensors.offsets is empty.\nHow to fix: List at least one [x, y] offset under [sensors].".to_string()
                }
                BuildError::SensorCount { what, expected, got } => format!(
                    "What happened: Sensor {what} count mismatch (expected {expected}, got {got}).\nLikely causes: sensors.offsets and sensors.{what} have different lengths.\nHow to fix: Give one entry per sensor in every [sensors] list."
                ),
                BuildError::InvalidConfig(msg) => format!(
                    "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
                ),
            };
        }
        if let Some(we) = cause.downcast_ref::<WorldError>() {
            return match we {
                WorldError::UnknownLayout(name) => format!(
                    "What happened: Unknown layout '{name}'.\nLikely causes: Typo in --layout or simulation.layout.\nHow to fix: Use one of: {}.",
                    linesim_world::LAYOUT_NAMES.join(", ")
                ),
                other => format!(
                    "What happened: {other}.\nLikely causes: A layout refers to a tile that does not exist.\nHow to fix: Re-run with --log-level=debug for details."
                ),
            };
        }
        if let Some(te) = cause.downcast_ref::<toml::de::Error>() {
            return format!(
                "What happened: The config file could not be parsed.\nLikely causes: TOML syntax error, a wrong value type, or a missing [simulation] section.\nHow to fix: {}",
                te.message()
            );
        }
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("failed to read config") {
        let cause = err.root_cause();
        return format!(
            "What happened: {msg}.\nLikely causes: Wrong --config path or missing permissions ({cause}).\nHow to fix: Pass --config with a readable TOML file."
        );
    }

    // Config::validate messages all name the offending key
    if lower.contains(" must ") || lower.contains(" entries but ") {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range or inconsistent values in the TOML.\nHow to fix: Edit the config file, then rerun."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 for build errors, 4 for world errors, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    for cause in err.chain() {
        if cause.is::<BuildError>() {
            return 3;
        }
        if cause.is::<WorldError>() {
            return 4;
        }
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    for cause in err.chain() {
        if cause.is::<BuildError>() {
            return "BuildError";
        }
        if cause.is::<WorldError>() {
            return "WorldError";
        }
        if cause.is::<toml::de::Error>() {
            return "ConfigParse";
        }
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;

    #[test]
    fn wrapped_world_error_keeps_its_code() {
        let err: eyre::Result<()> = Err(WorldError::UnknownLayout("maze".into()).into());
        let err = err.wrap_err("building layout 'maze'").expect_err("error");
        assert_eq!(exit_code_for_error(&err), 4);
        assert!(humanize(&err).contains("oval, cross, gap"));
        assert!(format_error_json(&err).contains("\"reason\":\"WorldError\""));
    }

    #[test]
    fn build_error_is_explained() {
        let err = eyre::Report::new(BuildError::SensorCount {
            what: "radii",
            expected: 3,
            got: 2,
        });
        assert_eq!(exit_code_for_error(&err), 3);
        assert!(humanize(&err).contains("expected 3, got 2"));
    }

    #[test]
    fn validation_messages_are_reported_as_invalid_config() {
        let err = eyre::eyre!("simulation.dt must be > 0");
        assert_eq!(exit_code_for_error(&err), 1);
        assert!(humanize(&err).starts_with("What happened: Invalid configuration"));
    }
}
