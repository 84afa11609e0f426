#[cfg(test)]
mod tests {
    use crate::redaction::register_for_redaction;
    use crate::{
        Encoding, Error, Logger, LoggingConfig, MemoryWriter, Output, Sampling, Secret, Severity,
    };
    use serde_json::Value;
    use std::io;
    use tracing::{debug, error, info, info_span, warn};

    fn capture(config: &LoggingConfig) -> (Logger, MemoryWriter) {
        let out = MemoryWriter::new();
        let logger = Logger::with_writer(config, out.clone()).expect("logger builds");
        (logger, out)
    }

    fn json_lines(out: &MemoryWriter) -> Vec<Value> {
        out.lines()
            .iter()
            .map(|line| serde_json::from_str(line).expect("each line is a JSON object"))
            .collect()
    }

    fn emit_each_severity() {
        debug!("debug record");
        info!("info record");
        warn!("warn record");
        error!("error record");
    }

    #[test]
    fn test_info_and_debug_scenario() {
        let (logger, out) = capture(&LoggingConfig::production(Severity::Debug));

        logger.in_scope(|| {
            info!(name = "demo", vcpu = 8, "created vm at provider");
            debug!(
                username = "ram",
                password = %Secret::new("admin"),
                "read userinfo from db"
            );
        });

        let lines = out.lines();
        assert_eq!(lines.len(), 2, "got {lines:?}");

        assert!(lines[0].contains("\"level\":\"info\""));
        assert!(lines[0].contains("\"name\":\"demo\""));
        assert!(lines[0].contains("\"vcpu\":8"));

        assert!(lines[1].contains("\"level\":\"debug\""));
        assert!(lines[1].contains("\"password\":\"****\""));
        assert!(!lines[1].contains("admin"));
    }

    #[test]
    fn test_threshold_suppresses_lower_severities() {
        for threshold in Severity::ALL {
            let (logger, out) = capture(&LoggingConfig::production(threshold));
            logger.in_scope(emit_each_severity);

            let levels: Vec<String> = json_lines(&out)
                .iter()
                .map(|record| record["level"].as_str().unwrap_or_default().to_string())
                .collect();
            let expected: Vec<String> = Severity::ALL
                .iter()
                .filter(|severity| **severity >= threshold)
                .map(|severity| severity.as_str().to_string())
                .collect();

            assert_eq!(levels, expected, "threshold {threshold}");
        }
    }

    #[test]
    fn test_records_carry_fixed_fields() {
        let (logger, out) = capture(&LoggingConfig::production(Severity::Info));
        logger.in_scope(|| warn!(error = "example error", "A warning occurred"));

        let records = json_lines(&out);
        assert_eq!(records.len(), 1);
        let record = records[0].as_object().expect("object");

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        for key in ["level", "time", "line", "msg"] {
            assert!(keys.contains(&key), "missing {key} in {keys:?}");
        }

        assert_eq!(record["msg"], "A warning occurred");
        assert_eq!(record["error"], "example error");

        let time = record["time"].as_str().unwrap_or_default();
        assert!(chrono::DateTime::parse_from_str(time, crate::encoder::TIME_FORMAT).is_ok());

        let line = record["line"].as_str().unwrap_or_default();
        assert!(line.starts_with("src/logger_tests.rs:"), "caller was {line}");
    }

    #[test]
    fn test_fixed_fields_lead_the_line() {
        let (logger, out) = capture(&LoggingConfig::production(Severity::Info));
        logger.in_scope(|| info!(vm = "demo", "attached"));

        let line = out.lines().remove(0);
        assert!(line.starts_with("{\"level\":\"info\",\"time\":\""));
        assert!(line.contains(",\"msg\":\"attached\",\"vm\":\"demo\"}"));
    }

    #[test]
    fn test_secret_redacted_on_every_path() {
        let (logger, out) = capture(&LoggingConfig::production(Severity::Debug));

        logger.in_scope(|| {
            for raw in ["admin", "", "****"] {
                let secret = Secret::new(raw.to_string());
                debug!(shown = %secret, inspected = ?secret, "secret paths");
            }
            info!(token = %Secret::new(4242_u64), "numeric secret");
        });

        let records = json_lines(&out);
        assert_eq!(records.len(), 4);
        for record in &records[..3] {
            assert_eq!(record["shown"], "****");
            assert_eq!(record["inspected"], "****");
        }
        assert_eq!(records[3]["token"], "****");
        assert!(!out.contents().contains("admin"));
        assert!(!out.contents().contains("4242"));
    }

    #[test]
    fn test_development_mode_is_console() {
        let config = LoggingConfig::development(Severity::Debug);
        let (logger, out) = capture(&config);
        assert_eq!(logger.encoding(), Encoding::Console);

        logger.in_scope(|| {
            info!(name = "demo", vcpu = 8, "created vm at provider");
        });

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        assert!(serde_json::from_str::<Value>(&lines[0]).is_err());

        let columns: Vec<&str> = lines[0].split('\t').collect();
        assert_eq!(columns.len(), 5, "got {columns:?}");
        assert_eq!(columns[1], "info");
        assert!(columns[2].starts_with("src/logger_tests.rs:"));
        assert_eq!(columns[3], "created vm at provider");
        assert_eq!(columns[4], "{\"name\":\"demo\",\"vcpu\":8}");
    }

    #[test]
    fn test_production_mode_is_json() {
        let (logger, out) = capture(&LoggingConfig::production(Severity::Info));
        assert_eq!(logger.encoding(), Encoding::Json);

        logger.in_scope(|| info!("json please"));
        assert_eq!(json_lines(&out).len(), 1);
    }

    #[test]
    fn test_span_fields_are_included() {
        let (logger, out) = capture(&LoggingConfig::production(Severity::Info));

        logger.in_scope(|| {
            let outer = info_span!("request", request_id = "r-1", attempt = 1);
            let _outer = outer.enter();
            let inner = info_span!("db", attempt = 2);
            let _inner = inner.enter();
            info!(table = "users", "query done");
        });

        let record = &json_lines(&out)[0];
        assert_eq!(record["request_id"], "r-1");
        assert_eq!(record["attempt"], 2);
        assert_eq!(record["table"], "users");
    }

    #[test]
    fn test_error_values_render_as_strings() {
        let (logger, out) = capture(&LoggingConfig::production(Severity::Info));
        let err = io::Error::other("volume busy");
        let source: &(dyn std::error::Error + 'static) = &err;

        logger.in_scope(|| {
            error!(
                error = source,
                vm = "demo",
                "failed to attach volume at vm"
            );
        });

        let record = &json_lines(&out)[0];
        assert_eq!(record["error"], "volume busy");
        assert_eq!(record["level"], "error");
    }

    #[test]
    fn test_registered_secret_is_scrubbed_from_message() {
        register_for_redaction("logger-test-raw-token");
        let (logger, out) = capture(&LoggingConfig::production(Severity::Info));

        logger.in_scope(|| info!("using token logger-test-raw-token for upload"));

        assert_eq!(json_lines(&out)[0]["msg"], "using token **** for upload");
    }

    #[test]
    fn test_registered_secret_with_json_escapes_is_scrubbed() {
        let raw = "pa\"ss\\word\tlogger-test";
        register_for_redaction(raw);
        let (logger, out) = capture(&LoggingConfig::production(Severity::Info));

        logger.in_scope(|| {
            let span = info_span!("session", credential = raw);
            let _entered = span.enter();
            info!(token = raw, "sent {raw} upstream");
        });

        let record = &json_lines(&out)[0];
        assert_eq!(record["token"], "****");
        assert_eq!(record["credential"], "****");
        assert_eq!(record["msg"], "sent **** upstream");
        assert!(!out.contents().contains("ss\\\\word"));
    }

    #[test]
    fn test_toml_development_config_is_console() {
        let config = LoggingConfig::from_toml_str("level = \"debug\"\ndevelopment = true\n")
            .expect("config parses");
        let (logger, out) = capture(&config);
        assert_eq!(logger.encoding(), Encoding::Console);

        logger.in_scope(|| {
            for i in 0..150 {
                debug!(i, "repeated");
            }
        });

        let lines = out.lines();
        assert_eq!(lines.len(), 150);
        assert_eq!(lines[0].split('\t').nth(1), Some("debug"));
    }

    #[test]
    fn test_attribute_named_like_fixed_field_is_moved() {
        let (logger, out) = capture(&LoggingConfig::production(Severity::Info));
        logger.in_scope(|| info!(level = "custom", "collision"));

        let line = out.lines().remove(0);
        assert_eq!(line.matches("\"level\":").count(), 1, "got {line}");
        let record: Value = serde_json::from_str(&line).expect("json line");
        assert_eq!(record["level"], "info");
        assert_eq!(record["fields.level"], "custom");
    }

    #[test]
    fn test_buffered_output_waits_for_flush() {
        let config = LoggingConfig::production(Severity::Info).with_buffering(true);
        let (logger, out) = capture(&config);

        logger.in_scope(|| info!("held in the buffer"));
        assert!(out.is_empty());

        logger.flush().expect("flush succeeds");
        assert_eq!(out.lines().len(), 1);

        // Flushing does not tear the logger down
        logger.in_scope(|| info!("still logging"));
        logger.flush().expect("flush succeeds");
        assert_eq!(out.lines().len(), 2);
    }

    #[test]
    fn test_sampling_drops_repeats() {
        let config = LoggingConfig::production(Severity::Info).with_sampling(Some(Sampling {
            initial: 3,
            thereafter: 0,
        }));
        let (logger, out) = capture(&config);

        logger.in_scope(|| {
            for i in 0..10 {
                info!(i, "repeated");
            }
        });

        // A tick boundary mid-loop can let one more through
        let count = out.lines().len();
        assert!((3..=6).contains(&count), "got {count}");
    }

    #[test]
    fn test_development_does_not_sample() {
        let (logger, out) = capture(&LoggingConfig::development(Severity::Info));

        logger.in_scope(|| {
            for i in 0..150 {
                info!(i, "repeated");
            }
        });

        assert_eq!(out.lines().len(), 150);
    }

    #[test]
    fn test_target_directives_narrow_the_level() {
        let config = LoggingConfig::production(Severity::Debug).with_targets("noisy=error");
        let (logger, out) = capture(&config);

        logger.in_scope(|| {
            warn!(target: "noisy", "dropped");
            error!(target: "noisy", "kept");
            debug!(target: "quiet", "kept too");
        });

        let messages: Vec<String> = json_lines(&out)
            .iter()
            .map(|record| record["msg"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(messages, vec!["kept".to_string(), "kept too".to_string()]);
    }

    #[test]
    fn test_rust_log_directives_keep_unnamed_targets_at_level() {
        let vars = [("LOG_LEVEL", "debug"), ("RUST_LOG", "hyper=warn")];
        let config = LoggingConfig::from_lookup(|key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        })
        .expect("config from variables");
        let (logger, out) = capture(&config);

        logger.in_scope(|| {
            info!(target: "hyper", "dropped");
            debug!(target: "app::db", "connected");
            warn!(target: "hyper", "slow upstream");
        });

        let messages: Vec<String> = json_lines(&out)
            .iter()
            .map(|record| record["msg"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(messages, vec!["connected".to_string(), "slow upstream".to_string()]);
    }

    #[test]
    fn test_bad_target_directives_fail_construction() {
        let config = LoggingConfig::production(Severity::Info).with_targets("noisy=[[[");
        let result = Logger::with_writer(&config, MemoryWriter::new());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_file_output_appends_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.log");
        let config =
            LoggingConfig::production(Severity::Info).with_output(Output::File(path.clone()));

        let logger = Logger::build(&config).expect("file output opens");
        logger.in_scope(|| info!(vm = "demo", "written to file"));
        logger.flush().expect("flush succeeds");

        let text = std::fs::read_to_string(&path).expect("log file exists");
        let record: Value = serde_json::from_str(text.trim_end()).expect("json line");
        assert_eq!(record["vm"], "demo");
    }

    #[test]
    fn test_unopenable_output_is_a_construction_error() {
        let config = LoggingConfig::production(Severity::Info)
            .with_output(Output::File("/nonexistent-dir/logwire/out.log".into()));
        assert!(matches!(Logger::build(&config), Err(Error::Output { .. })));
    }

    #[test]
    fn test_invalid_config_is_a_construction_error() {
        let mut config = LoggingConfig::production(Severity::Info);
        config.keys.time_key = config.keys.level_key.clone();
        assert!(matches!(
            Logger::with_writer(&config, MemoryWriter::new()),
            Err(Error::Config(_))
        ));
    }
}
