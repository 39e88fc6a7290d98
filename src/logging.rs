// src/logging.rs

use crate::config::Config;
use crate::errors::{DocentError, DocentResult};
use flexi_logger::{
    detailed_format, Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};

const MAX_LOG_FILE_BYTES: u64 = 1_000_000;
const KEPT_LOG_FILES: usize = 3;

/// Details of one call to the chat backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCallLog {
    pub endpoint: String,
    pub response_status: Option<u16>,
    pub response_time_ms: u128,
}

/// Starts file logging. The terminal belongs to the UI, so nothing goes to
/// stderr. Keep the returned handle alive for the whole run.
pub fn init_logging(config: &Config) -> DocentResult<LoggerHandle> {
    let log_dir = config.resolved_log_dir()?;

    Logger::try_with_str(&config.log_level)
        .map_err(|e| DocentError::logging_error(format!("Invalid log level: {}", e)))?
        .log_to_file(FileSpec::default().directory(log_dir).basename("docent"))
        .append()
        .rotate(
            Criterion::Size(MAX_LOG_FILE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEPT_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(detailed_format)
        .start()
        .map_err(|e| DocentError::logging_error(format!("Failed to start logger: {}", e)))
}

pub fn log_api_call(log: &ApiCallLog) {
    let status = log
        .response_status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());

    log::info!(
        "POST {} - Status: {} - Time: {}ms",
        log.endpoint,
        status,
        log.response_time_ms
    );
}
