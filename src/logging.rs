use std::fmt;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// A request-scoped logger.
///
/// `OpLog` is obtained from [`Ctx::log`](crate::Ctx::log) and stamps every
/// event with the request id and operation name. It borrows the context and
/// cannot outlive it.
///
/// Request payloads are never logged through it; callers pass identifiers
/// and outcomes only. [`Secret`](crate::Secret) fields stay redacted if a
/// request is formatted by mistake.
#[derive(Debug, Clone, Copy)]
pub struct OpLog<'a> {
    request_id: &'a str,
    operation: &'static str,
}

impl<'a> OpLog<'a> {
    pub(crate) fn new(request_id: &'a str, operation: &'static str) -> Self {
        Self {
            request_id,
            operation,
        }
    }

    /// Returns the request id this logger is bound to.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs an info-level message.
    ///
    /// ```no_run
    /// # use gateway_core::OpLog;
    /// # fn example(log: OpLog<'_>) {
    /// log.info(format_args!("merged {} clusters", 3));
    /// # }
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, operation = self.operation, "{}", args);
    }

    /// Logs a warning-level message.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, operation = self.operation, "{}", args);
    }

    /// Logs an error-level message.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(request_id = %self.request_id, operation = self.operation, "{}", args);
    }

    /// Logs a debug-level message.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, operation = self.operation, "{}", args);
    }
}

/// Installs a global `tracing` subscriber configured by `config`.
///
/// `RUST_LOG` overrides the configured filter when set. Returns `false` if a
/// global subscriber was already installed, in which case nothing changes.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oplog_exposes_request_id() {
        let log = OpLog::new("req-7", "users.list");
        assert_eq!(log.request_id(), "req-7");
        log.debug(format_args!("no subscriber installed, event is dropped"));
    }

    #[test]
    fn init_tracing_is_idempotent() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
