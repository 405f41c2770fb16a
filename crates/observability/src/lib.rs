//! Tracing and logging setup shared by every process that hosts the catalog.

/// Initialize process-wide tracing, formatted per `LOG_FORMAT` (JSON by default).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Initialize process-wide tracing with the given output format.
pub fn init_with(format: tracing::LogFormat) {
    tracing::init(format);
}

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::LogFormat;
