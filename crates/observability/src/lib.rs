//! Tracing/logging setup shared by the binaries.

pub mod subscriber;

pub use subscriber::LogFormat;

/// Initialize process-wide logging, format taken from `LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init(LogFormat::from_env());
}
