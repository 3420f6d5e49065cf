pub mod affinity;
pub mod chain;
pub mod config;
pub mod emit;
pub mod error;
pub mod shuffle;
pub mod sweep;
pub mod timer;

pub use config::SweepConfig;
pub use error::{ConfigError, ProbeError, ProbeResult};

/// Convert number of bytes to formatted string for fixed-width integer string
pub fn format_size_fixed_int(bytes: u64) -> String {
    const GB: u64 = 1024 * 1024 * 1024;
    const MB: u64 = 1024 * 1024;
    const KB: u64 = 1024;

    if bytes >= GB {
        format!("{:>4} GiB", bytes / GB)
    } else if bytes >= MB {
        format!("{:>4} MiB", bytes / MB)
    } else if bytes >= KB {
        format!("{:>4} KiB", bytes / KB)
    } else {
        format!("{:>4} B", bytes)
    }
}
