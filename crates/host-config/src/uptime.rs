//! Host uptime

/// Reports how long the host has been running.
pub trait UptimeReader: Send + Sync + std::fmt::Debug {
    /// Seconds since boot.
    fn uptime_secs(&self) -> u64;
}

/// Reads uptime from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUptime;

impl UptimeReader for SystemUptime {
    fn uptime_secs(&self) -> u64 {
        sysinfo::System::uptime()
    }
}
