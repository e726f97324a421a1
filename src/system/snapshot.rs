use serde::Serialize;

/// One published observation of the whole host. Built in one piece by the
/// aggregator, shared behind `Arc`, never mutated after publication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub cpu: CpuStats,
    pub gpu: GpuStats,
    pub memory: MemoryStats,
    pub users: Vec<UserAggregate>,
    pub active_user_count: usize,
    pub uptime: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuStats {
    /// Whole-machine utilization, 0-100.
    pub usage: f32,
    /// Display string: "53.0°C" or "N/A".
    pub temperature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuStats {
    /// Utilization of the first detected device, 0-100. Zero when no device
    /// or the vendor tool is unavailable.
    pub usage: f32,
    pub temperature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryStats {
    /// Gigabytes, matching what the dashboard renders.
    pub used: f64,
    pub total: f64,
    pub display: String,
}

/// Totals for one OS user over their retained processes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAggregate {
    pub username: String,
    /// Sum of per-process cpu_percent. Per-core-normalized, so one busy
    /// multithreaded process can push this past 100.
    pub cpu_usage: f32,
    /// Sum of per-process shares of total memory, in percent.
    pub memory_usage: f32,
    /// Descending by cpu_percent.
    pub processes: Vec<ProcessEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_mb: f32,
}

impl UserAggregate {
    /// A user counts as active when they burn real CPU or have any retained
    /// process at all.
    pub fn is_active(&self) -> bool {
        self.cpu_usage > 5.0 || !self.processes.is_empty()
    }
}

impl Snapshot {
    /// Well-defined value served before the first sampling pass completes.
    pub fn empty() -> Self {
        Snapshot {
            cpu: CpuStats {
                usage: 0.0,
                temperature: "N/A".to_string(),
            },
            gpu: GpuStats {
                usage: 0.0,
                temperature: "N/A".to_string(),
            },
            memory: MemoryStats {
                used: 0.0,
                total: 0.0,
                display: "N/A".to_string(),
            },
            users: Vec::new(),
            active_user_count: 0,
            uptime: "0h 0m".to_string(),
            timestamp: String::new(),
        }
    }
}
