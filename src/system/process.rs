/// One observed process at sampling time. `pid` is OS-scoped and reused over
/// time, so it is not a stable identity across samples.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    /// Owning username; `None` when the uid could not be read or resolved
    /// (permission denied, user table miss).
    pub owner: Option<String>,
    pub name: String,
    /// CPU usage since the previous sampling pass, per-core-normalized: a
    /// process saturating two cores reports ~200.
    pub cpu_percent: f32,
    /// Resident set size.
    pub memory_bytes: u64,
}

impl ProcessSample {
    /// Noise filter, not a security boundary: keep a process only when it
    /// consumes meaningful CPU or memory.
    pub fn is_significant(&self, min_cpu_percent: f32, min_memory_bytes: u64) -> bool {
        self.cpu_percent > min_cpu_percent || self.memory_bytes > min_memory_bytes
    }
}
