use sysinfo::{
    ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind, Users,
};

use super::process::ProcessSample;

/// Host-wide readings taken alongside the process scan.
#[derive(Clone, Debug, PartialEq)]
pub struct HostStats {
    /// Whole-machine CPU utilization, 0-100.
    pub cpu_usage: f32,
    pub memory_used_bytes: u64,
    pub memory_total_bytes: u64,
    pub uptime_secs: u64,
}

/// Enumerates live processes and attributes them to OS users.
///
/// The retained `System` is the per-pid previous-CPU-time table: sysinfo
/// computes `cpu_usage()` as a delta against the prior refresh, and passing
/// `remove_dead: true` evicts baselines for pids that disappeared.
pub struct ProcessSampler {
    sys: System,
    users: Users,
    min_cpu_percent: f32,
    min_memory_bytes: u64,
}

impl ProcessSampler {
    pub fn new(min_cpu_percent: f32, min_memory_mb: f64) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::everything(),
        );
        ProcessSampler {
            sys,
            users: Users::new_with_refreshed_list(),
            min_cpu_percent,
            min_memory_bytes: (min_memory_mb * 1024.0 * 1024.0) as u64,
        }
    }

    /// One sampling pass. Never fails: a process that vanished mid-scan or
    /// denies access simply yields no entry (or an entry with no owner) via
    /// sysinfo, and the retention filter drops the noise floor.
    pub fn sample(&mut self) -> (Vec<ProcessSample>, HostStats) {
        // Accounts created after startup must still resolve to an owner.
        self.users.refresh();
        self.sys.refresh_memory();
        self.sys.refresh_cpu_all();
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_memory()
                .with_cpu()
                .with_user(UpdateKind::OnlyIfNotSet),
        );

        let mut samples = Vec::new();
        for (pid, process) in self.sys.processes() {
            if matches!(process.status(), ProcessStatus::Zombie) {
                continue;
            }

            let owner = process
                .user_id()
                .and_then(|uid| self.users.get_user_by_id(uid))
                .map(|user| user.name().to_string());

            let sample = ProcessSample {
                pid: pid.as_u32(),
                owner,
                name: process.name().to_string_lossy().to_string(),
                cpu_percent: process.cpu_usage(),
                memory_bytes: process.memory(),
            };

            if sample.is_significant(self.min_cpu_percent, self.min_memory_bytes) {
                samples.push(sample);
            }
        }

        let host = HostStats {
            cpu_usage: self.sys.global_cpu_usage(),
            memory_used_bytes: self.sys.used_memory(),
            memory_total_bytes: self.sys.total_memory(),
            uptime_secs: System::uptime(),
        };

        (samples, host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_satisfies_retention_filter() {
        let mut sampler = ProcessSampler::new(1.0, 50.0);
        let (samples, _) = sampler.sample();
        let min_memory_bytes = 50 * 1024 * 1024;
        for sample in &samples {
            assert!(
                sample.cpu_percent > 1.0 || sample.memory_bytes > min_memory_bytes,
                "pid {} retained below both thresholds",
                sample.pid
            );
        }
    }

    #[test]
    fn repeated_sampling_does_not_panic_and_reads_host_stats() {
        let mut sampler = ProcessSampler::new(1.0, 50.0);
        let (_, first) = sampler.sample();
        let (_, second) = sampler.sample();
        assert!(first.memory_total_bytes > 0);
        assert_eq!(first.memory_total_bytes, second.memory_total_bytes);
    }

    #[test]
    fn zero_thresholds_keep_the_current_process() {
        let mut sampler = ProcessSampler::new(0.0, 0.0);
        let (samples, _) = sampler.sample();
        let me = std::process::id();
        assert!(samples.iter().any(|s| s.pid == me));
    }

    #[test]
    fn owner_resolution_survives_user_table_refresh() {
        let mut sampler = ProcessSampler::new(0.0, 0.0);
        sampler.sample();
        // The second pass re-reads the user table; our own process must
        // still resolve to a named owner through it.
        let (samples, _) = sampler.sample();
        let me = std::process::id();
        let own = samples.iter().find(|s| s.pid == me).expect("own pid missing");
        assert!(own.owner.is_some());
    }
}
