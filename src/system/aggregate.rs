use std::collections::{BTreeMap, HashMap};

use crate::format::{
    bytes_to_gb, format_memory_display, format_temperature, format_uptime, round1,
};

use super::gpu::{GpuDeviceStats, GpuProcess};
use super::process::ProcessSample;
use super::sampler::HostStats;
use super::snapshot::{CpuStats, GpuStats, MemoryStats, ProcessEntry, Snapshot, UserAggregate};

/// Everything one sampling cycle collected, ready to be merged.
#[derive(Clone, Debug)]
pub struct AggregateInput {
    pub processes: Vec<ProcessSample>,
    pub gpu_processes: HashMap<u32, GpuProcess>,
    pub host: HostStats,
    pub cpu_temperature: Option<f32>,
    pub gpu_device: GpuDeviceStats,
    pub timestamp: String,
}

/// Merges one cycle's collected data into an immutable [`Snapshot`].
///
/// Pure and total: identical inputs produce equal snapshots, and no input
/// combination fails — missing readings become explicit "N/A" values.
/// Samples without a resolvable owner are excluded from per-user grouping;
/// GPU-map pids with no matching sample are dropped silently.
pub fn aggregate(input: &AggregateInput) -> Snapshot {
    let total_memory = input.host.memory_total_bytes;

    // BTreeMap keeps grouping order deterministic before the cpu sort.
    let mut grouped: BTreeMap<&str, UserAggregate> = BTreeMap::new();
    for sample in &input.processes {
        let Some(owner) = sample.owner.as_deref() else {
            continue;
        };

        let memory_percent = if total_memory == 0 {
            0.0
        } else {
            (sample.memory_bytes as f64 / total_memory as f64 * 100.0) as f32
        };

        // Cosmetic annotation only; GPU memory never feeds the sums.
        let mut name = sample.name.clone();
        if let Some(gpu) = input.gpu_processes.get(&sample.pid) {
            name.push_str(&format!(" (GPU: {}MB)", gpu.memory_mb));
        }

        let user = grouped.entry(owner).or_insert_with(|| UserAggregate {
            username: owner.to_string(),
            cpu_usage: 0.0,
            memory_usage: 0.0,
            processes: Vec::new(),
        });
        user.cpu_usage += sample.cpu_percent;
        user.memory_usage += memory_percent;
        user.processes.push(ProcessEntry {
            pid: sample.pid,
            name,
            cpu_percent: round1(sample.cpu_percent),
            memory_mb: round1((sample.memory_bytes as f64 / (1024.0 * 1024.0)) as f32),
        });
    }

    let mut users: Vec<UserAggregate> = grouped.into_values().collect();
    for user in &mut users {
        user.processes
            .sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
    }
    users.sort_by(|a, b| b.cpu_usage.total_cmp(&a.cpu_usage));

    let active_user_count = users.iter().filter(|u| u.is_active()).count();

    Snapshot {
        cpu: CpuStats {
            usage: input.host.cpu_usage,
            temperature: format_temperature(input.cpu_temperature),
        },
        gpu: GpuStats {
            usage: input.gpu_device.usage_percent,
            temperature: format_temperature(input.gpu_device.temperature),
        },
        memory: MemoryStats {
            used: bytes_to_gb(input.host.memory_used_bytes),
            total: bytes_to_gb(total_memory),
            display: format_memory_display(input.host.memory_used_bytes, total_memory),
        },
        users,
        active_user_count,
        uptime: format_uptime(input.host.uptime_secs),
        timestamp: input.timestamp.clone(),
    }
}
