use std::collections::HashMap;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

/// One device-resident process as reported by the vendor tool.
#[derive(Clone, Debug, PartialEq)]
pub struct GpuProcess {
    pub name: String,
    pub memory_mb: u64,
}

/// Utilization and temperature of the first detected device. Everything here
/// is best-effort: no device and no tool both collapse to the default.
#[derive(Clone, Debug, PartialEq)]
pub struct GpuDeviceStats {
    pub usage_percent: f32,
    pub temperature: Option<f32>,
}

impl Default for GpuDeviceStats {
    fn default() -> Self {
        GpuDeviceStats {
            usage_percent: 0.0,
            temperature: None,
        }
    }
}

/// Queries `nvidia-smi` for device-resident processes and device stats.
///
/// Absence of the tool is a normal outcome, not an error: every failure mode
/// (not installed, timeout, non-zero exit, garbage output) degrades to an
/// empty result and the sampling cycle proceeds without GPU attribution.
/// Only the first device is reported; multi-GPU hosts are out of scope.
pub struct GpuProcessResolver {
    command: String,
    enabled: bool,
    timeout: Duration,
}

impl GpuProcessResolver {
    pub fn new(enabled: bool, timeout: Duration) -> Self {
        GpuProcessResolver {
            command: "nvidia-smi".to_string(),
            enabled,
            timeout,
        }
    }

    #[cfg(test)]
    fn with_command(command: &str, timeout: Duration) -> Self {
        GpuProcessResolver {
            command: command.to_string(),
            enabled: true,
            timeout,
        }
    }

    /// pid → process for everything resident on the device. Empty on any
    /// failure.
    pub async fn resolve(&self) -> HashMap<u32, GpuProcess> {
        if !self.enabled {
            return HashMap::new();
        }
        match self
            .query(&[
                "--query-compute-apps=pid,process_name,used_memory",
                "--format=csv,noheader,nounits",
            ])
            .await
        {
            Some(stdout) => parse_compute_apps(&stdout),
            None => HashMap::new(),
        }
    }

    /// Utilization and temperature of device 0.
    pub async fn device_stats(&self) -> GpuDeviceStats {
        if !self.enabled {
            return GpuDeviceStats::default();
        }
        self.query(&[
            "--query-gpu=utilization.gpu,temperature.gpu",
            "--format=csv,noheader,nounits",
        ])
        .await
        .map(|stdout| parse_device_stats(&stdout))
        .unwrap_or_default()
    }

    async fn query(&self, args: &[&str]) -> Option<String> {
        // kill_on_drop reaps the child when the timeout fires or the caller
        // is cancelled; without it a hung tool would leak a process per query.
        let result = tokio::time::timeout(
            self.timeout,
            Command::new(&self.command)
                .args(args)
                .kill_on_drop(true)
                .output(),
        )
        .await;
        match result {
            Ok(Ok(output)) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(Ok(output)) => {
                debug!(code = ?output.status.code(), "gpu query tool exited non-zero");
                None
            }
            Ok(Err(err)) => {
                debug!(error = %err, "gpu query tool unavailable");
                None
            }
            Err(_) => {
                debug!(timeout_secs = self.timeout.as_secs(), "gpu query timed out");
                None
            }
        }
    }
}

/// Each line is `pid, process_name, used_memory`. Lines with fewer than three
/// fields or a non-numeric pid are skipped; a non-numeric memory field is
/// coerced to 0.
fn parse_compute_apps(stdout: &str) -> HashMap<u32, GpuProcess> {
    let mut processes = HashMap::new();
    for line in stdout.lines() {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            continue;
        }
        let Ok(pid) = parts[0].parse::<u32>() else {
            continue;
        };
        processes.insert(
            pid,
            GpuProcess {
                name: parts[1].to_string(),
                memory_mb: parts[2].parse().unwrap_or(0),
            },
        );
    }
    processes
}

/// First line is `utilization, temperature` for device 0; any further
/// devices are ignored.
fn parse_device_stats(stdout: &str) -> GpuDeviceStats {
    let Some(line) = stdout.lines().next() else {
        return GpuDeviceStats::default();
    };
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    GpuDeviceStats {
        usage_percent: parts.first().and_then(|s| s.parse().ok()).unwrap_or(0.0),
        temperature: parts.get(1).and_then(|s| s.parse().ok()),
    }
}
