pub mod aggregate;
pub mod cache;
pub mod gpu;
pub mod process;
pub mod sampler;
pub mod sensors;
pub mod snapshot;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info};

use self::aggregate::{AggregateInput, aggregate};
use self::cache::SnapshotPublisher;
use self::gpu::GpuProcessResolver;
use self::sampler::ProcessSampler;

/// Background sampling loop: one pass per tick, decoupled from request
/// volume. Each pass scans the process table off the async runtime, queries
/// the GPU tool (bounded by its own timeout), aggregates, and publishes.
///
/// The loop only exits on shutdown; soft failures cost at most one tick.
pub async fn run_sampler(
    sampler: ProcessSampler,
    resolver: GpuProcessResolver,
    publisher: SnapshotPublisher,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let sampler = Arc::new(Mutex::new(sampler));
    let mut tick = tokio::time::interval(interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            changed = shutdown.changed() => {
                // A dropped sender counts as shutdown too.
                if changed.is_err() || *shutdown.borrow() {
                    info!("sampling loop stopping");
                    return;
                }
                continue;
            }
        }

        // sysinfo refreshes block on /proc reads; keep them off the runtime.
        let sampler_clone = sampler.clone();
        let sampled = tokio::task::spawn_blocking(move || {
            let mut sampler = lock_sampler(&sampler_clone);
            let (processes, host) = sampler.sample();
            let cpu_temperature = sensors::cpu_temperature();
            (processes, host, cpu_temperature)
        })
        .await;

        let (processes, host, cpu_temperature) = match sampled {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "sampling pass panicked, skipping tick");
                continue;
            }
        };

        let (gpu_processes, gpu_device) =
            tokio::join!(resolver.resolve(), resolver.device_stats());

        let snapshot = aggregate(&AggregateInput {
            processes,
            gpu_processes,
            host,
            cpu_temperature,
            gpu_device,
            timestamp: chrono::Local::now().to_rfc3339(),
        });
        debug!(
            users = snapshot.users.len(),
            active = snapshot.active_user_count,
            cpu = snapshot.cpu.usage,
            "snapshot published"
        );
        publisher.publish(snapshot);
    }
}

/// A panic mid-pass poisons the mutex; the sampler holds no invariant the
/// next refresh can't rebuild, so take the guard anyway instead of letting
/// every later tick die on the poison.
fn lock_sampler(sampler: &Mutex<ProcessSampler>) -> MutexGuard<'_, ProcessSampler> {
    sampler.lock().unwrap_or_else(PoisonError::into_inner)
}
