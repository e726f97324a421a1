use sysinfo::Components;

/// Best-effort CPU package temperature. Prefers the Intel `coretemp` driver,
/// then the ARM SoC `cpu_thermal` zone; anything else is treated as not a CPU
/// sensor. `None` when no usable sensor exists.
pub fn cpu_temperature() -> Option<f32> {
    let components = Components::new_with_refreshed_list();
    pick_cpu_temperature(
        components
            .iter()
            .map(|c| (c.label().to_string(), c.temperature())),
    )
}

fn pick_cpu_temperature(readings: impl Iterator<Item = (String, Option<f32>)>) -> Option<f32> {
    let mut cpu_thermal = None;
    for (label, temperature) in readings {
        let Some(t) = temperature else { continue };
        if label.contains("coretemp") {
            return Some(t);
        }
        if label.contains("cpu_thermal") && cpu_thermal.is_none() {
            cpu_thermal = Some(t);
        }
    }
    cpu_thermal
}
