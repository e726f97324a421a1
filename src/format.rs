const GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Bytes to fractional gigabytes, for the wire payload.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / GB
}

/// "12.3 / 62.7 GB", or "N/A" when the total is unknown.
pub fn format_memory_display(used_bytes: u64, total_bytes: u64) -> String {
    if total_bytes == 0 {
        return "N/A".to_string();
    }
    format!(
        "{:.1} / {:.1} GB",
        bytes_to_gb(used_bytes),
        bytes_to_gb(total_bytes)
    )
}

/// "53.0°C", or "N/A" when the sensor is unavailable.
pub fn format_temperature(celsius: Option<f32>) -> String {
    match celsius {
        Some(t) => format!("{t:.1}°C"),
        None => "N/A".to_string(),
    }
}

/// "3d 4h 7m" once past a day, "4h 7m" before that.
pub fn format_uptime(uptime_secs: u64) -> String {
    let days = uptime_secs / 86_400;
    let hours = (uptime_secs % 86_400) / 3_600;
    let minutes = (uptime_secs % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else {
        format!("{hours}h {minutes}m")
    }
}

/// Round to one decimal place, matching the dashboard's display precision.
pub fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
