use {crate::config::PERSISTENCE, chrono::Local};

pub const MS_IN_S: f64 = 1000.0;

/// Today's local date in the output naming format (e.g. "2024-05-01").
pub fn today_stamp() -> String {
    Local::now()
        .format(PERSISTENCE.output.date_format)
        .to_string()
}

/// Milliseconds with full float precision and an `ms` suffix ("12.5ms", "15.0ms").
pub fn format_ms(ms: f64) -> String {
    format!("{:?}ms", ms)
}
