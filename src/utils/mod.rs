mod maths_utils;
mod perf;
mod time_utils;

pub use time_utils::{MS_IN_S, format_ms, today_stamp};

pub(crate) use maths_utils::complement_ratio;
