use {
    clap::Parser,
    gaze_aoi::{Cli, run},
    std::{panic, process::ExitCode},
};

/// Some participants were rejected, but every output was written.
const EXIT_PARTIAL: u8 = 2;

fn main() -> ExitCode {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Warn)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("gaze_aoi"), my_code_level)
        .parse_default_env()
        .init();

    let args = Cli::parse();

    match run(&args) {
        Ok(summary) => {
            println!("{}", summary);
            if summary.any_rejected() {
                ExitCode::from(EXIT_PARTIAL)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            log::error!("Run aborted: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
