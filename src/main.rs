use aglae_data_converter::{
    default_orchestrator, Cli, GracefulShutdown, OutputFormatter, ProgressManager,
    UserFriendlyError,
};
use clap::Parser;
use log::LevelFilter;
use std::process;
use std::time::Instant;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    let log_level = cli.log_level();
    setup_logging(log_level);

    // An unrecognised --log name leaves filtering at the warn default
    let output = OutputFormatter::new(log_level.unwrap_or(LevelFilter::Warn));
    let request = cli.conversion_request();

    let shutdown = GracefulShutdown::new().unwrap_or_else(|e| {
        output.warning(&e.user_message());
        GracefulShutdown::detached()
    });
    let progress = ProgressManager::new(output.level() >= LevelFilter::Info);
    let orchestrator = default_orchestrator(output.clone(), progress, shutdown);

    let start = Instant::now();
    match orchestrator.orchestrate(&request) {
        Ok(processed_files) => {
            log::debug!("Processed {} files.", processed_files);
            output.print_conversion_summary(
                &request.extraction_types,
                processed_files,
                start.elapsed(),
            );
            0
        }
        Err(e) => {
            output.print_user_friendly_error(&e);
            1
        }
    }
}

fn setup_logging(level: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}
