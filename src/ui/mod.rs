pub mod output;
pub mod progress;
pub mod signals;

pub use output::OutputFormatter;
pub use progress::ProgressManager;
pub use signals::GracefulShutdown;
