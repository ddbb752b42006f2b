use crate::error::{ConverterError, UserFriendlyError};
use crate::extraction::ExtractionTypes;
use console::{style, Emoji, Term};
use log::LevelFilter;
use std::time::Duration;

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

/// Terminal sink for run progress. Carries its own severity filter so the
/// orchestrator never touches process-wide logging state.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    use_colors: bool,
    level: LevelFilter,
}

impl OutputFormatter {
    /// Colors are used only when stdout is a terminal that supports them.
    pub fn new(level: LevelFilter) -> Self {
        Self {
            use_colors: Term::stdout().features().colors_supported() && level != LevelFilter::Off,
            level,
        }
    }

    /// A formatter that prints nothing.
    pub fn silent() -> Self {
        Self::new(LevelFilter::Off)
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn warning(&self, message: &str) {
        if !self.enabled(LevelFilter::Warn) {
            return;
        }

        if self.use_colors {
            eprintln!("{}{}", WARNING, style(message).yellow().bold());
        } else {
            eprintln!("WARNING: {}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.enabled(LevelFilter::Info) {
            return;
        }

        if self.use_colors {
            println!("{}{}", INFO, style(message).cyan());
        } else {
            println!("INFO: {}", message);
        }
    }

    pub fn debug(&self, message: &str) {
        if !self.enabled(LevelFilter::Debug) {
            return;
        }

        if self.use_colors {
            println!("  {}", style(message).dim());
        } else {
            println!("  DEBUG: {}", message);
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if !self.enabled(LevelFilter::Info) {
            return;
        }

        if self.use_colors {
            println!("{}{}", ROCKET, style(operation).bold());
        } else {
            println!("> {}", operation);
        }
    }

    /// Errors are always reported, whatever the severity filter.
    pub fn print_user_friendly_error(&self, error: &ConverterError) {
        let user_message = error.user_message();
        let suggestion = error.suggestion();

        if self.use_colors {
            eprintln!("{}{}", CROSS, style(&user_message).red().bold());
            if let Some(suggestion) = suggestion {
                eprintln!();
                eprintln!(
                    "{}{}",
                    INFO,
                    style(&format!("Suggestion: {}", suggestion)).cyan()
                );
            }
        } else {
            eprintln!("ERROR: {}", user_message);
            if let Some(suggestion) = suggestion {
                eprintln!("SUGGESTION: {}", suggestion);
            }
        }
    }

    /// Prints the processed-file count as the run's primary result.
    pub fn print_conversion_summary(
        &self,
        kinds: &ExtractionTypes,
        files_processed: usize,
        elapsed: Duration,
    ) {
        if self.level == LevelFilter::Off {
            return;
        }

        println!();
        println!("{}", "-".repeat(60));
        if self.use_colors {
            println!(
                "{} {}",
                style("Conversion completed!").green().bold(),
                CHECKMARK
            );
        } else {
            println!("Conversion completed!");
        }
        println!();
        println!("  Extraction types: {}", kinds);
        println!(
            "  Files processed:  {}",
            if self.use_colors {
                style(files_processed).cyan().bold().to_string()
            } else {
                files_processed.to_string()
            }
        );
        println!("  Time taken:       {}", super::progress::format_duration(elapsed));
        println!("{}", "-".repeat(60));
    }

    fn enabled(&self, level: LevelFilter) -> bool {
        self.level >= level && level != LevelFilter::Off
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_filtering() {
        let formatter = OutputFormatter::new(LevelFilter::Info);
        assert!(formatter.enabled(LevelFilter::Error));
        assert!(formatter.enabled(LevelFilter::Info));
        assert!(!formatter.enabled(LevelFilter::Debug));

        let debug = OutputFormatter::new(LevelFilter::Debug);
        assert!(debug.enabled(LevelFilter::Debug));
        assert!(!debug.enabled(LevelFilter::Trace));
    }

    #[test]
    fn test_silent_formatter() {
        let formatter = OutputFormatter::silent();
        assert_eq!(formatter.level(), LevelFilter::Off);
        assert!(!formatter.enabled(LevelFilter::Error));
        assert!(!formatter.enabled(LevelFilter::Off));
        assert!(!formatter.use_colors);
    }
}
