//! Log subscriber setup

use tracing::Level;

const LEVELS: [Level; 5] = [
    Level::ERROR,
    Level::WARN,
    Level::INFO,
    Level::DEBUG,
    Level::TRACE,
];

/// Maximum level: the configured baseline (`WARN` if unset) raised one step
/// per `-v`
pub fn level(verbosity: u8, baseline: Option<Level>) -> Level {
    let baseline = baseline.unwrap_or(Level::WARN);
    let start = LEVELS.iter().position(|l| *l == baseline).unwrap_or(1);
    LEVELS[(start + verbosity as usize).min(LEVELS.len() - 1)]
}

/// Install the stderr subscriber
pub fn init(verbosity: u8, baseline: Option<Level>) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level(verbosity, baseline))
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_steps() {
        assert_eq!(level(0, None), Level::WARN);
        assert_eq!(level(1, None), Level::INFO);
        assert_eq!(level(2, None), Level::DEBUG);
        assert_eq!(level(9, None), Level::TRACE);
    }

    #[test]
    fn test_baseline_from_settings() {
        assert_eq!(level(0, Some(Level::ERROR)), Level::ERROR);
        assert_eq!(level(0, Some(Level::DEBUG)), Level::DEBUG);
        assert_eq!(level(1, Some(Level::INFO)), Level::DEBUG);
    }
}
