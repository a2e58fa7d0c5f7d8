//! Subscriber installation
//!
//! Front ends pick a [`Profile`]; library code only emits events.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable events on stderr, debug and up
    Development,
    /// One JSON object per event on stderr, info and up
    Production,
    /// Bare registry; tests attach a capture layer instead
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset
    pub fn default_filter(self) -> &'static str {
        match self {
            Profile::Development => {
                "dataroom_core=debug,dataroom_store=debug,dataroom_cli=debug"
            }
            Profile::Production => "dataroom_core=info,dataroom_store=info,dataroom_cli=info",
            Profile::Test => "off",
        }
    }

    fn env_filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_filter()))
    }
}

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install the global subscriber for `profile`
///
/// Only the first successful call in a process has an effect, and a
/// subscriber installed by someone else is left alone. Returns whether this
/// call installed one.
pub fn init(profile: Profile) -> bool {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return false;
    }

    let installed = match profile {
        Profile::Development => tracing_subscriber::fmt()
            .with_env_filter(profile.env_filter())
            .with_writer(std::io::stderr)
            .finish()
            .try_init(),
        Profile::Production => tracing_subscriber::fmt()
            .json()
            .with_env_filter(profile.env_filter())
            .with_writer(std::io::stderr)
            .finish()
            .try_init(),
        Profile::Test => tracing_subscriber::registry().try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_first_init_installs() {
        init(Profile::Test);
        assert!(!init(Profile::Development));
        assert!(!init(Profile::Production));
    }

    #[test]
    fn test_profiles_have_distinct_filters() {
        assert!(Profile::Development.default_filter().contains("=debug"));
        assert!(Profile::Production.default_filter().contains("=info"));
        assert_eq!(Profile::Test.default_filter(), "off");
    }
}
