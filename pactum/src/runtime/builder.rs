use super::Runtime;
use crate::error::ConfigError;

/// Environment variable overriding [`RuntimeBuilder::max_microtasks_per_turn`].
pub const ENV_MAX_MICROTASKS_PER_TURN: &str = "PACTUM_MAX_MICROTASKS_PER_TURN";

/// Environment variable overriding [`RuntimeBuilder::log_unhandled_rejections`].
pub const ENV_LOG_UNHANDLED_REJECTIONS: &str = "PACTUM_LOG_UNHANDLED_REJECTIONS";

/// Default microtask budget of a single turn.
pub const DEFAULT_MAX_MICROTASKS_PER_TURN: usize = 100_000;

/// Settings of a [`Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) max_microtasks_per_turn: usize,
    pub(crate) log_unhandled_rejections: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_microtasks_per_turn: DEFAULT_MAX_MICROTASKS_PER_TURN,
            log_unhandled_rejections: true,
        }
    }
}

/// Builder for configuring and creating a runtime.
///
/// Settings are resolved in this order, highest priority first:
///
/// 1. values set with builder methods,
/// 2. `PACTUM_*` environment variables, when built with [`from_env`](Self::from_env),
/// 3. built-in defaults.
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .max_microtasks_per_turn(10_000)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    config: Config,
}

impl RuntimeBuilder {
    /// Creates a `RuntimeBuilder` with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Creates a builder with environment overrides applied.
    ///
    /// | Variable | Type | Maps to |
    /// |----------|------|---------|
    /// | `PACTUM_MAX_MICROTASKS_PER_TURN` | `usize` > 0 | [`max_microtasks_per_turn`](Self::max_microtasks_per_turn) |
    /// | `PACTUM_LOG_UNHANDLED_REJECTIONS` | `bool` | [`log_unhandled_rejections`](Self::log_unhandled_rejections) |
    ///
    /// Booleans accept `true/false`, `1/0`, `yes/no` and `on/off`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new().with_overrides(|var| std::env::var(var).ok())
    }

    /// Applies overrides read through `lookup`, a stand-in for the process
    /// environment.
    pub(crate) fn with_overrides<L>(mut self, lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&'static str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_MICROTASKS_PER_TURN) {
            let limit = parse_usize(ENV_MAX_MICROTASKS_PER_TURN, &value)?;

            if limit == 0 {
                return Err(ConfigError::Zero {
                    var: ENV_MAX_MICROTASKS_PER_TURN,
                });
            }

            self.config.max_microtasks_per_turn = limit;
        }

        if let Some(value) = lookup(ENV_LOG_UNHANDLED_REJECTIONS) {
            self.config.log_unhandled_rejections =
                parse_bool(ENV_LOG_UNHANDLED_REJECTIONS, &value)?;
        }

        Ok(self)
    }

    /// Sets how many microtasks a single turn may run.
    ///
    /// A turn that goes over the budget stops the event loop with
    /// [`Error::BudgetExhausted`](crate::Error::BudgetExhausted), which turns
    /// runaway reaction chains into an error instead of a hang.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn max_microtasks_per_turn(mut self, n: usize) -> Self {
        assert!(n > 0, "max_microtasks_per_turn must be > 0");

        self.config.max_microtasks_per_turn = n;
        self
    }

    /// Enables or disables the `tracing` warning emitted for unhandled
    /// rejections. Hooks are called either way.
    pub fn log_unhandled_rejections(mut self, enabled: bool) -> Self {
        self.config.log_unhandled_rejections = enabled;
        self
    }

    /// Builds the runtime with the configured options.
    pub fn build(self) -> Runtime {
        Runtime::new(self.config)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_usize(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            value: value.to_owned(),
            expected: "unsigned integer",
        })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_owned(),
            expected: "bool (true/false/1/0/yes/no/on/off)",
        }),
    }
}
