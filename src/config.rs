//! Runtime settings for the mock backend and prompt presenter.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Probability that the mock signup call fails.
pub const DEFAULT_FAILURE_RATE: f64 = 0.2;

/// Settings read from the environment (`.env` is honoured by the binary).
#[derive(Debug, Clone, PartialEq)]
pub struct SignupConfig {
    /// Chance in `0.0..=1.0` that a mock signup resolves to `false`.
    pub failure_rate: f64,
    /// How long a mock signup call takes.
    pub signup_latency: Duration,
    /// How long a mock availability lookup takes.
    pub availability_latency: Duration,
    /// Usernames the mock backend reports as taken (compared
    /// case-insensitively).
    pub taken_usernames: Vec<String>,
    /// How long a console prompt stays up before it is dismissed.
    pub prompt_dismiss: Duration,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            failure_rate: DEFAULT_FAILURE_RATE,
            signup_latency: Duration::from_secs(1),
            availability_latency: Duration::from_millis(300),
            taken_usernames: vec!["admin".into(), "root".into(), "octocat".into()],
            prompt_dismiss: Duration::ZERO,
        }
    }
}

impl SignupConfig {
    /// Builds a config from `SIGNUP_*` environment variables, falling back to
    /// the defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set to something unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`SignupConfig::from_env`] with an injectable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set to something unusable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let failure_rate = match lookup("SIGNUP_FAILURE_RATE") {
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| ConfigError::NotANumber {
                var: "SIGNUP_FAILURE_RATE",
                value: raw.clone(),
            })?,
            None => defaults.failure_rate,
        };

        let config = Self {
            failure_rate,
            signup_latency: millis(&lookup, "SIGNUP_LATENCY_MS")?
                .unwrap_or(defaults.signup_latency),
            availability_latency: millis(&lookup, "SIGNUP_AVAILABILITY_LATENCY_MS")?
                .unwrap_or(defaults.availability_latency),
            taken_usernames: lookup("SIGNUP_TAKEN_USERNAMES")
                .map_or(defaults.taken_usernames, |raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                }),
            prompt_dismiss: millis(&lookup, "SIGNUP_PROMPT_DISMISS_MS")?
                .unwrap_or(defaults.prompt_dismiss),
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different failure rate.
    ///
    /// # Errors
    ///
    /// Returns an error when `rate` is outside `0.0..=1.0`.
    pub fn with_failure_rate(mut self, rate: f64) -> Result<Self, ConfigError> {
        self.failure_rate = rate;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.failure_rate) {
            Ok(())
        } else {
            Err(ConfigError::FailureRateOutOfRange(self.failure_rate))
        }
    }
}

fn millis<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    lookup(var)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::NotANumber {
                    var,
                    value: raw.clone(),
                })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, (*v).to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = SignupConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, SignupConfig::default());
        assert!((config.failure_rate - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn reads_every_variable() {
        let config = SignupConfig::from_lookup(lookup_from(&[
            ("SIGNUP_FAILURE_RATE", "0.5"),
            ("SIGNUP_LATENCY_MS", "250"),
            ("SIGNUP_AVAILABILITY_LATENCY_MS", " 40 "),
            ("SIGNUP_TAKEN_USERNAMES", "alice, bob,,"),
            ("SIGNUP_PROMPT_DISMISS_MS", "5"),
        ]))
        .unwrap();

        assert!((config.failure_rate - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.signup_latency, Duration::from_millis(250));
        assert_eq!(config.availability_latency, Duration::from_millis(40));
        assert_eq!(
            config.taken_usernames,
            vec!["alice".to_string(), "bob".to_string()]
        );
        assert_eq!(config.prompt_dismiss, Duration::from_millis(5));
    }

    #[test]
    fn rejects_non_numeric_latency() {
        let err = SignupConfig::from_lookup(lookup_from(&[("SIGNUP_LATENCY_MS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotANumber {
                var: "SIGNUP_LATENCY_MS",
                value: "soon".into(),
            }
        );
    }

    #[test]
    fn rejects_failure_rate_out_of_range() {
        let err = SignupConfig::from_lookup(lookup_from(&[("SIGNUP_FAILURE_RATE", "1.5")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::FailureRateOutOfRange(1.5));
        assert!(SignupConfig::default().with_failure_rate(-0.1).is_err());
        assert!(SignupConfig::default().with_failure_rate(1.0).is_ok());
    }
}
