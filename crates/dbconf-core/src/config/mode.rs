//! Runtime mode detection

use super::env::{EnvSnapshot, keys};
use serde::{Deserialize, Serialize};

/// Runtime mode flags supplied by the hosting process
///
/// The flags are not mutually exclusive. The resolver applies a fixed
/// priority: a build phase beats production, production beats development.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeMode {
    pub development: bool,
    pub production: bool,
    pub test: bool,
    pub build_time: bool,
    pub static_generation: bool,
}

impl RuntimeMode {
    /// Production mode only
    pub fn production() -> Self {
        Self {
            production: true,
            ..Self::default()
        }
    }

    /// Development mode only
    pub fn development() -> Self {
        Self {
            development: true,
            ..Self::default()
        }
    }

    /// Test mode only
    pub fn test() -> Self {
        Self {
            test: true,
            ..Self::default()
        }
    }

    /// Mark this mode as running inside a build
    pub fn with_build_time(mut self) -> Self {
        self.build_time = true;
        self
    }

    /// Mark this mode as running inside static page generation
    pub fn with_static_generation(mut self) -> Self {
        self.static_generation = true;
        self
    }

    /// True during build-time execution or static generation
    pub fn is_build_phase(&self) -> bool {
        self.build_time || self.static_generation
    }

    /// Detect mode flags from the environment
    ///
    /// `APP_ENV` selects production, development or test; anything else
    /// (including absence) means development. `APP_BUILD_PHASE` set to
    /// `build` or `static` marks the corresponding build phase.
    pub fn detect(env: &EnvSnapshot) -> Self {
        let mut mode = match env
            .get(keys::APP_ENV)
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("production") => Self::production(),
            Some("test") => Self::test(),
            _ => Self::development(),
        };

        match env
            .get(keys::APP_BUILD_PHASE)
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("build") => mode.build_time = true,
            Some("static") => mode.static_generation = true,
            _ => {}
        }

        mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_defaults_to_development() {
        let mode = RuntimeMode::detect(&EnvSnapshot::default());
        assert_eq!(mode, RuntimeMode::development());
        assert!(!mode.is_build_phase());
    }

    #[test]
    fn test_detect_production_build() {
        let env = EnvSnapshot::from_pairs([("APP_ENV", "Production"), ("APP_BUILD_PHASE", "build")]);
        let mode = RuntimeMode::detect(&env);

        assert!(mode.production);
        assert!(mode.build_time);
        assert!(!mode.static_generation);
        assert!(mode.is_build_phase());
    }

    #[test]
    fn test_detect_static_generation() {
        let env = EnvSnapshot::from_pairs([("APP_BUILD_PHASE", "static")]);
        let mode = RuntimeMode::detect(&env);

        assert!(mode.development);
        assert!(mode.static_generation);
        assert!(mode.is_build_phase());
    }

    #[test]
    fn test_detect_unknown_values_ignored() {
        let env = EnvSnapshot::from_pairs([("APP_ENV", "staging"), ("APP_BUILD_PHASE", "ci")]);
        assert_eq!(RuntimeMode::detect(&env), RuntimeMode::development());
    }

    #[test]
    fn test_detect_test_mode() {
        let env = EnvSnapshot::from_pairs([("APP_ENV", "test")]);
        let mode = RuntimeMode::detect(&env);
        assert!(mode.test);
        assert!(!mode.development);
        assert!(!mode.production);
    }
}
