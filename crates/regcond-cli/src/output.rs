use serde::Serialize;

/// Environment variable selecting machine-readable error output.
pub const OUTPUT_ENV_VAR: &str = "REGCOND_OUTPUT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

impl OutputMode {
    /// `Json` when `REGCOND_OUTPUT=json` or a `--json` flag is on the
    /// command line.
    #[must_use]
    pub fn detect() -> Self {
        let env = std::env::var(OUTPUT_ENV_VAR).ok();
        Self::from_sources(env.as_deref(), std::env::args().skip(1))
    }

    fn from_sources<I, S>(env: Option<&str>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let env_json = env.is_some_and(|v| v.trim().eq_ignore_ascii_case("json"));
        if env_json || args.into_iter().any(|a| a.as_ref() == "--json") {
            Self::Json
        } else {
            Self::Text
        }
    }

    #[must_use]
    pub fn should_emit_json(self) -> bool {
        self == Self::Json
    }
}

#[cfg(test)]
mod tests {
    use super::OutputMode;

    #[test]
    fn env_selects_json() {
        assert_eq!(
            OutputMode::from_sources(Some(" JSON "), ["merge"]),
            OutputMode::Json
        );
        assert_eq!(OutputMode::from_sources(Some("text"), ["merge"]), OutputMode::Text);
    }

    #[test]
    fn json_flag_selects_json() {
        assert_eq!(
            OutputMode::from_sources(None, ["merge", "--input", "a.json", "--json"]),
            OutputMode::Json
        );
        assert_eq!(OutputMode::from_sources(None, ["validate"]), OutputMode::Text);
    }
}
