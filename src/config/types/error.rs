//! Configuration errors.
//!
//! Loading fails fast on IO and TOML errors. Field validation instead
//! collects every problem into [`ConfigDiagnostics`], so one run of
//! `deskfeed check` reports e.g. both a missing `sanity.project_id` and a
//! zero `image.width`.

use super::FieldPath;
use owo_colors::{OwoColorize, Stream, Style};
use std::{fmt, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`", .0.display())]
    Read(PathBuf, #[source] std::io::Error),

    #[error("invalid TOML in config file")]
    Parse(#[from] toml::de::Error),

    #[error("no origin for feed links: pass --origin or set site.url")]
    NoOrigin,

    #[error("site.url `{0}` has no origin")]
    InvalidOrigin(String),

    // no #[from]: a source() would print every problem twice
    #[error("{0}")]
    Invalid(ConfigDiagnostics),
}

/// One invalid field, e.g. `[serve.route]` with "route 'feed.xml' must start with '/'".
#[derive(Debug, Clone)]
struct Problem {
    field: FieldPath,
    message: String,
    hint: Option<String>,
}

/// Validation problems gathered across all config sections.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    problems: Vec<Problem>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.problems.push(Problem {
            field,
            message: message.into(),
            hint: None,
        });
    }

    /// Record a problem together with the value or action that would fix it.
    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.problems.push(Problem {
            field,
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.problems.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.has_errors() { Err(self) } else { Ok(()) }
    }
}

/// Paint `text` for stderr, where config errors end up.
fn paint(text: &str, style: Style) -> String {
    text.if_supports_color(Stream::Stderr, |t| t.style(style))
        .to_string()
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", paint(self.field.as_str(), Style::new().cyan()))?;
        write!(f, "{} {}", paint("→", Style::new().red()), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  {} {hint}", paint("hint:", Style::new().yellow()))?;
        }
        Ok(())
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.problems.len();
        let heading = match count {
            1 => "config has 1 problem:".to_string(),
            n => format!("config has {n} problems:"),
        };
        writeln!(f, "{}\n", paint(&heading, Style::new().red().bold()))?;

        for (i, problem) in self.problems.iter().enumerate() {
            if i > 0 {
                writeln!(f, "\n")?;
            }
            write!(f, "{problem}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
