use crate::{ProjectqlError, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const PARAM_COLLISION_VAR: &str = "PROJECTQL_PARAM_COLLISION";

/// What a filter builder does when two criteria bind the same parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamCollision {
    /// Last write wins.
    #[default]
    Overwrite,
    /// Remember the collision and fail at `try_build`.
    Reject,
}

impl FromStr for ParamCollision {
    type Err = ProjectqlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            other => Err(ProjectqlError::Config(format!(
                "{PARAM_COLLISION_VAR} must be 'overwrite' or 'reject', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ParamCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => f.write_str("overwrite"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterConfig {
    pub on_collision: ParamCollision,
}

impl FilterConfig {
    pub fn from_env() -> Result<Self> {
        let on_collision = match env::var(PARAM_COLLISION_VAR) {
            Ok(v) => v.parse()?,
            Err(env::VarError::NotPresent) => ParamCollision::default(),
            Err(e) => return Err(ProjectqlError::Config(e.to_string())),
        };
        debug!("Parameter collision policy: {}", on_collision);
        Ok(Self { on_collision })
    }

    pub fn on_collision(mut self, policy: ParamCollision) -> Self {
        self.on_collision = policy;
        self
    }
}
