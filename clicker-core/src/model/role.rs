use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Роль участника в паре.
///
/// `Desktop` is the receiver that acts on commands, `Web` is the handheld controller.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Desktop,
    Web,
}

impl Role {
    pub fn peer(self) -> Self {
        match self {
            Role::Desktop => Role::Web,
            Role::Web => Role::Desktop,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Desktop => "desktop",
            Role::Web => "web",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid role '{0}', expected 'desktop' or 'web'")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Role::Desktop),
            "web" => Ok(Role::Web),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
