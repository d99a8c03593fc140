use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state checker result.
///
/// The checker itself only ever answers `Pass` or `Fail`; `Indeterminate`
/// exists for hosts that have no evaluable input for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
    Indeterminate,
}

impl Verdict {
    pub fn as_option(self) -> Option<bool> {
        match self {
            Verdict::Pass => Some(true),
            Verdict::Fail => Some(false),
            Verdict::Indeterminate => None,
        }
    }

    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        if value {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

impl From<Option<bool>> for Verdict {
    fn from(value: Option<bool>) -> Self {
        value.map(Verdict::from).unwrap_or(Verdict::Indeterminate)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "True"),
            Verdict::Fail => write!(f, "False"),
            Verdict::Indeterminate => write!(f, "null"),
        }
    }
}
