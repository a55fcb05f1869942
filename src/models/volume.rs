use serde::Serialize;
use std::fmt;

/// Which of the two storage roles a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Volume {
    Primary,
    Removable,
}

impl Volume {
    pub const ALL: [Volume; 2] = [Volume::Primary, Volume::Removable];

    /// Maps the boolean of the public API: `true` = removable.
    pub fn from_removable(removable: bool) -> Self {
        if removable { Volume::Removable } else { Volume::Primary }
    }

    pub fn is_removable(self) -> bool {
        self == Volume::Removable
    }

    pub fn label(self) -> &'static str {
        match self {
            Volume::Primary   => "primary",
            Volume::Removable => "removable",
        }
    }
}

impl From<bool> for Volume {
    fn from(removable: bool) -> Self {
        Volume::from_removable(removable)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
