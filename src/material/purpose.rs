//! Material purposes and binding strengths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::Relationship;
use crate::util::{Error, Result};
use super::{STRONGER_THAN_DESCENDENTS, WEAKER_THAN_DESCENDENTS};

/// Rendering context a material binding applies to.
///
/// `allPurpose` bindings are the fallback for every other purpose. Its
/// relationship names carry no purpose suffix, and the empty token `""` is
/// accepted as its spelling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Purpose {
    /// Applies to every purpose.
    #[default]
    AllPurpose,
    /// Final-quality rendering.
    Full,
    /// Interactive / preview rendering.
    Preview,
}

impl Purpose {
    /// Every purpose the binding schema knows about.
    pub const ALL: [Purpose; 3] = [Purpose::AllPurpose, Purpose::Full, Purpose::Preview];

    /// Parse a purpose token.
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "" | "allPurpose" => Ok(Purpose::AllPurpose),
            "full" => Ok(Purpose::Full),
            "preview" => Ok(Purpose::Preview),
            _ => Err(Error::InvalidPurpose {
                purpose: token.to_string(),
                allowed: Self::ALL.iter().map(|p| p.as_token().to_string()).collect(),
            }),
        }
    }

    /// Token spelling.
    pub fn as_token(&self) -> &'static str {
        match self {
            Purpose::AllPurpose => "allPurpose",
            Purpose::Full => "full",
            Purpose::Preview => "preview",
        }
    }

    /// Namespace suffix used in relationship names; None for `allPurpose`.
    pub fn namespace_suffix(&self) -> Option<&'static str> {
        match self {
            Purpose::AllPurpose => None,
            other => Some(other.as_token()),
        }
    }
}

impl FromStr for Purpose {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s)
    }
}

impl TryFrom<String> for Purpose {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::from_token(&s)
    }
}

impl From<Purpose> for String {
    fn from(purpose: Purpose) -> Self {
        purpose.as_token().to_string()
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Whether a binding may override bindings found on descendants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BindingStrength {
    /// Descendant bindings win (default).
    #[default]
    WeakerThanDescendents,
    /// This binding wins over any descendant binding.
    StrongerThanDescendents,
}

impl BindingStrength {
    /// Parse strength from its token. Unknown tokens mean the default.
    pub fn from_token(token: &str) -> Self {
        match token {
            STRONGER_THAN_DESCENDENTS => BindingStrength::StrongerThanDescendents,
            _ => BindingStrength::WeakerThanDescendents,
        }
    }

    /// Token spelling.
    pub fn as_token(&self) -> &'static str {
        match self {
            BindingStrength::WeakerThanDescendents => WEAKER_THAN_DESCENDENTS,
            BindingStrength::StrongerThanDescendents => STRONGER_THAN_DESCENDENTS,
        }
    }

    /// Read the `bindMaterialAs` metadata of a binding relationship.
    /// A missing relationship has the default strength.
    pub fn of(relationship: Option<&Relationship>) -> Self {
        relationship
            .and_then(|rel| rel.metadata().bind_material_as())
            .map(Self::from_token)
            .unwrap_or_default()
    }

    /// True for `strongerThanDescendents`.
    #[inline]
    pub fn is_stronger(&self) -> bool {
        *self == BindingStrength::StrongerThanDescendents
    }
}

impl fmt::Display for BindingStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}
