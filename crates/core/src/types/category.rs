//! Product categories.
//!
//! The API sends categories as fixed human-readable labels; each label maps
//! to a CSS modifier used by the card templates
//! (`card__category_<modifier>`).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown product category: {0}")]
pub struct CategoryError(pub String);

/// A product category as labelled by the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "софт-скил")]
    SoftSkill,
    #[serde(rename = "другое")]
    Other,
    #[serde(rename = "хард-скил")]
    HardSkill,
    #[serde(rename = "дополнительное")]
    Additional,
    #[serde(rename = "кнопка")]
    Button,
}

impl Category {
    /// All categories, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::SoftSkill,
        Self::Other,
        Self::HardSkill,
        Self::Additional,
        Self::Button,
    ];

    /// The label shown to the user (and sent by the API).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SoftSkill => "софт-скил",
            Self::Other => "другое",
            Self::HardSkill => "хард-скил",
            Self::Additional => "дополнительное",
            Self::Button => "кнопка",
        }
    }

    /// CSS modifier suffix for the category badge.
    #[must_use]
    pub const fn modifier(self) -> &'static str {
        match self {
            Self::SoftSkill => "soft",
            Self::Other => "other",
            Self::HardSkill => "hard",
            Self::Additional => "additional",
            Self::Button => "button",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}
