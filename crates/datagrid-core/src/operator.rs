//! Filter operators and connectives
//!
//! Operator names travel to the query layer as lower-case literals
//! (`greaterthanorequal`, `startswith`, ...), so the serde and strum
//! representations are kept identical.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Comparison operator of a filter predicate
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FilterOperator {
    // Equality operators
    #[default]
    Equal,
    NotEqual,

    // Comparison operators
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,

    // String operators
    StartsWith,
    EndsWith,
    Contains,
    DoesNotStartWith,
    DoesNotEndWith,
    DoesNotContain,
    Like,
    Wildcard,

    // NULL/Empty operators
    IsNull,
    IsNotNull,
    IsEmpty,
    IsNotEmpty,

    // List and range operators
    In,
    NotIn,
    Between,
}

impl FilterOperator {
    /// Symbol typed into a filter bar to select this operator, if any.
    ///
    /// `Equal` has no prefix because a bare value already means equality.
    pub fn bar_symbol(&self) -> Option<&'static str> {
        match self {
            Self::NotEqual => Some("!="),
            Self::GreaterThan => Some(">"),
            Self::GreaterThanOrEqual => Some(">="),
            Self::LessThan => Some("<"),
            Self::LessThanOrEqual => Some("<="),
            _ => None,
        }
    }

    /// Returns true for the two operators blank expansion applies to
    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }
}

/// Logical connective joining a predicate to its same-field siblings
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}
