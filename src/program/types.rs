//! Type definitions for bookkeeper transactions.

use crate::program::constants::{action, attribute};
use crate::program::error::SdkError;

// ============================================================================
// Enums
// ============================================================================

/// Bookkeeper action: grant or revoke bookkeeper status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BookkeeperAction {
    /// Grant bookkeeper status
    Add = action::ADD,
    /// Revoke bookkeeper status
    Sub = action::SUB,
}

impl BookkeeperAction {
    /// Map the boolean operation flag (`true` = grant).
    pub fn from_operation(operation: bool) -> Self {
        if operation {
            Self::Add
        } else {
            Self::Sub
        }
    }

    /// The boolean operation flag (`true` = grant).
    pub fn operation(self) -> bool {
        matches!(self, Self::Add)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
        }
    }
}

impl TryFrom<u8> for BookkeeperAction {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            action::ADD => Ok(Self::Add),
            action::SUB => Ok(Self::Sub),
            _ => Err(SdkError::InvalidAction(value)),
        }
    }
}

impl std::fmt::Display for BookkeeperAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction attribute usage tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AttributeUsage {
    /// Uniqueness nonce (decimal ASCII string)
    Nonce = attribute::NONCE,
}

impl TryFrom<u8> for AttributeUsage {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            attribute::NONCE => Ok(Self::Nonce),
            _ => Err(SdkError::InvalidAttributeUsage(value)),
        }
    }
}
