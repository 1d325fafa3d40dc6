//! Admin Level Value Object
//!
//! Authorization level of an administrator account. The level code is
//! carried verbatim in access-token claims, so codes are part of the
//! wire contract and must stay stable.

use serde::{Deserialize, Serialize};

/// Administrator authorization level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    /// Regular back-office staff
    #[default]
    Staff,
    /// Full administrative access
    SuperAdmin,
}

impl AdminLevel {
    /// Stable string code stored in the database and token claims
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Parse from the stored code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "staff" => Some(Self::Staff),
            "super_admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    pub const fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl std::fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        assert_eq!(AdminLevel::from_code("staff"), Some(AdminLevel::Staff));
        assert_eq!(
            AdminLevel::from_code("super_admin"),
            Some(AdminLevel::SuperAdmin)
        );
        assert_eq!(AdminLevel::from_code("root"), None);
        assert_eq!(AdminLevel::from_code(""), None);
    }

    #[test]
    fn test_default_is_staff() {
        assert_eq!(AdminLevel::default(), AdminLevel::Staff);
        assert!(!AdminLevel::default().is_super_admin());
    }
}
