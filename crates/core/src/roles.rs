//! Account roles.
//!
//! The wire and storage spelling is the upper-case name (`"STUDENT"`,
//! `"NASTAVNIK"`, `"ADMIN"`); it must match the `ck_users_role` check
//! constraint in the `users` table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_STUDENT: &str = "STUDENT";
pub const ROLE_NASTAVNIK: &str = "NASTAVNIK";
pub const ROLE_ADMIN: &str = "ADMIN";

/// Role carried by every identity. Governs what an account may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Read-only access.
    Student,
    /// Instructor: books rooms and manages their own reservations.
    Nastavnik,
    /// Full administrative access.
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Nastavnik, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => ROLE_STUDENT,
            Role::Nastavnik => ROLE_NASTAVNIK,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_STUDENT => Ok(Role::Student),
            ROLE_NASTAVNIK => Ok(Role::Nastavnik),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::InvalidInput(format!(
                "Unknown role '{other}'. Must be one of: {ROLE_STUDENT}, {ROLE_NASTAVNIK}, {ROLE_ADMIN}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_role_name() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn rejects_lowercase_and_unknown_names() {
        assert!("admin".parse::<Role>().is_err());
        assert!("TEACHER".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_as_upper_case_name() {
        let json = serde_json::to_string(&Role::Nastavnik).unwrap();
        assert_eq!(json, "\"NASTAVNIK\"");
        let back: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(back, Role::Admin);
    }
}
