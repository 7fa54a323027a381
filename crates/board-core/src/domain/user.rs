//! Assignable User

use serde::{Deserialize, Serialize};

use super::role::Role;
use super::wire::nullable;

/// User as listed for task assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

impl UserSummary {
    /// Up to two initials for avatars
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .take(2)
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        let user = UserSummary { id: "u1".into(), name: "ada  lovelace king".into(), role: Role::Developer };
        assert_eq!(user.initials(), "AL");
    }
}
