//! Roles and Capabilities
//!
//! Static permission table keyed by role. Callers query a `Permissions`
//! value once instead of comparing role names inline.

use serde::{Deserialize, Serialize};

/// User role as sent by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    PrManager,
    /// Restricted role
    #[default]
    Developer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::PrManager => "pr_manager",
            Role::Developer => "developer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "pr_manager" => Some(Role::PrManager),
            "developer" => Some(Role::Developer),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    // Board
    ViewTasks,
    ApplyFilters,
    AddColumns,
    RenameColumns,
    DeleteColumns,
    DeleteNonEmptyColumns,
    CreateTasks,
    DeleteTasks,
    AssignTasks,
    SetDueDates,
    UpdateTaskStatus,
    EditTaskDetails,
    // Project and administration
    ModifyProjects,
    AddProjects,
    CreateProject,
    AddMilestones,
    UseTemplates,
    UseAutoAssign,
    ViewReports,
    CreateUsers,
    DeleteUsers,
    ModifyUsers,
    AccessAllProjects,
}

impl Capability {
    pub fn describe(&self) -> &'static str {
        match self {
            Capability::ViewTasks => "view tasks",
            Capability::ApplyFilters => "apply filters",
            Capability::AddColumns => "add columns",
            Capability::RenameColumns => "rename columns",
            Capability::DeleteColumns => "delete columns",
            Capability::DeleteNonEmptyColumns => "delete non-empty columns",
            Capability::CreateTasks => "create tasks",
            Capability::DeleteTasks => "delete tasks",
            Capability::AssignTasks => "assign tasks",
            Capability::SetDueDates => "set due dates",
            Capability::UpdateTaskStatus => "update task status",
            Capability::EditTaskDetails => "edit task details",
            Capability::ModifyProjects => "modify projects",
            Capability::AddProjects => "add projects",
            Capability::CreateProject => "create projects",
            Capability::AddMilestones => "add milestones",
            Capability::UseTemplates => "use templates",
            Capability::UseAutoAssign => "use auto-assign",
            Capability::ViewReports => "view reports",
            Capability::CreateUsers => "create users",
            Capability::DeleteUsers => "delete users",
            Capability::ModifyUsers => "modify users",
            Capability::AccessAllProjects => "access all projects",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

const BOARD_BASICS: &[Capability] = &[
    Capability::ViewTasks,
    Capability::ApplyFilters,
    Capability::AddColumns,
    Capability::RenameColumns,
    Capability::DeleteColumns,
    Capability::UpdateTaskStatus,
    Capability::EditTaskDetails,
];

const BOARD_MANAGEMENT: &[Capability] = &[
    Capability::DeleteNonEmptyColumns,
    Capability::CreateTasks,
    Capability::DeleteTasks,
    Capability::AssignTasks,
    Capability::SetDueDates,
];

const ADMIN_EXTRA: &[Capability] = &[
    Capability::ModifyProjects,
    Capability::DeleteUsers,
    Capability::ModifyUsers,
    Capability::ViewReports,
    Capability::AccessAllProjects,
];

const PR_MANAGER_EXTRA: &[Capability] = &[Capability::ModifyProjects, Capability::AddProjects];

const DEVELOPER_EXTRA: &[Capability] = &[Capability::AddMilestones];

/// Capability set of one role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    role: Role,
}

impl Permissions {
    pub fn for_role(role: Role) -> Self {
        Self { role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn allows(&self, capability: Capability) -> bool {
        if BOARD_BASICS.contains(&capability) {
            return true;
        }
        match self.role {
            Role::Admin => BOARD_MANAGEMENT.contains(&capability) || ADMIN_EXTRA.contains(&capability),
            Role::PrManager => {
                BOARD_MANAGEMENT.contains(&capability) || PR_MANAGER_EXTRA.contains(&capability)
            }
            Role::Developer => DEVELOPER_EXTRA.contains(&capability),
        }
    }

    /// Check a capability, producing the error used by every gated operation
    pub fn require(&self, capability: Capability) -> Result<(), super::BoardError> {
        if self.allows(capability) {
            Ok(())
        } else {
            Err(super::BoardError::PermissionDenied { role: self.role, capability })
        }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::for_role(Role::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_developer_is_restricted_on_the_board() {
        let dev = Permissions::for_role(Role::Developer);
        assert!(dev.allows(Capability::DeleteColumns));
        assert!(dev.allows(Capability::RenameColumns));
        assert!(dev.allows(Capability::UpdateTaskStatus));
        assert!(!dev.allows(Capability::DeleteNonEmptyColumns));
        assert!(!dev.allows(Capability::CreateTasks));
        assert!(!dev.allows(Capability::DeleteTasks));
        assert!(!dev.allows(Capability::AssignTasks));
        assert!(!dev.allows(Capability::SetDueDates));
        assert!(dev.allows(Capability::AddMilestones));
    }

    #[test]
    fn test_managers_can_manage_the_board() {
        for role in [Role::Admin, Role::PrManager] {
            let perms = Permissions::for_role(role);
            assert!(perms.allows(Capability::DeleteNonEmptyColumns));
            assert!(perms.allows(Capability::CreateTasks));
            assert!(perms.allows(Capability::AssignTasks));
            assert!(perms.allows(Capability::ModifyProjects));
            assert!(!perms.allows(Capability::CreateUsers));
        }
        assert!(Permissions::for_role(Role::Admin).allows(Capability::ViewReports));
        assert!(!Permissions::for_role(Role::PrManager).allows(Capability::ViewReports));
        assert!(Permissions::for_role(Role::PrManager).allows(Capability::AddProjects));
    }

    #[test]
    fn test_require_reports_role_and_capability() {
        let err = Permissions::for_role(Role::Developer)
            .require(Capability::DeleteTasks)
            .unwrap_err();
        assert_eq!(err.to_string(), "Permission denied: developer cannot delete tasks");
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::PrManager).unwrap(), "\"pr_manager\"");
        assert_eq!(Role::from_str("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str("guest"), None);
    }
}
