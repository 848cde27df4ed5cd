//! Users, roles, and the authenticated caller identity.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Access role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Organization owner.
    SuperAdmin,
    /// Administrator.
    Admin,
    /// Line manager; may review leave and view reports.
    Manager,
    /// Regular employee acting on their own profile.
    Staff,
}

impl Role {
    /// Roles allowed to review leave, list attendance and view the dashboard.
    pub const REVIEWERS: &'static [Role] = &[Role::SuperAdmin, Role::Admin, Role::Manager];

    /// Roles allowed to mutate the employee directory.
    pub const DIRECTORY_ADMINS: &'static [Role] = &[Role::SuperAdmin, Role::Admin];

    /// Every role.
    pub const ALL: &'static [Role] = &[Role::SuperAdmin, Role::Admin, Role::Manager, Role::Staff];

    /// Returns the wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            other => Err(EngineError::Validation {
                field: "role".to_string(),
                message: format!("unknown role '{}'", other),
            }),
        }
    }
}

/// A login account. Only the link to an employee profile matters to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    #[serde(default)]
    pub id: String,
    /// Login email.
    pub email: String,
    /// Access role.
    pub role: Role,
    /// Disabled logins keep their id but cannot act on their employee profile.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// The already-authenticated identity invoking an engine operation.
///
/// The engine trusts this value; it only decides which roles may call
/// which operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// The user's identifier.
    pub user_id: String,
    /// The user's role.
    pub role: Role,
}

impl Caller {
    /// Creates a caller identity.
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Fails with `Unauthorized` unless the caller holds one of `allowed`.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::{Caller, Role};
    ///
    /// let staff = Caller::new("usr_1", Role::Staff);
    /// assert!(staff.require(&[Role::Staff], "apply for leave").is_ok());
    /// assert!(staff.require(Role::REVIEWERS, "approve leave").is_err());
    /// ```
    pub fn require(&self, allowed: &[Role], operation: &'static str) -> EngineResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(EngineError::Unauthorized {
                role: self.role.to_string(),
                operation,
            })
        }
    }

    /// True when the caller acts only on their own employee profile.
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }
}
