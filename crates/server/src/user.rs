//! Minimal view of the users table for authentication.
//!
//! Account management lives elsewhere; the server only reads users to
//! authenticate requests and gate handlers by role.

use sea_orm::entity::prelude::*;

use crate::ServerError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub phone: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn require_role(user: &Model, role: &str) -> Result<(), ServerError> {
    require_any_role(user, &[role])
}

pub fn require_any_role(user: &Model, roles: &[&str]) -> Result<(), ServerError> {
    if roles.contains(&user.role.as_str()) {
        return Ok(());
    }
    Err(ServerError::Engine(engine::EngineError::Forbidden(
        "you are not authorized to perform this action".to_string(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> Model {
        Model {
            id: "user-1".to_string(),
            name: "User One".to_string(),
            email: "user@example.com".to_string(),
            password: "password".to_string(),
            role: role.to_string(),
            phone: None,
        }
    }

    #[test]
    fn matching_role_passes() {
        assert!(require_role(&user("landlord"), "landlord").is_ok());
        assert!(require_any_role(&user("admin"), &["landlord", "admin"]).is_ok());
    }

    #[test]
    fn other_roles_are_rejected() {
        assert!(require_role(&user("tenant"), "landlord").is_err());
        assert!(require_any_role(&user("tenant"), &["landlord", "admin"]).is_err());
    }
}
