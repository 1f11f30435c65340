use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserPatch};

use super::error::UserError;

fn normalize_name(name: &str) -> Result<String, UserError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UserError::ValidationError("Name required".to_string()));
    }
    Ok(name.to_string())
}

fn normalize_email(email: &str) -> Result<String, UserError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(UserError::ValidationError("Email required".to_string()));
    }
    if !email.contains('@') {
        return Err(UserError::ValidationError(format!("Malformed email: {email}")));
    }
    Ok(email.to_string())
}

impl Entity for User {
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();
    type Error = UserError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new User from registration params.
    ///
    /// # Errors
    /// Rejects blank names and empty or malformed emails.
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, UserError> {
        Ok(Self {
            id,
            name: normalize_name(&params.name)?,
            email: normalize_email(&params.email)?,
            role: params.role,
        })
    }

    fn on_update(&mut self, patch: UserPatch) -> Result<(), UserError> {
        if let Some(name) = patch.name {
            self.name = normalize_name(&name)?;
        }
        if let Some(email) = patch.email {
            self.email = normalize_email(&email)?;
        }
        Ok(())
    }

    /// Currently, no custom actions are defined for users.
    fn handle_action(&mut self, _action: ()) -> Result<(), UserError> {
        Ok(())
    }

    /// Emails identify accounts, compared case-insensitively.
    fn unique_key(&self) -> Option<String> {
        Some(self.email.to_lowercase())
    }
}
