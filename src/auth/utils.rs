use crate::{
    auth::Identity,
    errors::{AppError, AppResult},
};

pub fn require_admin(identity: &Identity) -> AppResult<()> {
    if !identity.is_admin {
        return Err(AppError::Forbidden("Admin only".to_string()));
    }
    Ok(())
}
