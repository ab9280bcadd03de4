/// User accounts: registration, login and self-service updates
///
/// Account changes follow one rule: a user may update or delete only their
/// own account. The caller is identified by the email in their token.

use sqlx::PgPool;
use tracing::{debug, info};

use super::error::{ServiceError, ServiceResult};
use crate::auth::password::{hash_password_async, verify_password_async};
use crate::models::task::Task;
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::patch::Patch;

/// Input for registering a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,

    /// Plaintext; hashed before it is stored
    pub password: String,
}

/// Partial update of a user account
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Patch<String>,
    pub last_name: Patch<String>,
    pub email: Patch<String>,

    /// Plaintext; re-hashed when present
    pub password: Patch<String>,
}

#[derive(Debug, Clone)]
pub struct UserService {
    pool: PgPool,
}

/// Fails unless the caller is the owner of the target account
fn ensure_owner(caller: Option<&User>, target_id: i64) -> ServiceResult<()> {
    match caller {
        Some(user) if user.id == target_id => Ok(()),
        _ => Err(ServiceError::AccessDenied(
            "You can only modify your own account".to_string(),
        )),
    }
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> ServiceResult<Vec<User>> {
        Ok(User::list(&self.pool).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<User> {
        User::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    /// Registers a user, hashing the password
    ///
    /// # Errors
    ///
    /// A duplicate email surfaces as a `Database` error carrying the
    /// `users_email_key` unique violation.
    pub async fn create(&self, input: NewUser) -> ServiceResult<User> {
        let password_hash = hash_password_async(input.password).await?;

        let user = User::create(
            &self.pool,
            CreateUser {
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email,
                password_hash,
            },
        )
        .await?;

        info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Updates the account `id` on behalf of `caller_email`
    ///
    /// Checks run in this order: the account must exist (`NotFound`), the
    /// caller must own it (`AccessDenied`), then `null` is rejected for email
    /// and password (`Validation`).
    pub async fn update(
        &self,
        id: i64,
        caller_email: &str,
        changes: UserChanges,
    ) -> ServiceResult<User> {
        self.find_by_id(id).await?;

        let caller = User::find_by_email(&self.pool, caller_email).await?;
        ensure_owner(caller.as_ref(), id)?;

        let email = changes.email.into_required("email")?;
        let password_hash = match changes.password.into_required("password")? {
            Some(password) => Some(hash_password_async(password).await?),
            None => None,
        };

        let update = UpdateUser {
            first_name: changes.first_name.into_option(),
            last_name: changes.last_name.into_option(),
            email,
            password_hash,
        };

        let user = User::update(&self.pool, id, update)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;

        info!(user_id = user.id, "User updated");
        Ok(user)
    }

    /// Deletes the account `id` on behalf of `caller_email`
    ///
    /// Ownership is checked first (`AccessDenied`), then whether any task is
    /// still assigned to the user (`AssociatedEntityExists`).
    pub async fn delete(&self, id: i64, caller_email: &str) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        let caller = User::find_by_email(&mut *tx, caller_email).await?;
        ensure_owner(caller.as_ref(), id)?;

        if Task::exists_with_assignee(&mut *tx, id).await? {
            return Err(ServiceError::AssociatedEntityExists(
                "User is assigned to one or more tasks".to_string(),
            ));
        }

        if !User::delete(&mut *tx, id).await? {
            return Err(ServiceError::not_found("User", id));
        }

        tx.commit().await?;

        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Checks an email/password pair, returning the user on success
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown email or a wrong password.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let Some(user) = User::find_by_email(&self.pool, email).await? else {
            debug!("Login attempt for unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        let matches =
            verify_password_async(password.to_string(), user.password_hash.clone()).await?;
        if !matches {
            debug!(user_id = user.id, "Login attempt with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }
}
