/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 token generation and validation
/// - [`middleware`]: Bearer token extraction and the request [`middleware::AuthContext`]
///
/// Authorization (who may change which record) is a business rule and lives
/// in the services layer.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::password::{hash_password, verify_password};
/// use taskboard_shared::auth::jwt::{create_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("qwerty")?;
/// assert!(verify_password("qwerty", &hash)?);
///
/// let token = create_token(&Claims::new("hexlet@example.com"), "secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
