//! Admin user provisioning command.
//!
//! # Usage
//!
//! ```bash
//! clementine-cli admin create -e admin@example.com -n "Admin Name" -p "s3cure-pass"
//! ```
//!
//! The HTTP registration endpoint only ever creates customers; this
//! command is the single path to the admin role. If the email already
//! has an account it is promoted to admin and its password is reset.

use clementine_api::db::UserRepository;
use clementine_api::services::auth::hash_password;
use clementine_core::Email;

use super::CommandError;

/// Create a new admin user, or promote an existing account.
///
/// # Errors
///
/// Returns an error if the email is malformed, `DATABASE_URL` is unset,
/// or the upsert fails.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidEmail(e.to_string()))?;
    let password_hash = hash_password(password)?;

    let pool = super::connect().await?;

    tracing::info!("Provisioning admin user: {email}");
    let user = UserRepository::new(&pool)
        .upsert_admin(name, &email, &password_hash)
        .await?;

    tracing::info!("Admin user ready! ID: {}, Email: {}", user.id, user.email);
    Ok(())
}
