//! Startup provisioning of the first administrator account.
//!
//! Self-registration only ever creates students, so a fresh deployment needs
//! one `ADMIN` seeded from configuration to promote anyone else.

use unispace_core::model::{NewUser, User};
use unispace_core::roles::Role;
use unispace_core::store::UserStore;

use crate::auth::password::hash_password;
use crate::config::AdminSeed;
use crate::error::{AppError, AppResult};

/// Create the configured administrator unless an account with that email
/// already exists. Returns the created user, or `None` if nothing was done.
///
/// An existing account is left untouched, whatever its role or password.
pub async fn ensure_admin(users: &dyn UserStore, seed: &AdminSeed) -> AppResult<Option<User>> {
    if let Some(existing) = users.find_by_email(&seed.email).await? {
        tracing::debug!(user_id = existing.id, role = %existing.role, "Admin seed already present");
        return Ok(None);
    }

    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let admin = users
        .create(&NewUser {
            first_name: "System".into(),
            last_name: "Administrator".into(),
            email: seed.email.clone(),
            password_hash,
            role: Role::Admin,
        })
        .await?;

    tracing::info!(user_id = admin.id, email = %admin.email, "Seeded administrator account");
    Ok(Some(admin))
}

#[cfg(test)]
mod tests {
    use unispace_core::store::memory::MemoryStore;

    use super::*;
    use crate::auth::password::verify_password;

    fn seed() -> AdminSeed {
        AdminSeed {
            email: "root@unispace.test".into(),
            password: "Adm1n!pass".into(),
        }
    }

    #[tokio::test]
    async fn creates_admin_once() {
        let store = MemoryStore::new();

        let created = ensure_admin(&store, &seed()).await.unwrap().unwrap();
        assert_eq!(created.role, Role::Admin);
        assert!(verify_password("Adm1n!pass", &created.password_hash).unwrap());

        assert!(ensure_admin(&store, &seed()).await.unwrap().is_none());
        assert_eq!(UserStore::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn existing_account_is_not_promoted() {
        let store = MemoryStore::new();
        store
            .create(&NewUser {
                first_name: "Ana".into(),
                last_name: "Kovač".into(),
                email: "root@unispace.test".into(),
                password_hash: "hash".into(),
                role: Role::Student,
            })
            .await
            .unwrap();

        assert!(ensure_admin(&store, &seed()).await.unwrap().is_none());
        let user = store
            .find_by_email("root@unispace.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, Role::Student);
    }
}
