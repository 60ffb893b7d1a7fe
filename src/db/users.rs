use crate::{AppError, AppResult};

use super::{Profile, Store, profiles::insert_profile};

impl Store {
    /// Inserts the user and its default profile in one transaction.
    pub async fn create_account(&self, email: &str, password_hash: &str) -> AppResult<Profile> {
        let profile = Profile::new_default(email);
        let mut tx = self.begin_write().await?;

        let inserted = sqlx::query("INSERT INTO users (email,password_hash) VALUES (?,?)")
            .bind(email)
            .bind(password_hash)
            .execute(&mut *tx)
            .await;
        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(AppError::Conflict(format!("{email} is already registered")));
            }
            Err(e) => return Err(e.into()),
        }

        insert_profile(&mut tx, &profile).await?;
        tx.commit().await?;

        tracing::info!(email, profile_id = %profile.id, "account created");
        Ok(profile)
    }

    /// Stored password hash, or `None` for an unknown email.
    pub async fn password_hash(&self, email: &str) -> AppResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT password_hash FROM users WHERE email=?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(hash,)| hash))
    }
}
