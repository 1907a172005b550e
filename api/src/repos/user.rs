use sqlx::SqlitePool;

use crate::models::user::{NewUser, User};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, username, \
     phone_number, date_of_birth, marital_status, two_factor, login_by, is_staff, is_admin, \
     is_customer, staff_role, date_joined, last_login";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &SqlitePool, user: &NewUser) -> Result<i64, sqlx::Error> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (email, password_hash, first_name, last_name, is_staff, is_admin, \
             is_customer, staff_role) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_staff)
        .bind(user.is_admin)
        .bind(user.is_customer)
        .bind(user.staff_role.map(|r| r.code()))
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    /// Email match is case-insensitive (`COLLATE NOCASE` on the column).
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn touch_last_login(pool: &SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn list_customers(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_customer = 1 ORDER BY id"
        ))
        .fetch_all(pool)
        .await
    }
}
