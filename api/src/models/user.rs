use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Staff rank stored in `users.staff_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    Moderator,
    Support,
}

impl StaffRole {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Admin),
            2 => Some(Self::Moderator),
            3 => Some(Self::Support),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Admin => 1,
            Self::Moderator => 2,
            Self::Support => 3,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub marital_status: String,
    pub two_factor: bool,
    pub login_by: i64,
    pub is_staff: bool,
    pub is_admin: bool,
    pub is_customer: bool,
    pub staff_role: Option<i64>,
    pub date_joined: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

impl User {
    /// Staff and admin accounts may use the management API; customers may not.
    pub fn has_staff_access(&self) -> bool {
        self.is_staff || self.is_admin
    }

    pub fn role(&self) -> Option<StaffRole> {
        self.staff_role.and_then(StaffRole::from_code)
    }
}

/// Account insert; registration itself lives elsewhere, this backs the
/// bootstrap admin and fixtures.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_admin: bool,
    pub is_customer: bool,
    pub staff_role: Option<StaffRole>,
}

/// Customer row as shown in the admin user list.
#[derive(Debug, Serialize)]
pub struct CustomerSummary {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub marital_status: String,
    pub two_factor: bool,
    pub login_by: i64,
    pub date_joined: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

impl From<User> for CustomerSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            phone_number: user.phone_number,
            date_of_birth: user.date_of_birth,
            marital_status: user.marital_status,
            two_factor: user.two_factor,
            login_by: user.login_by,
            date_joined: user.date_joined,
            last_login: user.last_login,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_round_trip_and_unknown_codes_are_none() {
        for role in [StaffRole::Admin, StaffRole::Moderator, StaffRole::Support] {
            assert_eq!(StaffRole::from_code(role.code()), Some(role));
        }
        assert_eq!(StaffRole::from_code(0), None);
        assert_eq!(StaffRole::from_code(4), None);
    }
}
