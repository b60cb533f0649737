use lazy_regex::regex_is_match;
use surrealdb::{engine::any::Any, Surreal};

use crate::auth::models::{LoginPayload, SignupPayload, UpdatePasswordPayload};
use crate::auth::password_service;
use crate::error::{Error, Result};
use crate::helpers::thing_helpers::create_user_thing;
use crate::models::user::{Role, UserRecord};

pub const MIN_PASSWORD_LEN: usize = 8;

pub struct AuthService;

impl AuthService {
    /// Creates a user. The role is always the lowest-privilege one here;
    /// elevation goes through [`crate::services::user_service::UserService::set_role`].
    pub async fn signup(db: &Surreal<Any>, payload: SignupPayload) -> Result<UserRecord> {
        validate_signup(&payload)?;

        let email = payload.email.trim().to_lowercase();

        let sql = "SELECT * FROM user WHERE email = $email";
        let mut result = db.query(sql).bind(("email", email.clone())).await?;
        let existing: Option<UserRecord> = result.take(0)?;
        if existing.is_some() {
            return Err(Error::EmailTaken { email });
        }

        let hashed_password = password_service::hash_password(&payload.password)?;
        let new_user = UserRecord {
            id: None,
            name: payload.name.trim().to_string(),
            email,
            password: hashed_password,
            role: Role::User,
            created_at: chrono::Utc::now().into(),
            password_changed_at: None,
        };

        db.create("user")
            .content(new_user)
            .await?
            .ok_or(Error::DbError("Could not create user".into()))
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(db: &Surreal<Any>, payload: LoginPayload) -> Result<UserRecord> {
        let (email, password) = match (payload.email, payload.password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                (email.trim().to_lowercase(), password)
            }
            _ => return Err(Error::MissingCredentials),
        };

        let sql = "SELECT * FROM user WHERE email = $email";
        let user: Option<UserRecord> = db.query(sql).bind(("email", email)).await?.take(0)?;

        let user = user.ok_or(Error::LoginFail)?;

        if !password_service::verify_password(&password, &user.password)? {
            return Err(Error::LoginFail);
        }

        Ok(user)
    }

    pub async fn update_password(
        db: &Surreal<Any>,
        user: &UserRecord,
        payload: UpdatePasswordPayload,
    ) -> Result<UserRecord> {
        if !password_service::verify_password(&payload.password_current, &user.password)? {
            return Err(Error::WrongCurrentPassword);
        }

        if payload.password.len() < MIN_PASSWORD_LEN {
            return Err(Error::Validation {
                message: format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            });
        }
        if payload.password != payload.password_confirm {
            return Err(Error::Validation {
                message: "Passwords do not match".to_string(),
            });
        }

        let user_id = user.id.as_ref().ok_or(Error::DbError("User has no id".into()))?;
        let user_thing = create_user_thing(&user_id.to_string());

        let hashed_password = password_service::hash_password(&payload.password)?;

        let sql = "UPDATE $user_thing SET password = $password, password_changed_at = $changed_at";
        let mut response = db
            .query(sql)
            .bind(("user_thing", user_thing))
            .bind(("password", hashed_password))
            .bind((
                "changed_at",
                surrealdb::Datetime::from(chrono::Utc::now()),
            ))
            .await?;

        let updated: Option<UserRecord> = response.take(0)?;
        updated.ok_or(Error::DbError("Could not update password".into()))
    }
}

fn validate_signup(payload: &SignupPayload) -> Result<()> {
    let mut bad_fields = Vec::new();

    if payload.name.trim().is_empty() {
        bad_fields.push("name");
    }
    if !regex_is_match!(r"^[^@\s]+@[^@\s]+\.[^@\s]+$", payload.email.trim()) {
        bad_fields.push("email");
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        bad_fields.push("password");
    }

    if !bad_fields.is_empty() {
        return Err(Error::Validation {
            message: format!("Invalid signup fields: {}", bad_fields.join(", ")),
        });
    }

    if payload.password != payload.password_confirm {
        return Err(Error::Validation {
            message: "Passwords do not match".to_string(),
        });
    }

    Ok(())
}
