use std::str::FromStr;

use serde::Deserialize;
use surrealdb::{engine::any::Any, Surreal};

use crate::error::{Error, Result};
use crate::helpers::thing_helpers::create_user_thing;
use crate::models::user::{Role, UserPublic, UserRecord};

#[derive(Debug, Deserialize)]
pub struct UpdateMePayload {
    pub name: Option<String>,
    pub email: Option<String>,
    // Present only to detect misuse of this route.
    pub password: Option<String>,
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetRolePayload {
    pub role: String,
}

pub struct UserService;

impl UserService {
    /// Self-service profile edit, restricted to name and email. Password
    /// material is routed through the dedicated password endpoint.
    pub async fn update_me(
        db: &Surreal<Any>,
        user: &UserRecord,
        payload: UpdateMePayload,
    ) -> Result<UserRecord> {
        if payload.password.is_some() || payload.password_confirm.is_some() {
            return Err(Error::Validation {
                message: "This route is not for password updates. Please use /updateMyPassword."
                    .to_string(),
            });
        }

        let name = match &payload.name {
            None => user.name.clone(),
            Some(name) if name.trim().is_empty() => {
                return Err(Error::Validation {
                    message: "Invalid user fields: name".to_string(),
                })
            }
            Some(name) => name.trim().to_string(),
        };

        let email = match &payload.email {
            None => user.email.clone(),
            Some(raw) => {
                let email = raw.trim().to_lowercase();
                if email != user.email {
                    let sql = "SELECT * FROM user WHERE email = $email";
                    let existing: Option<UserRecord> =
                        db.query(sql).bind(("email", email.clone())).await?.take(0)?;
                    if existing.is_some() {
                        return Err(Error::EmailTaken { email });
                    }
                }
                email
            }
        };

        let user_id = user.id.as_ref().ok_or(Error::DbError("User has no id".into()))?;
        let user_thing = create_user_thing(&user_id.to_string());

        let sql = "UPDATE $user_thing SET name = $name, email = $email";
        let mut response = db
            .query(sql)
            .bind(("user_thing", user_thing))
            .bind(("name", name))
            .bind(("email", email))
            .await?;

        let updated: Option<UserRecord> = response.take(0)?;
        updated.ok_or(Error::DbError("Could not update user".into()))
    }

    pub async fn delete_me(db: &Surreal<Any>, user: &UserRecord) -> Result<()> {
        let user_id = user.id.as_ref().ok_or(Error::DbError("User has no id".into()))?;
        let user_thing = create_user_thing(&user_id.to_string());

        let _deleted: Option<UserRecord> = db
            .delete((user_thing.tb.as_str(), user_thing.id.to_raw()))
            .await?;
        Ok(())
    }

    pub async fn get_all_users(db: &Surreal<Any>) -> Result<Vec<UserPublic>> {
        let sql = "SELECT * FROM user ORDER BY created_at DESC";
        let mut response = db.query(sql).await?;
        let users: Vec<UserRecord> = response.take(0)?;

        Ok(users.into_iter().map(UserPublic::from).collect())
    }

    /// Admin-only role elevation, the counterpart of signup never honoring a
    /// client-supplied role.
    pub async fn set_role(db: &Surreal<Any>, user_id: &str, payload: SetRolePayload) -> Result<UserPublic> {
        let role = Role::from_str(&payload.role).map_err(|_| Error::Validation {
            message: format!("Invalid role '{}'", payload.role),
        })?;

        let user_thing = create_user_thing(user_id);

        let mut response = db
            .query("SELECT * FROM $user_thing")
            .bind(("user_thing", user_thing.clone()))
            .await?;
        let existing: Option<UserRecord> = response.take(0)?;
        if existing.is_none() {
            return Err(Error::UserNotFound {
                id: user_id.to_string(),
            });
        }

        let sql = "UPDATE $user_thing SET role = $role";
        let mut response = db
            .query(sql)
            .bind(("user_thing", user_thing))
            .bind(("role", role))
            .await?;

        let updated: Option<UserRecord> = response.take(0)?;
        updated
            .map(UserPublic::from)
            .ok_or(Error::DbError("Could not update role".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::SignupPayload;
    use crate::services::auth_service::AuthService;
    use surrealdb::engine::any::connect;

    async fn setup_db() -> Surreal<Any> {
        let db = connect("mem://").await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        db
    }

    async fn signup(db: &Surreal<Any>, email: &str) -> UserRecord {
        AuthService::signup(
            db,
            SignupPayload {
                name: "A".to_string(),
                email: email.to_string(),
                password: "secret123".to_string(),
                password_confirm: "secret123".to_string(),
                role: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_update_me_rejects_password_material() {
        let db = setup_db().await;
        let user = signup(&db, "a@x.com").await;

        let err = UserService::update_me(
            &db,
            &user,
            UpdateMePayload {
                name: None,
                email: None,
                password: Some("sneaky12".to_string()),
                password_confirm: None,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_me_changes_name_and_checks_email_uniqueness() {
        let db = setup_db().await;
        let user = signup(&db, "a@x.com").await;
        signup(&db, "taken@x.com").await;

        let updated = UserService::update_me(
            &db,
            &user,
            UpdateMePayload {
                name: Some("New Name".to_string()),
                email: None,
                password: None,
                password_confirm: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.email, "a@x.com");

        let err = UserService::update_me(
            &db,
            &user,
            UpdateMePayload {
                name: None,
                email: Some("taken@x.com".to_string()),
                password: None,
                password_confirm: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::EmailTaken { .. }));
    }

    #[tokio::test]
    async fn test_delete_me_removes_user() {
        let db = setup_db().await;
        let user = signup(&db, "a@x.com").await;

        UserService::delete_me(&db, &user).await.unwrap();

        let users = UserService::get_all_users(&db).await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_set_role() {
        let db = setup_db().await;
        let user = signup(&db, "a@x.com").await;
        let user_id = user.id.as_ref().unwrap().id.to_string();

        let err = UserService::set_role(
            &db,
            "ghost",
            SetRolePayload {
                role: "admin".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::UserNotFound { .. }));

        let err = UserService::set_role(
            &db,
            &user_id,
            SetRolePayload {
                role: "overlord".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));

        let updated = UserService::set_role(
            &db,
            &user_id,
            SetRolePayload {
                role: "admin".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.role, Role::Admin);
    }
}
