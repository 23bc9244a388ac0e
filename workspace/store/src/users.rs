//! Account registration, credential checks, and settings updates.

use chrono::Utc;
use model::entities::{prelude::*, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::debug;

use crate::views::UserView;
use crate::{is_unique_violation, password, Result, StoreError};

/// Input for registering a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A partial settings update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.bio.is_none()
            && self.image.is_none()
    }
}

/// Project a user row into the authenticated-account shape.
pub fn user_view(user: &user::Model, token: String) -> UserView {
    UserView {
        email: user.email.clone(),
        token,
        username: user.username.clone(),
        bio: user.bio.clone(),
        image: user.image.clone(),
    }
}

fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(StoreError::Validation("username must not be empty".to_string()));
    }
    if username.len() > 64 {
        return Err(StoreError::Validation(
            "username must be at most 64 characters".to_string(),
        ));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(StoreError::Validation(
            "username must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::Validation(format!("'{email}' is not a valid email address")))
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(StoreError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

/// Register a new account with a hashed password.
///
/// Username and email are pre-checked for uniqueness as a validation failure;
/// a race lost at insert time surfaces as a conflict instead.
pub async fn register<C: ConnectionTrait>(db: &C, new: NewUser) -> Result<user::Model> {
    let username = new.username.trim().to_string();
    // Emails are stored as submitted; uniqueness is case-sensitive.
    let email = new.email.trim().to_string();
    validate_username(&username)?;
    validate_email(&email)?;
    validate_password(&new.password)?;

    if User::find()
        .filter(user::Column::Username.eq(&username))
        .one(db)
        .await?
        .is_some()
    {
        return Err(StoreError::Validation("username is already taken".to_string()));
    }
    if User::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?
        .is_some()
    {
        return Err(StoreError::Validation("email is already registered".to_string()));
    }

    let password_hash = password::hash_password(&new.password)?;
    let result = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        password_hash: Set(password_hash),
        bio: Set(None),
        image: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await;

    match result {
        Ok(user) => {
            debug!("Registered user {} (id {})", user.username, user.id);
            Ok(user)
        }
        Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict(
            "username or email is already taken".to_string(),
        )),
        Err(err) => Err(err.into()),
    }
}

/// Check email/password credentials, returning the matching user.
///
/// Unknown email and wrong password produce the same error so the response
/// does not reveal which accounts exist.
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    let email = email.trim();
    let user = User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or_else(|| StoreError::Authentication("invalid email or password".to_string()))?;

    if password::verify_password(password, &user.password_hash)? {
        Ok(user)
    } else {
        Err(StoreError::Authentication("invalid email or password".to_string()))
    }
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<user::Model> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound("user"))
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<user::Model> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or(StoreError::NotFound("user"))
}

/// Apply a partial settings update to the given account.
pub async fn update_settings<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    patch: SettingsPatch,
) -> Result<user::Model> {
    let current = find_by_id(db, user_id).await?;
    if patch.is_empty() {
        return Ok(current);
    }

    let mut active: user::ActiveModel = current.clone().into();

    if let Some(username) = patch.username {
        let username = username.trim().to_string();
        validate_username(&username)?;
        if username != current.username {
            let taken = User::find()
                .filter(user::Column::Username.eq(&username))
                .one(db)
                .await?
                .is_some();
            if taken {
                return Err(StoreError::Validation("username is already taken".to_string()));
            }
            active.username = Set(username);
        }
    }

    if let Some(email) = patch.email {
        let email = email.trim().to_string();
        validate_email(&email)?;
        if email != current.email {
            let taken = User::find()
                .filter(user::Column::Email.eq(&email))
                .one(db)
                .await?
                .is_some();
            if taken {
                return Err(StoreError::Validation("email is already registered".to_string()));
            }
            active.email = Set(email);
        }
    }

    if let Some(password) = patch.password {
        validate_password(&password)?;
        active.password_hash = Set(password::hash_password(&password)?);
    }

    if let Some(bio) = patch.bio {
        active.bio = Set(Some(bio));
    }
    if let Some(image) = patch.image {
        active.image = Set(Some(image));
    }

    if !active.is_changed() {
        return Ok(current);
    }

    match active.update(db).await {
        Ok(user) => Ok(user),
        Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict(
            "username or email is already taken".to_string(),
        )),
        Err(err) => Err(err.into()),
    }
}
