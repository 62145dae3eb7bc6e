use crate::domain::value_objects::{AccountId, SessionId};
use crate::shared::validation::{
    self, MIN_NAME_LEN, MIN_PASSWORD_LEN, MIN_USERNAME_LEN, ValidationFailureKind,
};
use crate::shared::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 認証サービス側のプリンシパル。User ドキュメントとは別物。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(email: String, name: String) -> Self {
        Self {
            id: AccountId::generate(),
            email,
            name,
            created_at: Utc::now(),
        }
    }
}

/// 認証済みセッション。永続化方式（クッキー等）は認証サービス側の責務。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub account_id: AccountId,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            id: SessionId::generate(),
            account_id,
            created_at: Utc::now(),
        }
    }
}

/// サインアップフォームの入力。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<()> {
        if self.name.chars().count() < MIN_NAME_LEN {
            return Err(AppError::validation(
                ValidationFailureKind::NameTooShort,
                "Too short name.",
            ));
        }
        if self.username.chars().count() < MIN_USERNAME_LEN {
            return Err(AppError::validation(
                ValidationFailureKind::UsernameTooShort,
                "Too short username.",
            ));
        }
        if !validation::is_well_formed_email(&self.email) {
            return Err(AppError::validation(
                ValidationFailureKind::EmailInvalid,
                "Invalid email address.",
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(
                ValidationFailureKind::PasswordTooShort,
                "Password must be 8 characters.",
            ));
        }
        Ok(())
    }
}

/// サインインフォームの入力。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninForm {
    pub email: String,
    pub password: String,
}

impl SigninForm {
    pub fn validate(&self) -> Result<()> {
        if !validation::is_well_formed_email(&self.email) {
            return Err(AppError::validation(
                ValidationFailureKind::EmailInvalid,
                "Invalid email address.",
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(
                ValidationFailureKind::PasswordTooShort,
                "Password must be 8 characters.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_signup() -> SignupForm {
        SignupForm {
            name: "Hana".into(),
            username: "hana".into(),
            email: "hana@example.com".into(),
            password: "password1".into(),
        }
    }

    #[test]
    fn valid_signup_passes() {
        assert!(valid_signup().validate().is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut form = valid_signup();
        form.password = "1234567".into();
        let err = form.validate().expect_err("must fail");
        assert!(matches!(
            err,
            AppError::Validation {
                kind: ValidationFailureKind::PasswordTooShort,
                ..
            }
        ));
    }

    #[test]
    fn single_char_name_is_rejected() {
        let mut form = valid_signup();
        form.name = "a".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn signin_rejects_malformed_email() {
        let form = SigninForm {
            email: "not-an-email".into(),
            password: "password1".into(),
        };
        let err = form.validate().expect_err("must fail");
        assert!(matches!(
            err,
            AppError::Validation {
                kind: ValidationFailureKind::EmailInvalid,
                ..
            }
        ));
    }
}
