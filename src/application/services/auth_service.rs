use crate::application::ports::auth::{AuthGateway, AvatarProvider};
use crate::application::ports::repositories::UserRepository;
use crate::domain::entities::{Session, SigninForm, SignupForm, User};
use crate::shared::Result;
use std::sync::Arc;
use tracing::warn;

pub struct AuthService {
    auth: Arc<dyn AuthGateway>,
    users: Arc<dyn UserRepository>,
    avatars: Arc<dyn AvatarProvider>,
}

impl AuthService {
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        users: Arc<dyn UserRepository>,
        avatars: Arc<dyn AvatarProvider>,
    ) -> Self {
        Self {
            auth,
            users,
            avatars,
        }
    }

    /// プリンシパル作成 → User ドキュメント作成の2段階。
    /// 2段目が失敗してもプリンシパルは残る（補償なしの既知の不整合窓）。
    pub async fn create_account(&self, form: &SignupForm) -> Result<User> {
        form.validate()?;

        let account = self
            .auth
            .create_account(&form.email, &form.password, &form.name)
            .await?;

        let avatar_url = self.avatars.initials_url(&account.name);
        let user = User::new(
            account.id.clone(),
            account.name.clone(),
            form.username.clone(),
            account.email.clone(),
            avatar_url,
        );

        match self.users.create_user(&user).await {
            Ok(created) => Ok(created),
            Err(err) => {
                warn!(
                    account_id = %account.id,
                    "user document creation failed, auth principal left behind: {err}"
                );
                Err(err)
            }
        }
    }

    pub async fn sign_in(&self, form: &SigninForm) -> Result<Session> {
        form.validate()?;
        self.auth
            .create_email_session(&form.email, &form.password)
            .await
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.auth.delete_current_session().await
    }

    /// 現在のプリンシパルに対応する User ドキュメント。未認証なら None。
    pub async fn current_user(&self) -> Result<Option<User>> {
        let Some(account) = self.auth.current_account().await? else {
            return Ok(None);
        };
        self.users.get_user_by_account(&account.id).await
    }
}
