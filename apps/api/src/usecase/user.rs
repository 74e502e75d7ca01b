//! ユーザーのユースケース

use std::sync::Arc;

use gazette_domain::{
    DomainError,
    user::{User, Username},
};
use gazette_infra::repository::UserRepository;

use crate::error::{ApiError, NO_USERS_FOUND};

pub struct UserUseCaseImpl {
    user_repository: Arc<dyn UserRepository>,
}

impl UserUseCaseImpl {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// 全ユーザーを取得する。1 件もなければ 404
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let users = self.user_repository.find_all().await?;
        if users.is_empty() {
            return Err(ApiError::NotFound(NO_USERS_FOUND.to_string()));
        }
        Ok(users)
    }

    /// username でユーザーを取得する
    pub async fn get_user(&self, username: &Username) -> Result<User, ApiError> {
        self.user_repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound {
                    entity_type: "User",
                    id:          username.to_string(),
                }
                .into()
            })
    }
}
