//! # ユーザーハンドラ
//!
//! - `GET /api/users` - ユーザー一覧
//! - `GET /api/users/{username}` - ユーザー取得

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use gazette_domain::user::{User, Username};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, usecase::UserUseCaseImpl};

/// ユーザー API の共有状態
pub struct UserState {
    pub usecase: UserUseCaseImpl,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserDto {
    pub username:   String,
    pub name:       String,
    pub avatar_url: Option<String>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            username:   user.username().to_string(),
            name:       user.name().to_string(),
            avatar_url: user.avatar_url().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserDto,
}

/// GET /api/users
///
/// ユーザーが 1 件もなければ 404 `No users found`。
#[tracing::instrument(skip_all)]
pub async fn list_users(
    State(state): State<Arc<UserState>>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.usecase.list_users().await?;

    Ok(Json(UsersResponse {
        users: users.iter().map(UserDto::from).collect(),
    }))
}

/// GET /api/users/{username}
///
/// ## レスポンス
///
/// - `200 OK`: ユーザー
/// - `400 Bad Request`: 空の username、使用できない文字を含む
/// - `404 Not Found`: ユーザーが存在しない
#[tracing::instrument(skip_all, fields(%username))]
pub async fn get_user(
    State(state): State<Arc<UserState>>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let username = Username::parse(&username)?;

    let user = state.usecase.get_user(&username).await?;

    Ok(Json(UserResponse {
        user: UserDto::from(&user),
    }))
}
