//! Account endpoints: email registration/login and WeChat login
//!
//! There are no sessions; the client keeps the returned user record.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use colony_common::db::{laboratories, users, LabRole, Role, User};
use colony_common::password::verify_password;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::non_empty;
use crate::{ApiError, ApiResult, AppState};

pub const WECHAT_SESSION_URL: &str = "https://api.weixin.qq.com/sns/jscode2session";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WechatLoginRequest {
    pub openid: Option<String>,
    pub code: Option<String>,
}

/// User record returned by both login flows
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laboratory_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laboratory_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
struct WechatSession {
    openid: Option<String>,
    errcode: Option<i64>,
    errmsg: Option<String>,
}

/// POST /api/auth/register
///
/// Creates the account plus a personal laboratory the user administers.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let (Some(email), Some(password), Some(name)) = (
        non_empty(req.email),
        req.password.filter(|p| !p.is_empty()),
        non_empty(req.name),
    ) else {
        return Err(ApiError::BadRequest("缺少必要字段：邮箱、密码或姓名".to_string()));
    };

    if users::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict("用户已存在".to_string()));
    }

    let user = users::create_password_user(&state.db, &email, &password, &name, Role::User).await?;

    let lab_name = format!("{}的实验室", name);
    let lab_description = format!("{}创建的个人实验室", name);
    let lab = laboratories::create_laboratory(&state.db, &lab_name, Some(&lab_description)).await?;
    laboratories::add_member(&state.db, user.id, lab.id, LabRole::Admin).await?;

    info!("Registered user {} with laboratory {}", email, lab.name);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "用户注册成功".to_string(),
            user,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> ApiResult<Json<LoginResponse>> {
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let Some(credentials) = users::find_by_email(&state.db, &email).await? else {
        return Err(ApiError::Unauthorized("用户不存在".to_string()));
    };

    let valid = match (&credentials.password_hash, &credentials.password_salt) {
        (Some(hash), Some(salt)) => verify_password(&password, salt, hash),
        _ => false,
    };
    if !valid {
        return Err(ApiError::Unauthorized("密码错误".to_string()));
    }

    Ok(Json(LoginResponse {
        user: session_user(&state, credentials.user).await?,
    }))
}

/// POST /api/auth/wechat-login
///
/// Accepts an `openid` directly, or a login `code` that is exchanged for
/// one when app credentials are configured.
pub async fn wechat_login(
    State(state): State<AppState>,
    Json(req): Json<WechatLoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let mut openid = non_empty(req.openid);

    if openid.is_none() {
        if let Some(code) = non_empty(req.code) {
            openid = exchange_code(&state, &code).await?;
        }
    }

    let Some(openid) = openid else {
        return Err(ApiError::BadRequest("OpenID is required".to_string()));
    };

    let user = users::find_or_create_by_openid(&state.db, &openid).await?;

    Ok(Json(LoginResponse {
        user: session_user(&state, user).await?,
    }))
}

async fn exchange_code(state: &AppState, code: &str) -> ApiResult<Option<String>> {
    let (Some(app_id), Some(secret)) = (&state.wechat.app_id, &state.wechat.app_secret) else {
        warn!("WeChat login code received but app credentials are not configured");
        return Ok(None);
    };
    if !state.wechat.is_configured() {
        warn!("WeChat login code received but app credentials are empty");
        return Ok(None);
    }

    let session: WechatSession = state
        .http
        .get(WECHAT_SESSION_URL)
        .query(&[
            ("appid", app_id.as_str()),
            ("secret", secret.as_str()),
            ("js_code", code),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?
        .json()
        .await?;

    if session.openid.is_none() {
        warn!(
            "jscode2session returned no openid (errcode {:?}: {})",
            session.errcode,
            session.errmsg.as_deref().unwrap_or("")
        );
    }

    Ok(session.openid)
}

async fn session_user(state: &AppState, user: User) -> ApiResult<SessionUser> {
    let lab = laboratories::primary_laboratory(&state.db, user.id).await?;

    Ok(SessionUser {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        laboratory_id: lab.as_ref().map(|l| l.id),
        laboratory_name: lab.map(|l| l.name),
    })
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/wechat-login", post(wechat_login))
}
