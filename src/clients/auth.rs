//! OAuth 认证
//!
//! 每次运行只认证一次，得到的 [`Session`] 之后只读。

use serde::Deserialize;
use tracing::{error, info};

use crate::error::{AppError, AppResult, AuthError};

/// OAuth 密码模式所需的凭据
#[derive(Clone, Default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    fn missing_fields(&self) -> Vec<String> {
        [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k.to_string())
        .collect()
    }
}

/// 认证后的会话：实例地址 + 访问令牌
#[derive(Clone)]
pub struct Session {
    base_url: String,
    access_token: String,
}

impl Session {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// 不带结尾 `/` 的实例地址
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// 拼接 API 地址，`path` 以 `/` 开头
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// 获取 OAuth 令牌
///
/// 凭据不全时直接返回错误，不发起请求。
///
/// # 参数
/// - `http`: HTTP 客户端
/// - `base_url`: Wallabag 实例地址
/// - `credentials`: OAuth 凭据
///
/// # 返回
/// 返回可供后续所有请求使用的会话
pub async fn obtain_token(
    http: &reqwest::Client,
    base_url: &str,
    credentials: &Credentials,
) -> AppResult<Session> {
    let mut missing = credentials.missing_fields();
    if base_url.trim().is_empty() {
        missing.insert(0, "instance_url".to_string());
    }
    if !missing.is_empty() {
        error!("缺少认证凭据 ({})，无法认证", missing.join(", "));
        return Err(AuthError::MissingCredentials { fields: missing }.into());
    }

    let token_url = format!("{}/oauth/v2/token", base_url.trim_end_matches('/'));
    let form = [
        ("grant_type", "password"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
    ];

    let resp = http
        .post(&token_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| AppError::api_request_failed(&token_url, e))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| AppError::api_request_failed(&token_url, e))?;

    if !status.is_success() {
        error!("获取令牌失败: HTTP {}", status);
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            body: crate::utils::truncate_text(&body, 200),
        }
        .into());
    }

    let token: TokenResponse =
        serde_json::from_str(&body).map_err(|e| AppError::api_decode_failed(&token_url, &body, e))?;

    match token.access_token.filter(|t| !t.is_empty()) {
        Some(access_token) => {
            info!("✓ 成功获取 API 令牌");
            Ok(Session::new(base_url, access_token))
        }
        None => {
            error!("认证响应中没有 access_token");
            Err(AuthError::MissingToken.into())
        }
    }
}
