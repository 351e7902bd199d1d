use thiserror::Error;

use crate::utils::logging::truncate_text;

/// 原始响应体在错误信息里保留的最大字符数
const BODY_PREVIEW_LEN: usize = 200;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 调用远端 API 失败
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 认证失败
    #[error("认证错误: {0}")]
    Auth(#[from] AuthError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败（连接、超时等）
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务端返回非 2xx 状态码
    #[error("API返回错误响应 ({endpoint}): status={status}, body={body}")]
    BadResponse {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 响应体不是预期的 JSON
    #[error("JSON解析失败 ({endpoint}): {source}, body={body}")]
    JsonParseFailed {
        endpoint: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
    /// 构造请求地址失败
    #[error("无效的URL: {url}")]
    InvalidUrl { url: String },
}

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 缺少凭据，未发起任何请求
    #[error("缺少认证凭据: {}", fields.join(", "))]
    MissingCredentials { fields: Vec<String> },
    /// 认证服务拒绝了请求
    #[error("认证请求被拒绝: status={status}, body={body}")]
    Rejected { status: u16, body: String },
    /// 响应里没有 access_token
    #[error("认证响应中没有 access_token")]
    MissingToken,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必填配置项缺失
    #[error("缺少必填配置: {}", fields.join("; "))]
    MissingFields { fields: Vec<String> },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取或解析失败
    #[error("配置文件 {path} 无法加载: {message}")]
    FileLoadFailed { path: String, message: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建网络请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建非 2xx 响应错误，响应体会被截断
    pub fn api_bad_response(endpoint: impl Into<String>, status: u16, body: &str) -> Self {
        AppError::Api(ApiError::BadResponse {
            endpoint: endpoint.into(),
            status,
            body: truncate_text(body, BODY_PREVIEW_LEN),
        })
    }

    /// 创建 JSON 解析失败错误，响应体会被截断
    pub fn api_decode_failed(
        endpoint: impl Into<String>,
        body: &str,
        source: serde_json::Error,
    ) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            endpoint: endpoint.into(),
            body: truncate_text(body, BODY_PREVIEW_LEN),
            source,
        })
    }

    /// 是否为响应体解析失败
    pub fn is_decode_error(&self) -> bool {
        matches!(self, AppError::Api(ApiError::JsonParseFailed { .. }))
    }

    /// 是否为非 2xx 响应
    pub fn is_bad_response(&self) -> bool {
        matches!(self, AppError::Api(ApiError::BadResponse { .. }))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
