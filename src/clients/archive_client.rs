/// 存档服务客户端
///
/// 第三方服务且无需认证，因此所有请求都带 15 秒超时，并且不自动跟随重定向：
/// 快照地址就在重定向的 `Location` 里。
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::clients::traits::ArchiveService;
use crate::error::{ApiError, AppError, AppResult};

/// 存档服务请求超时
pub const ARCHIVE_TIMEOUT: Duration = Duration::from_secs(15);

/// 存档服务客户端
pub struct ArchiveClient {
    http: reqwest::Client,
    base: Url,
}

impl ArchiveClient {
    /// 创建客户端
    ///
    /// # 参数
    /// - `base_url`: 存档服务地址，例如 `https://archive.is`
    pub fn new(base_url: &str) -> AppResult<Self> {
        let base = Url::parse(base_url).map_err(|_| ApiError::InvalidUrl {
            url: base_url.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(ARCHIVE_TIMEOUT)
            .build()
            .map_err(|e| AppError::api_request_failed(base_url, e))?;

        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// 从重定向响应中取出 `Location`
    fn redirect_location(resp: &reqwest::Response) -> Option<String> {
        if !resp.status().is_redirection() {
            return None;
        }
        resp.headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// 把 `Location` 解析为绝对地址
///
/// 相对地址以存档服务地址为基准。`reject_newest` 为真时，
/// 指回 `/newest/` 的重定向不算快照。
pub fn resolve_location(base: &Url, location: &str, reject_newest: bool) -> Option<String> {
    let resolved = base.join(location.trim()).ok()?;
    if reject_newest && resolved.path().starts_with("/newest/") {
        return None;
    }
    Some(resolved.to_string())
}

#[async_trait]
impl ArchiveService for ArchiveClient {
    async fn find_existing(&self, url: &str) -> AppResult<Option<String>> {
        let endpoint = self.endpoint(&format!("/newest/{}", url));
        debug!("查询已有快照: {}", endpoint);

        let resp = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        debug!("快照查询返回 HTTP {}", resp.status());
        Ok(Self::redirect_location(&resp).and_then(|loc| resolve_location(&self.base, &loc, true)))
    }

    async fn submit(&self, url: &str) -> AppResult<Option<String>> {
        let endpoint = self.endpoint("/submit/");
        debug!("提交存档请求: {}", url);

        let resp = self
            .http
            .post(&endpoint)
            .form(&[("url", url)])
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = resp.status();
        match Self::redirect_location(&resp) {
            Some(loc) => Ok(resolve_location(&self.base, &loc, false)),
            None => {
                debug!("存档提交未返回重定向: HTTP {}", status);
                Ok(None)
            }
        }
    }
}
