/// Wallabag API 客户端
///
/// 封装所有与 Wallabag 条目接口相关的 HTTP 调用
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::clients::auth::Session;
use crate::clients::traits::CatalogApi;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{ClassificationTag, EntriesPage, Entry, EntryFilter};

/// Wallabag 客户端
pub struct CatalogClient {
    http: reqwest::Client,
    session: Session,
}

impl CatalogClient {
    /// 创建新的 Wallabag 客户端
    pub fn new(http: reqwest::Client, session: Session) -> Self {
        Self { http, session }
    }

    /// 发送带令牌的请求，非 2xx 视为错误，返回响应体文本
    async fn send(&self, request: RequestBuilder, endpoint: &str) -> AppResult<String> {
        let resp = request
            .bearer_auth(self.session.access_token())
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        if !status.is_success() {
            return Err(AppError::api_bad_response(endpoint, status.as_u16(), &body));
        }

        Ok(body)
    }

    /// `/api/entries/{id}/tags/{segment}`，`segment` 会做路径编码
    fn entry_tag_url(&self, entry_id: u64, segment: &str) -> AppResult<Url> {
        let base = self.session.endpoint(&format!("/api/entries/{}/tags", entry_id));
        let invalid = || AppError::from(ApiError::InvalidUrl { url: base.clone() });

        let mut url = Url::parse(&base).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.push(segment);
        Ok(url)
    }
}

fn join_labels(tags: &[ClassificationTag]) -> String {
    tags.iter()
        .map(|t| t.as_label())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn fetch_page(
        &self,
        page: u32,
        per_page: u32,
        filter: EntryFilter,
    ) -> AppResult<EntriesPage> {
        let endpoint = self.session.endpoint("/api/entries.json");
        debug!("请求第 {} 页条目: {}", page, endpoint);

        let request = self
            .http
            .get(&endpoint)
            .query(&[("page", page.to_string()), ("perPage", per_page.to_string())])
            .query(&filter.query_pairs());

        let body = self.send(request, &endpoint).await?;
        serde_json::from_str(&body).map_err(|e| AppError::api_decode_failed(&endpoint, &body, e))
    }

    async fn add_tags(&self, entry_id: u64, tags: &[ClassificationTag]) -> AppResult<()> {
        let endpoint = self.session.endpoint(&format!("/api/entries/{}/tags", entry_id));
        let payload = json!({ "tags": join_labels(tags) });

        let body = self
            .send(self.http.post(&endpoint).json(&payload), &endpoint)
            .await?;

        // 服务端返回更新后的条目；无法解析说明响应异常，不算成功
        let _: Entry = serde_json::from_str(&body)
            .map_err(|e| AppError::api_decode_failed(&endpoint, &body, e))?;
        Ok(())
    }

    async fn remove_tag_by_id(&self, entry_id: u64, tag_id: u64) -> AppResult<()> {
        let url = self.entry_tag_url(entry_id, &tag_id.to_string())?;
        let endpoint = url.to_string();
        self.send(self.http.delete(url), &endpoint).await?;
        Ok(())
    }

    async fn remove_tag_by_label(&self, entry_id: u64, tag: ClassificationTag) -> AppResult<()> {
        let url = self.entry_tag_url(entry_id, tag.as_label())?;
        let endpoint = url.to_string();
        self.send(self.http.put(url), &endpoint).await?;
        Ok(())
    }

    async fn create_entry(&self, url: &str, tags: &[ClassificationTag]) -> AppResult<()> {
        let endpoint = self.session.endpoint("/api/entries.json");
        let mut payload = json!({ "url": url });
        if !tags.is_empty() {
            payload["tags"] = json!(join_labels(tags));
        }

        self.send(self.http.post(&endpoint).json(&payload), &endpoint)
            .await?;
        Ok(())
    }

    async fn delete_entry(&self, entry_id: u64) -> AppResult<()> {
        let endpoint = self.session.endpoint(&format!("/api/entries/{}.json", entry_id));
        self.send(self.http.delete(&endpoint), &endpoint).await?;
        Ok(())
    }
}
