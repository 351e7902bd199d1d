// 集成测试共用的内存实现
//
// FakeCatalog 保存一份"服务端"条目列表，按 per_page 分页返回，并记录每次调用。
// FakeArchiver 返回预设的快照地址。

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use wallabag_curator::config::Config;
use wallabag_curator::error::{ApiError, AppError, AppResult};
use wallabag_curator::models::{ClassificationTag, EntriesPage, Entry, EntryFilter, EntryTag};
use wallabag_curator::{ArchiveService, CatalogApi};

/// 记录下来的 API 调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchPage { page: u32, filter: EntryFilter },
    AddTags { entry_id: u64, tags: Vec<ClassificationTag> },
    RemoveTagById { entry_id: u64, tag_id: u64 },
    RemoveTagByLabel { entry_id: u64, tag: ClassificationTag },
    CreateEntry { url: String, tags: Vec<ClassificationTag> },
    DeleteEntry { entry_id: u64 },
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Call::FetchPage { .. })
    }
}

fn server_error(endpoint: &str) -> AppError {
    ApiError::BadResponse {
        endpoint: endpoint.to_string(),
        status: 500,
        body: "internal error".to_string(),
    }
    .into()
}

fn decode_error(endpoint: &str) -> AppError {
    let body = "<html>502 Bad Gateway</html>";
    let source = serde_json::from_str::<serde_json::Value>(body)
        .expect_err("html is not json");
    ApiError::JsonParseFailed {
        endpoint: endpoint.to_string(),
        body: body.to_string(),
        source,
    }
    .into()
}

#[derive(Default)]
pub struct FakeCatalog {
    pub entries: Arc<Mutex<Vec<Entry>>>,
    pub calls: Arc<Mutex<Vec<Call>>>,
    /// 第 N 页（从 1 开始）返回错误
    pub fail_page: Option<u32>,
    /// 对该条目的加标签请求返回错误
    pub fail_add_for: Option<u64>,
    /// 对该条目的加标签请求返回无法解析的响应体
    pub fail_decode_for: Option<u64>,
    /// 第 N 页的响应里没有 `_embedded.items`
    pub page_without_items: Option<u32>,
    pub fail_create: bool,
    pub fail_delete: bool,
    /// 新建条目被服务端抓取后的阅读时间
    pub created_reading_time: Option<i64>,
    /// 新建条目不出现在后续拉取结果里
    pub hide_created: bool,
}

impl FakeCatalog {
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls().iter().filter(|c| !c.is_mutation()).count()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn fetch_page(
        &self,
        page: u32,
        per_page: u32,
        filter: EntryFilter,
    ) -> AppResult<EntriesPage> {
        self.record(Call::FetchPage { page, filter });
        if self.fail_page == Some(page) {
            return Err(server_error("/api/entries.json"));
        }

        let entries = self.entries.lock().unwrap().clone();
        let per_page = per_page.max(1) as usize;
        let pages = entries.len().div_ceil(per_page).max(1) as u32;
        if self.page_without_items == Some(page) {
            return Ok(EntriesPage {
                page: Some(page),
                pages: Some(pages),
                embedded: None,
            });
        }
        let items = entries
            .into_iter()
            .skip((page as usize - 1) * per_page)
            .take(per_page)
            .collect();
        Ok(EntriesPage::new(page, pages, items))
    }

    async fn add_tags(&self, entry_id: u64, tags: &[ClassificationTag]) -> AppResult<()> {
        self.record(Call::AddTags {
            entry_id,
            tags: tags.to_vec(),
        });
        if self.fail_add_for == Some(entry_id) {
            return Err(server_error("/api/entries/tags.json"));
        }
        if self.fail_decode_for == Some(entry_id) {
            return Err(decode_error("/api/entries/tags.json"));
        }
        Ok(())
    }

    async fn remove_tag_by_id(&self, entry_id: u64, tag_id: u64) -> AppResult<()> {
        self.record(Call::RemoveTagById { entry_id, tag_id });
        Ok(())
    }

    async fn remove_tag_by_label(&self, entry_id: u64, tag: ClassificationTag) -> AppResult<()> {
        self.record(Call::RemoveTagByLabel { entry_id, tag });
        Ok(())
    }

    async fn create_entry(&self, url: &str, tags: &[ClassificationTag]) -> AppResult<()> {
        self.record(Call::CreateEntry {
            url: url.to_string(),
            tags: tags.to_vec(),
        });
        if self.fail_create {
            return Err(server_error("/api/entries.json"));
        }
        if !self.hide_created {
            let mut entries = self.entries.lock().unwrap();
            let next_id = entries.iter().filter_map(|e| e.id).max().unwrap_or(0) + 1;
            entries.push(Entry {
                id: Some(next_id),
                url: Some(url.to_string()),
                reading_time: self.created_reading_time,
                tags: tags
                    .iter()
                    .map(|t| EntryTag {
                        id: None,
                        label: t.as_label().to_string(),
                        slug: None,
                    })
                    .collect(),
                ..Default::default()
            });
        }
        Ok(())
    }

    async fn delete_entry(&self, entry_id: u64) -> AppResult<()> {
        self.record(Call::DeleteEntry { entry_id });
        if self.fail_delete {
            return Err(server_error("/api/entries/{id}.json"));
        }
        self.entries.lock().unwrap().retain(|e| e.id != Some(entry_id));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeArchiver {
    /// 已有快照
    pub existing: Option<String>,
    /// 查询已有快照时出错
    pub lookup_fails: bool,
    /// 提交后返回的快照地址
    pub submitted: Option<String>,
    pub submit_fails: bool,
    pub lookups: Arc<Mutex<Vec<String>>>,
    pub submissions: Arc<Mutex<Vec<String>>>,
}

impl FakeArchiver {
    pub fn submitting(snapshot: &str) -> Self {
        Self {
            submitted: Some(snapshot.to_string()),
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<String> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArchiveService for FakeArchiver {
    async fn find_existing(&self, url: &str) -> AppResult<Option<String>> {
        self.lookups.lock().unwrap().push(url.to_string());
        if self.lookup_fails {
            return Err(server_error("/newest/"));
        }
        Ok(self.existing.clone())
    }

    async fn submit(&self, url: &str) -> AppResult<Option<String>> {
        self.submissions.lock().unwrap().push(url.to_string());
        if self.submit_fails {
            return Err(server_error("/submit/"));
        }
        Ok(self.submitted.clone())
    }
}

/// 测试用配置：凭据齐全，每页 2 条
pub fn test_config() -> Config {
    Config {
        client_id: Some("id".into()),
        client_secret: Some("secret".into()),
        username: Some("user".into()),
        password: Some("pass".into()),
        per_page: 2,
        ..Config::default()
    }
}

pub fn entry(id: u64) -> Entry {
    Entry {
        id: Some(id),
        title: Some(format!("Article {}", id)),
        url: Some(format!("https://example.org/{}", id)),
        ..Default::default()
    }
}

pub fn tag(id: u64, tag: ClassificationTag) -> EntryTag {
    EntryTag {
        id: Some(id),
        label: tag.as_label().to_string(),
        slug: Some(tag.as_label().to_string()),
    }
}
