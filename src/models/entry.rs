use serde::{Deserialize, Deserializer};

use super::tag::ClassificationTag;

/// Wallabag 中的一篇文章
///
/// 除 `tags` 外所有字段都可能缺失或为 null，缺失的字段不会触发对应的检查。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Entry {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub origin_url: Option<String>,
    pub pages: Option<i64>,
    /// 字节数
    pub size: Option<i64>,
    /// 分钟
    pub reading_time: Option<i64>,
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<EntryTag>,
}

/// 条目上已有的标签
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntryTag {
    /// 服务端分配的标签 ID，按 ID 删除标签时必需
    pub id: Option<u64>,
    pub label: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl Entry {
    /// 用于日志的标题，缺失时回退为 `ID: {id}`
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ => format!(
                "ID: {}",
                self.id.map(|id| id.to_string()).unwrap_or_else(|| "?".into())
            ),
        }
    }

    /// 文章地址，优先 `url`，其次 `origin_url`
    pub fn source_url(&self) -> Option<&str> {
        [self.url.as_deref(), self.origin_url.as_deref()]
            .into_iter()
            .flatten()
            .find(|u| !u.trim().is_empty())
    }

    /// `url` 或 `origin_url` 与给定地址完全一致
    pub fn matches_url(&self, url: &str) -> bool {
        self.url.as_deref() == Some(url) || self.origin_url.as_deref() == Some(url)
    }

    pub fn has_tag(&self, tag: ClassificationTag) -> bool {
        self.find_tag(tag).is_some()
    }

    /// 查找某个受管标签在该条目上的记录
    pub fn find_tag(&self, tag: ClassificationTag) -> Option<&EntryTag> {
        self.tags
            .iter()
            .find(|t| ClassificationTag::from_label(&t.label) == Some(tag))
    }
}

/// 服务端可能返回 `"tags": null`
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<EntryTag>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<EntryTag>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `GET /api/entries.json` 的分页响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntriesPage {
    pub page: Option<u32>,
    pub pages: Option<u32>,
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedEntries>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddedEntries {
    pub items: Option<Vec<Entry>>,
}

impl EntriesPage {
    /// 构造一页数据（测试和假实现使用）
    pub fn new(page: u32, pages: u32, items: Vec<Entry>) -> Self {
        Self {
            page: Some(page),
            pages: Some(pages),
            embedded: Some(EmbeddedEntries { items: Some(items) }),
        }
    }

    /// 条目容器；缺少 `_embedded.items` 时返回 `None`
    pub fn into_items(self) -> Option<Vec<Entry>> {
        self.embedded.and_then(|e| e.items)
    }

    /// 服务端分页信息表明还有下一页
    pub fn has_next_page(&self) -> bool {
        match (self.page, self.pages) {
            (Some(current), Some(total)) => current < total,
            _ => false,
        }
    }
}

/// 服务端过滤条件，原样透传
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// `Some(false)` 只取未读，`Some(true)` 只取已归档
    pub archive: Option<bool>,
}

impl EntryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn unread() -> Self {
        Self {
            archive: Some(false),
        }
    }

    /// 转换为查询参数
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(archive) = self.archive {
            pairs.push(("archive", if archive { "1" } else { "0" }.to_string()));
        }
        pairs
    }
}
