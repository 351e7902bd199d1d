// 基础设施 trait
//
// 只描述远端服务"能做什么"，不含业务判断。
// 上层（services / workflow）只依赖这些 trait，测试时注入内存实现。

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{ClassificationTag, EntriesPage, EntryFilter};

/// Wallabag 条目 API
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// 拉取一页条目（`page` 从 1 开始）
    async fn fetch_page(
        &self,
        page: u32,
        per_page: u32,
        filter: EntryFilter,
    ) -> AppResult<EntriesPage>;

    /// 给条目追加标签
    async fn add_tags(&self, entry_id: u64, tags: &[ClassificationTag]) -> AppResult<()>;

    /// 按服务端标签 ID 删除标签
    async fn remove_tag_by_id(&self, entry_id: u64, tag_id: u64) -> AppResult<()>;

    /// 按标签名删除标签
    async fn remove_tag_by_label(&self, entry_id: u64, tag: ClassificationTag) -> AppResult<()>;

    /// 新建条目
    async fn create_entry(&self, url: &str, tags: &[ClassificationTag]) -> AppResult<()>;

    /// 删除条目
    async fn delete_entry(&self, entry_id: u64) -> AppResult<()>;
}

/// 网页存档服务
#[async_trait]
pub trait ArchiveService: Send + Sync {
    /// 查找已有的最新快照，没有则返回 `None`
    async fn find_existing(&self, url: &str) -> AppResult<Option<String>>;

    /// 提交新的存档请求，返回快照地址；服务未给出地址时返回 `None`
    async fn submit(&self, url: &str) -> AppResult<Option<String>>;
}
