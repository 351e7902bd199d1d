//! 条目拉取服务 - 业务能力层
//!
//! 逐页拉取全部条目，完全依赖服务端的分页信息决定何时停止。

use tracing::{debug, error, info, warn};

use crate::clients::CatalogApi;
use crate::models::{Entry, EntryFilter};

/// 分页拉取器
///
/// 一次只发一个请求，不重试；出错时返回已拉取到的部分。
pub struct EntryFetcher<'a> {
    api: &'a dyn CatalogApi,
    per_page: u32,
}

impl<'a> EntryFetcher<'a> {
    pub fn new(api: &'a dyn CatalogApi, per_page: u32) -> Self {
        Self {
            api,
            per_page: per_page.max(1),
        }
    }

    /// 拉取全部条目
    ///
    /// 以下情况停止：
    /// - 本页为空
    /// - 服务端报告 `page >= pages`（或缺少分页信息）
    /// - 响应里没有 `_embedded.items`
    /// - 请求或解析失败（返回已拉取部分）
    pub async fn fetch_all(&self, filter: EntryFilter) -> Vec<Entry> {
        let mut entries = Vec::new();
        let mut page = 1u32;

        info!("📥 开始拉取条目...");
        loop {
            debug!("拉取第 {} 页...", page);
            let resp = match self.api.fetch_page(page, self.per_page, filter).await {
                Ok(resp) => resp,
                Err(e) => {
                    error!("❌ 拉取第 {} 页失败，停止拉取: {}", page, e);
                    break;
                }
            };

            let has_next = resp.has_next_page();
            let Some(items) = resp.into_items() else {
                warn!("⚠️ 第 {} 页响应中没有 _embedded.items，视为没有更多数据", page);
                break;
            };

            if items.is_empty() {
                if page == 1 {
                    info!("第一页没有任何条目");
                } else {
                    info!("第 {} 页为空，已到最后一页", page);
                }
                break;
            }

            entries.extend(items);
            info!(
                "✓ 第 {} 页拉取完成，累计 {} 个条目",
                page,
                entries.len()
            );

            if !has_next {
                debug!("分页信息表明已是最后一页");
                break;
            }
            page += 1;
        }

        info!("📥 拉取结束：共 {} 个条目，{} 次请求", entries.len(), page);
        entries
    }
}
