//! 存档替换流程 - 流程层
//!
//! 核心职责：定义"一个付费墙条目"的完整处理流程
//!
//! 流程顺序：
//! 1. 判断是否为候选（付费墙站点 + 阅读时间不超过阈值）
//! 2. 查找已有快照 → 没有则提交新存档
//! 3. 以 `archived` 标签重新添加快照地址
//! 4. 重新拉取条目，确认新条目阅读时间超过阈值后才删除原条目

use tracing::{error, info, warn};
use url::Url;

use crate::clients::{ArchiveService, CatalogApi};
use crate::config::Config;
use crate::models::{ClassificationTag, Entry, EntryFilter};
use crate::services::EntryFetcher;
use crate::workflow::entry_ctx::EntryCtx;

/// 保留原条目的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepReason {
    /// 重新拉取后找不到新条目
    SubstituteNotFound,
    /// 新条目阅读时间仍然不足（可能同样被付费墙挡住）
    SubstituteTooShort { reading_time: Option<i64> },
}

/// 单个条目的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// 不是候选条目
    NotCandidate,
    /// 既没有已有快照，提交也失败
    ArchiveFailed,
    /// 演练模式，只计算了快照地址
    DryRun { archive_url: String },
    /// 新条目添加失败，原条目保留
    ReAddFailed { archive_url: String },
    /// 已替换：新条目可读，原条目已删除
    DeletedOriginal { archive_url: String },
    /// 新条目已添加，但删除原条目失败
    DeleteFailed { archive_url: String },
    /// 新条目已添加，原条目保留
    KeptBoth {
        archive_url: String,
        reason: KeepReason,
    },
}

/// 存档替换流程
///
/// - 编排单个条目的完整替换流程
/// - 不持有任何资源，只依赖 `CatalogApi` / `ArchiveService`
/// - 任何一步失败都不会删除原条目
pub struct ArchiveFlow<'a> {
    catalog: &'a dyn CatalogApi,
    archiver: &'a dyn ArchiveService,
    paywalled_hosts: Vec<String>,
    reading_time_threshold: i64,
    per_page: u32,
    dry_run: bool,
}

impl<'a> ArchiveFlow<'a> {
    /// 创建新的存档替换流程
    pub fn new(
        catalog: &'a dyn CatalogApi,
        archiver: &'a dyn ArchiveService,
        config: &Config,
    ) -> Self {
        Self {
            catalog,
            archiver,
            paywalled_hosts: config.paywalled_hosts.clone(),
            reading_time_threshold: config.reading_time_threshold,
            per_page: config.per_page,
            dry_run: config.dry_run,
        }
    }

    /// 拉取待处理条目时使用的过滤条件（只看未读）
    pub fn entry_filter() -> EntryFilter {
        EntryFilter::unread()
    }

    /// 是否为候选条目
    ///
    /// 阅读时间为 null 或大于阈值的条目不是候选：只有抓取到的正文很短
    /// （很可能被付费墙挡住）时才需要替换。
    pub fn is_candidate(&self, entry: &Entry) -> bool {
        let Some(url) = entry.source_url() else {
            return false;
        };
        if entry.id.is_none() || !is_paywalled(url, &self.paywalled_hosts) {
            return false;
        }
        matches!(entry.reading_time, Some(rt) if rt <= self.reading_time_threshold)
    }

    pub async fn run(&self, entry: &Entry) -> ArchiveOutcome {
        if !self.is_candidate(entry) {
            return ArchiveOutcome::NotCandidate;
        }
        // is_candidate 已保证 id 和 url 存在
        let (Some(ctx), Some(url)) = (EntryCtx::from_entry(entry), entry.source_url()) else {
            return ArchiveOutcome::NotCandidate;
        };

        info!("{} 🔍 付费墙条目，查找存档: {}", ctx, url);

        // ========== 查找或提交存档 ==========
        let Some(archive_url) = self.locate_archive(&ctx, url).await else {
            warn!("{} ⚠️ 存档失败，跳过: {}", ctx, url);
            return ArchiveOutcome::ArchiveFailed;
        };
        info!("{} ✓ 存档地址: {}", ctx, archive_url);

        if self.dry_run {
            info!(
                "{} DRY RUN: 将添加 {} 并视情况删除原条目",
                ctx, archive_url
            );
            return ArchiveOutcome::DryRun { archive_url };
        }

        // ========== 重新添加 ==========
        if let Err(e) = self
            .catalog
            .create_entry(&archive_url, &[ClassificationTag::Archived])
            .await
        {
            error!("{} ❌ 添加存档条目失败，保留原条目: {}", ctx, e);
            return ArchiveOutcome::ReAddFailed { archive_url };
        }
        info!("{} ✓ 已添加存档条目 {}", ctx, archive_url);

        // ========== 验证后删除 ==========
        let refreshed = EntryFetcher::new(self.catalog, self.per_page)
            .fetch_all(Self::entry_filter())
            .await;
        let substitute = refreshed.iter().find(|e| e.matches_url(&archive_url));

        let reading_time = match substitute {
            None => {
                warn!("{} ⚠️ 重新拉取后找不到存档条目，保留原条目", ctx);
                return ArchiveOutcome::KeptBoth {
                    archive_url,
                    reason: KeepReason::SubstituteNotFound,
                };
            }
            Some(sub) => sub.reading_time,
        };

        if !matches!(reading_time, Some(rt) if rt > self.reading_time_threshold) {
            warn!(
                "{} ⚠️ 存档条目阅读时间 {:?} 未超过阈值 {}，保留原条目",
                ctx, reading_time, self.reading_time_threshold
            );
            return ArchiveOutcome::KeptBoth {
                archive_url,
                reason: KeepReason::SubstituteTooShort { reading_time },
            };
        }

        match self.catalog.delete_entry(ctx.entry_id).await {
            Ok(()) => {
                info!("{} 🗑️ 已删除原条目", ctx);
                ArchiveOutcome::DeletedOriginal { archive_url }
            }
            Err(e) => {
                error!("{} ❌ 删除原条目失败: {}", ctx, e);
                ArchiveOutcome::DeleteFailed { archive_url }
            }
        }
    }

    /// 先查已有快照，没有再提交；查询出错按"没有快照"处理
    async fn locate_archive(&self, ctx: &EntryCtx, url: &str) -> Option<String> {
        match self.archiver.find_existing(url).await {
            Ok(Some(existing)) => return Some(existing),
            Ok(None) => info!("{} 没有已有快照，提交新存档", ctx),
            Err(e) => warn!("{} ⚠️ 查询已有快照失败，改为提交新存档: {}", ctx, e),
        }

        match self.archiver.submit(url).await {
            Ok(submitted) => submitted,
            Err(e) => {
                error!("{} ❌ 提交存档失败: {}", ctx, e);
                None
            }
        }
    }
}

/// 主机名是否属于付费墙站点
///
/// `wsj.com` 匹配 `wsj.com` 与 `www.wsj.com`，不匹配 `notwsj.com`。
pub fn is_paywalled(url: &str, hosts: &[String]) -> bool {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
    else {
        return false;
    };

    hosts.iter().any(|h| {
        let h = h.trim().trim_start_matches('.').to_ascii_lowercase();
        !h.is_empty() && (host == h || host.ends_with(&format!(".{}", h)))
    })
}
