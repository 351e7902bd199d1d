//! 存档替换处理器 - 编排层
//!
//! 拉取未读条目，逐个交给 `ArchiveFlow`，只做调度和统计。

use tracing::{info, warn};

use crate::clients::{ArchiveService, CatalogApi};
use crate::config::Config;
use crate::services::EntryFetcher;
use crate::utils::logging::print_stats_block;
use crate::workflow::{ArchiveFlow, ArchiveOutcome};

/// 存档替换统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArchiveStats {
    /// 未读条目总数
    pub total: usize,
    /// 进入流程的付费墙条目
    pub candidates: usize,
    /// 已替换（原条目已删除）
    pub replaced: usize,
    /// 新旧条目都保留
    pub kept_both: usize,
    /// 演练模式下找到存档的条目
    pub dry_run: usize,
    /// 查找/提交存档失败
    pub archive_failed: usize,
    /// 添加或删除条目失败
    pub mutation_failed: usize,
}

impl ArchiveStats {
    fn record(&mut self, outcome: &ArchiveOutcome) {
        match outcome {
            ArchiveOutcome::NotCandidate => return,
            ArchiveOutcome::ArchiveFailed => self.archive_failed += 1,
            ArchiveOutcome::DryRun { .. } => self.dry_run += 1,
            ArchiveOutcome::ReAddFailed { .. } | ArchiveOutcome::DeleteFailed { .. } => {
                self.mutation_failed += 1
            }
            ArchiveOutcome::DeletedOriginal { .. } => self.replaced += 1,
            ArchiveOutcome::KeptBoth { .. } => self.kept_both += 1,
        }
        self.candidates += 1;
    }
}

/// 用存档副本替换付费墙条目
pub async fn archive_paywalled(
    catalog: &dyn CatalogApi,
    archiver: &dyn ArchiveService,
    config: &Config,
) -> ArchiveStats {
    info!("🔒 付费墙站点: {}", config.paywalled_hosts.join(", "));

    let entries = EntryFetcher::new(catalog, config.per_page)
        .fetch_all(ArchiveFlow::entry_filter())
        .await;

    let mut stats = ArchiveStats {
        total: entries.len(),
        ..Default::default()
    };
    if entries.is_empty() {
        warn!("⚠️ 没有未读条目");
        return stats;
    }

    let flow = ArchiveFlow::new(catalog, archiver, config);
    for entry in &entries {
        let outcome = flow.run(entry).await;
        stats.record(&outcome);
    }

    print_archive_stats(&stats);
    stats
}

fn print_archive_stats(stats: &ArchiveStats) {
    print_stats_block(
        "存档替换完成统计",
        &[
            ("未读条目总数", stats.total),
            ("🔒 付费墙条目", stats.candidates),
            ("✅ 已替换", stats.replaced),
            ("📎 新旧都保留", stats.kept_both),
            ("🧪 演练（未修改）", stats.dry_run),
            ("⚠️ 存档失败", stats.archive_failed),
            ("❌ 添加/删除失败", stats.mutation_failed),
        ],
    );
}
