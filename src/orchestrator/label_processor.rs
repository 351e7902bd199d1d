//! 标签处理器 - 编排层
//!
//! ## 职责
//!
//! 遍历全部条目，对每个条目执行"分类 → 标签同步"，汇总统计。
//!
//! ## 核心功能
//!
//! 1. **拉取条目**：委托 `EntryFetcher` 拉取全部条目（不过滤）
//! 2. **分类**：`classify` 只算差异，不发请求
//! 3. **同步**：`TagReconciler` 负责落地（或在演练模式下只计数）
//! 4. **统计输出**：处理数、跳过数、修改数、失败数

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::clients::CatalogApi;
use crate::config::Config;
use crate::models::{Entry, EntryFilter};
use crate::services::{classify, AgeOutcome, EntryFetcher, RuleSet, TagReconciler};
use crate::utils::logging::{log_progress, print_stats_block};
use crate::workflow::EntryCtx;

/// 标签处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelStats {
    /// 条目总数
    pub total: usize,
    /// 因缺少 ID 跳过的条目
    pub skipped_no_id: usize,
    /// 被标记为 broken 的条目
    pub broken: usize,
    /// 时间无法解析、跳过年龄检查的条目
    pub unparsable_dates: usize,
    /// 成功（或演练计划）的标签修改数
    pub mutations: usize,
    /// 失败的标签修改数
    pub failures: usize,
}

/// 拉取全部条目并打标签
pub async fn label_catalog(
    catalog: &dyn CatalogApi,
    config: &Config,
    rules: RuleSet,
    now: DateTime<Utc>,
) -> LabelStats {
    let entries = EntryFetcher::new(catalog, config.per_page)
        .fetch_all(EntryFilter::all())
        .await;

    if entries.is_empty() {
        warn!("⚠️ 没有可处理的条目");
        return LabelStats::default();
    }

    label_entries(catalog, &entries, config, rules, now).await
}

/// 对给定条目逐个分类并同步标签
///
/// # 参数
/// - `catalog`: Wallabag API
/// - `entries`: 待处理条目
/// - `config`: 配置（使用 `dry_run` 与 `tag_removal`）
/// - `rules`: 启用的检查
/// - `now`: 当前时间
pub async fn label_entries(
    catalog: &dyn CatalogApi,
    entries: &[Entry],
    config: &Config,
    rules: RuleSet,
    now: DateTime<Utc>,
) -> LabelStats {
    let reconciler = TagReconciler::new(catalog, config.tag_removal, config.dry_run);
    let mut stats = LabelStats {
        total: entries.len(),
        ..Default::default()
    };

    info!("🏷️ 开始处理 {} 个条目", entries.len());

    for (index, entry) in entries.iter().enumerate() {
        log_progress(index, entries.len());

        let Some(ctx) = EntryCtx::from_entry(entry) else {
            warn!("⚠️ 条目缺少 ID，跳过: {}", entry.display_title());
            stats.skipped_no_id += 1;
            continue;
        };

        let result = classify(entry, now, rules);

        if !result.broken_reasons.is_empty() {
            let reasons: Vec<String> = result.broken_reasons.iter().map(|r| r.to_string()).collect();
            info!("{} 判定为 broken ({})", ctx, reasons.join(", "));
            stats.broken += 1;
        }

        match &result.age {
            AgeOutcome::Unparsable(raw) => {
                warn!("{} ⚠️ 无法解析创建时间 '{}'，跳过年龄检查", ctx, raw);
                stats.unparsable_dates += 1;
            }
            AgeOutcome::MissingTimestamp => debug!("{} 没有创建时间，跳过年龄检查", ctx),
            AgeOutcome::Classified(class) => debug!("{} 年龄分档: {:?}", ctx, class),
            AgeOutcome::AlreadyVeryOld | AgeOutcome::NotEvaluated => {}
        }

        if result.decision.is_empty() {
            continue;
        }

        let outcome = reconciler.apply(&ctx, entry, &result.decision).await;
        stats.mutations += outcome.applied;
        stats.failures += outcome.failed;
    }

    print_label_stats(&stats, config.dry_run);
    stats
}

// ========== 日志辅助函数 ==========

fn print_label_stats(stats: &LabelStats, dry_run: bool) {
    let mutation_label = if dry_run {
        "🧪 计划修改的标签数"
    } else {
        "✅ 成功修改的标签数"
    };
    print_stats_block(
        "标签处理完成统计",
        &[
            ("条目总数", stats.total),
            ("⏭️ 缺少 ID 跳过", stats.skipped_no_id),
            ("🔧 判定为 broken", stats.broken),
            ("⚠️ 创建时间无法解析", stats.unparsable_dates),
            (mutation_label, stats.mutations),
            ("❌ 失败的修改", stats.failures),
        ],
    );
}
