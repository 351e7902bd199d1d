//! 标签同步服务 - 业务能力层
//!
//! 把分类引擎给出的 [`TagDecision`] 落到服务端。每个标签一次请求，失败不重试，
//! 也不影响同一条目的其它标签。

use tracing::{error, info, warn};

use crate::clients::CatalogApi;
use crate::config::TagRemoval;
use crate::error::AppError;
use crate::models::{ClassificationTag, Entry};
use crate::services::classifier::TagDecision;
use crate::workflow::EntryCtx;

/// 单个条目的同步结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// 成功（或演练模式下计划）执行的修改数
    pub applied: usize,
    pub failed: usize,
}

/// 删除标签时请求的目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemovalTarget {
    Id(u64),
    Label(ClassificationTag),
}

/// 标签同步器
pub struct TagReconciler<'a> {
    api: &'a dyn CatalogApi,
    removal: TagRemoval,
    dry_run: bool,
}

impl<'a> TagReconciler<'a> {
    pub fn new(api: &'a dyn CatalogApi, removal: TagRemoval, dry_run: bool) -> Self {
        Self {
            api,
            removal,
            dry_run,
        }
    }

    /// 同步单个条目的标签
    ///
    /// 演练模式下不发任何修改请求，但计数与真实执行一致：
    /// 无法发起的删除（按 ID 删除但标签没有 ID）两种模式下都记为失败。
    /// 年龄升级时，`very-old` 添加失败则保留 `old`。
    pub async fn apply(
        &self,
        ctx: &EntryCtx,
        entry: &Entry,
        decision: &TagDecision,
    ) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();
        let mut failed_applies = Vec::new();

        for &tag in &decision.apply {
            if self.dry_run {
                info!("{} DRY RUN: 将添加标签 '{}'", ctx, tag);
                outcome.applied += 1;
                continue;
            }
            match self.api.add_tags(ctx.entry_id, &[tag]).await {
                Ok(()) => {
                    info!("{} ✓ 已添加标签 '{}'", ctx, tag);
                    outcome.applied += 1;
                }
                Err(e) => {
                    log_mutation_error(ctx, "添加", tag, &e);
                    failed_applies.push(tag);
                    outcome.failed += 1;
                }
            }
        }

        for &tag in &decision.remove {
            if tag == ClassificationTag::Old && failed_applies.contains(&ClassificationTag::VeryOld) {
                warn!("{} ⚠️ 'very-old' 未添加成功，保留标签 '{}'", ctx, tag);
                continue;
            }

            let Some(target) = removal_target(self.removal, entry, tag) else {
                warn!("{} ⚠️ 标签 '{}' 没有服务端 ID，无法按 ID 删除", ctx, tag);
                outcome.failed += 1;
                continue;
            };

            if self.dry_run {
                info!("{} DRY RUN: 将移除标签 '{}'", ctx, tag);
                outcome.applied += 1;
                continue;
            }

            let result = match target {
                RemovalTarget::Id(tag_id) => self.api.remove_tag_by_id(ctx.entry_id, tag_id).await,
                RemovalTarget::Label(tag) => self.api.remove_tag_by_label(ctx.entry_id, tag).await,
            };
            match result {
                Ok(()) => {
                    info!("{} ✓ 已移除标签 '{}'", ctx, tag);
                    outcome.applied += 1;
                }
                Err(e) => {
                    log_mutation_error(ctx, "移除", tag, &e);
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }
}

/// 按删除方式确定请求目标；按 ID 删除但标签没有 ID 时返回 `None`
fn removal_target(removal: TagRemoval, entry: &Entry, tag: ClassificationTag) -> Option<RemovalTarget> {
    match removal {
        TagRemoval::ById => entry
            .find_tag(tag)
            .and_then(|t| t.id)
            .map(RemovalTarget::Id),
        TagRemoval::ByLabel => Some(RemovalTarget::Label(tag)),
    }
}

fn log_mutation_error(ctx: &EntryCtx, action: &str, tag: ClassificationTag, err: &AppError) {
    if err.is_decode_error() {
        error!("{} ❌ {}标签 '{}' 后无法解析响应: {}", ctx, action, tag, err);
    } else if err.is_bad_response() {
        error!("{} ❌ {}标签 '{}' 返回错误状态: {}", ctx, action, tag, err);
    } else {
        error!("{} ❌ {}标签 '{}' 请求失败: {}", ctx, action, tag, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryTag;

    fn entry_with_old(tag_id: Option<u64>) -> Entry {
        Entry {
            id: Some(1),
            tags: vec![EntryTag {
                id: tag_id,
                label: "old".into(),
                slug: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_removal_by_id_needs_server_id() {
        let tag = ClassificationTag::Old;
        assert_eq!(
            removal_target(TagRemoval::ById, &entry_with_old(Some(9)), tag),
            Some(RemovalTarget::Id(9))
        );
        assert_eq!(removal_target(TagRemoval::ById, &entry_with_old(None), tag), None);
    }

    #[test]
    fn test_removal_by_label_ignores_id() {
        let tag = ClassificationTag::Old;
        assert_eq!(
            removal_target(TagRemoval::ByLabel, &entry_with_old(None), tag),
            Some(RemovalTarget::Label(tag))
        );
    }
}
