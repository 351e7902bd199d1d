//! 分类引擎 - 业务能力层
//!
//! 根据条目的元数据计算目标标签，输出与当前标签的最小差异
//! （`apply` / `remove`）。纯函数，不发请求、不打日志，时间由调用方传入。

use chrono::{DateTime, Duration, Months, Utc};
use std::fmt::Display;

use crate::models::{ClassificationTag, Entry};
use crate::services::timestamp::parse_created_at;

/// 小于该字节数视为内容抓取失败
pub const MIN_CONTENT_SIZE: i64 = 10 * 1024;

/// `old` 的固定阈值（3 × 30 天）
pub const OLD_AFTER_DAYS: i64 = 90;

/// `very-old` 的日历阈值
pub const VERY_OLD_AFTER_MONTHS: u32 = 12;

/// 判定为 broken 的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokenReason {
    ZeroPages,
    SizeBelowMinimum,
    ZeroReadingTime,
}

impl Display for BrokenReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            BrokenReason::ZeroPages => "页数为 0",
            BrokenReason::SizeBelowMinimum => "体积小于 10KB",
            BrokenReason::ZeroReadingTime => "阅读时间为 0",
        };
        f.write_str(text)
    }
}

/// 年龄分档
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeClass {
    Fresh,
    Old,
    VeryOld,
}

/// 年龄检查的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgeOutcome {
    /// 未启用年龄检查
    NotEvaluated,
    /// 已有 `very-old`，无需再看时间
    AlreadyVeryOld,
    /// 没有 `created_at`
    MissingTimestamp,
    /// `created_at` 无法解析（原始字符串）
    Unparsable(String),
    Classified(AgeClass),
}

/// 启用哪些检查
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub quality: bool,
    pub age: bool,
}

impl RuleSet {
    pub fn all() -> Self {
        Self {
            quality: true,
            age: true,
        }
    }

    pub fn quality_only() -> Self {
        Self {
            quality: true,
            age: false,
        }
    }

    pub fn age_only() -> Self {
        Self {
            quality: false,
            age: true,
        }
    }
}

/// 标签差异
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDecision {
    pub apply: Vec<ClassificationTag>,
    pub remove: Vec<ClassificationTag>,
}

impl TagDecision {
    pub fn is_empty(&self) -> bool {
        self.apply.is_empty() && self.remove.is_empty()
    }
}

/// 单个条目的分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub decision: TagDecision,
    /// 为空表示没有命中（或已带 `broken`，跳过了检查）
    pub broken_reasons: Vec<BrokenReason>,
    pub age: AgeOutcome,
}

/// 对条目做分类
///
/// # 参数
/// - `entry`: 条目（含当前标签）
/// - `now`: 当前时间
/// - `rules`: 启用的检查
///
/// # 返回
/// 返回分类结果，其中 `decision` 只包含相对当前标签需要变化的部分
pub fn classify(entry: &Entry, now: DateTime<Utc>, rules: RuleSet) -> Classification {
    let mut decision = TagDecision::default();

    let mut broken_reasons = Vec::new();
    if rules.quality && !entry.has_tag(ClassificationTag::Broken) {
        broken_reasons = quality_failures(entry);
        if !broken_reasons.is_empty() {
            decision.apply.push(ClassificationTag::Broken);
        }
    }

    let age = if rules.age {
        classify_age(entry, now, &mut decision)
    } else {
        AgeOutcome::NotEvaluated
    };

    Classification {
        decision,
        broken_reasons,
        age,
    }
}

/// 质量检查，字段缺失时不触发对应规则
pub fn quality_failures(entry: &Entry) -> Vec<BrokenReason> {
    let mut reasons = Vec::new();
    if entry.pages == Some(0) {
        reasons.push(BrokenReason::ZeroPages);
    }
    if matches!(entry.size, Some(size) if size < MIN_CONTENT_SIZE) {
        reasons.push(BrokenReason::SizeBelowMinimum);
    }
    if entry.reading_time == Some(0) {
        reasons.push(BrokenReason::ZeroReadingTime);
    }
    reasons
}

fn classify_age(entry: &Entry, now: DateTime<Utc>, decision: &mut TagDecision) -> AgeOutcome {
    let has_old = entry.has_tag(ClassificationTag::Old);

    // 年龄只增不减：已是 very-old 的条目只需清掉残留的 old
    if entry.has_tag(ClassificationTag::VeryOld) {
        if has_old {
            decision.remove.push(ClassificationTag::Old);
        }
        return AgeOutcome::AlreadyVeryOld;
    }

    let raw = match entry.created_at.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return AgeOutcome::MissingTimestamp,
    };
    let created = match parse_created_at(raw) {
        Ok(created) => created,
        Err(_) => return AgeOutcome::Unparsable(raw.to_string()),
    };

    let class = age_class(created, now);
    match class {
        AgeClass::VeryOld => {
            decision.apply.push(ClassificationTag::VeryOld);
            if has_old {
                decision.remove.push(ClassificationTag::Old);
            }
        }
        AgeClass::Old if !has_old => decision.apply.push(ClassificationTag::Old),
        AgeClass::Old | AgeClass::Fresh => {}
    }
    AgeOutcome::Classified(class)
}

/// 年龄分档
///
/// `very-old` 按日历月计算（满 12 个月），`old` 按固定 90 天计算。
/// 未来时间一律视为 `Fresh`。
pub fn age_class(created: DateTime<Utc>, now: DateTime<Utc>) -> AgeClass {
    if created > now {
        return AgeClass::Fresh;
    }

    let very_old = created
        .checked_add_months(Months::new(VERY_OLD_AFTER_MONTHS))
        .map_or(false, |anniversary| anniversary <= now);
    if very_old {
        return AgeClass::VeryOld;
    }

    if now - created >= Duration::days(OLD_AFTER_DAYS) {
        AgeClass::Old
    } else {
        AgeClass::Fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryTag;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn healthy() -> Entry {
        Entry {
            id: Some(1),
            pages: Some(10),
            size: Some(20_000),
            reading_time: Some(5),
            ..Default::default()
        }
    }

    fn tagged(mut entry: Entry, tags: &[(u64, &str)]) -> Entry {
        entry.tags = tags
            .iter()
            .map(|(id, label)| EntryTag {
                id: Some(*id),
                label: label.to_string(),
                slug: None,
            })
            .collect();
        entry
    }

    fn created(entry: Entry, at: DateTime<Utc>) -> Entry {
        Entry {
            created_at: Some(at.to_rfc3339()),
            ..entry
        }
    }

    #[test]
    fn test_quality_rules_each_trigger_broken() {
        let cases = [
            (Entry { pages: Some(0), ..healthy() }, BrokenReason::ZeroPages),
            (Entry { size: Some(5_000), ..healthy() }, BrokenReason::SizeBelowMinimum),
            (Entry { size: Some(10_239), ..healthy() }, BrokenReason::SizeBelowMinimum),
            (Entry { reading_time: Some(0), ..healthy() }, BrokenReason::ZeroReadingTime),
        ];
        for (entry, reason) in cases {
            let result = classify(&entry, now(), RuleSet::quality_only());
            assert_eq!(result.decision.apply, vec![ClassificationTag::Broken]);
            assert_eq!(result.broken_reasons, vec![reason]);
        }
    }

    #[test]
    fn test_all_reasons_collected() {
        let entry = Entry {
            pages: Some(0),
            size: Some(100),
            reading_time: Some(0),
            ..healthy()
        };
        let result = classify(&entry, now(), RuleSet::quality_only());
        assert_eq!(result.broken_reasons.len(), 3);
        assert_eq!(result.decision.apply, vec![ClassificationTag::Broken]);
    }

    #[test]
    fn test_healthy_and_null_fields_are_not_broken() {
        let cases = [
            healthy(),
            Entry { size: Some(MIN_CONTENT_SIZE), ..healthy() },
            Entry { pages: None, ..healthy() },
            Entry { size: None, ..healthy() },
            Entry { reading_time: None, ..healthy() },
        ];
        for entry in cases {
            let result = classify(&entry, now(), RuleSet::quality_only());
            assert!(result.decision.is_empty(), "{entry:?}");
        }
    }

    #[test]
    fn test_already_broken_is_not_reevaluated() {
        let entry = tagged(Entry { pages: Some(0), ..healthy() }, &[(3, "broken")]);
        let result = classify(&entry, now(), RuleSet::quality_only());
        assert!(result.decision.is_empty());
        assert!(result.broken_reasons.is_empty());
    }

    #[test]
    fn test_ninety_day_boundary_is_old() {
        let entry = created(healthy(), now() - Duration::days(90));
        let result = classify(&entry, now(), RuleSet::age_only());
        assert_eq!(result.age, AgeOutcome::Classified(AgeClass::Old));
        assert_eq!(result.decision.apply, vec![ClassificationTag::Old]);

        let entry = created(healthy(), now() - Duration::days(90) + Duration::seconds(1));
        let result = classify(&entry, now(), RuleSet::age_only());
        assert_eq!(result.age, AgeOutcome::Classified(AgeClass::Fresh));
        assert!(result.decision.is_empty());
    }

    #[test]
    fn test_one_year_boundary_replaces_old() {
        let anniversary = now().checked_sub_months(Months::new(12)).unwrap();
        let entry = tagged(created(healthy(), anniversary), &[(11, "old")]);

        let result = classify(&entry, now(), RuleSet::age_only());

        assert_eq!(result.age, AgeOutcome::Classified(AgeClass::VeryOld));
        assert_eq!(result.decision.apply, vec![ClassificationTag::VeryOld]);
        assert_eq!(result.decision.remove, vec![ClassificationTag::Old]);
    }

    #[test]
    fn test_calendar_year_not_365_days() {
        // 2024 是闰年：2024-06-15 到 2025-06-15 为 365 天，到 2025-06-14 不满一年
        let start = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(age_class(start, now()), AgeClass::VeryOld);
        assert_eq!(age_class(start, now() - Duration::seconds(1)), AgeClass::Old);

        let leap_start = Utc.with_ymd_and_hms(2023, 6, 16, 12, 0, 0).unwrap();
        let leap_now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        // 已满 365 天，但还没到日历上的周年
        assert_eq!(age_class(leap_start, leap_now), AgeClass::Old);
    }

    #[test]
    fn test_old_entry_already_tagged_old_needs_nothing() {
        let entry = tagged(created(healthy(), now() - Duration::days(120)), &[(11, "old")]);
        let result = classify(&entry, now(), RuleSet::age_only());
        assert!(result.decision.is_empty());
    }

    #[test]
    fn test_very_old_tag_skips_age_evaluation() {
        let entry = tagged(
            Entry {
                created_at: Some("not-a-date-string".into()),
                ..healthy()
            },
            &[(12, "very-old")],
        );
        let result = classify(&entry, now(), RuleSet::age_only());
        assert_eq!(result.age, AgeOutcome::AlreadyVeryOld);
        assert!(result.decision.is_empty());

        let both = tagged(healthy(), &[(11, "old"), (12, "very-old")]);
        let result = classify(&both, now(), RuleSet::age_only());
        assert_eq!(result.decision.remove, vec![ClassificationTag::Old]);
        assert!(result.decision.apply.is_empty());
    }

    #[test]
    fn test_future_dates_are_fresh() {
        let entry = created(healthy(), now() + Duration::days(800));
        let result = classify(&entry, now(), RuleSet::age_only());
        assert_eq!(result.age, AgeOutcome::Classified(AgeClass::Fresh));
        assert!(result.decision.is_empty());
    }

    #[test]
    fn test_malformed_date_only_skips_age() {
        let entry = Entry {
            pages: Some(0),
            created_at: Some("not-a-date-string".into()),
            ..healthy()
        };
        let result = classify(&entry, now(), RuleSet::all());
        assert_eq!(result.age, AgeOutcome::Unparsable("not-a-date-string".into()));
        assert_eq!(result.decision.apply, vec![ClassificationTag::Broken]);
    }

    #[test]
    fn test_missing_date() {
        let result = classify(&healthy(), now(), RuleSet::age_only());
        assert_eq!(result.age, AgeOutcome::MissingTimestamp);
    }
}
