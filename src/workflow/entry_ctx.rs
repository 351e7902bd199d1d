//! 条目处理上下文
//!
//! 封装"我正在处理哪个条目"，用于日志前缀

use std::fmt::Display;

use crate::models::Entry;
use crate::utils::truncate_text;

/// 条目处理上下文
#[derive(Debug, Clone)]
pub struct EntryCtx {
    /// 条目 ID
    pub entry_id: u64,

    /// 标题（已截断，仅用于日志）
    pub title: String,
}

impl EntryCtx {
    /// 从条目构建上下文；没有 ID 的条目返回 `None`
    pub fn from_entry(entry: &Entry) -> Option<Self> {
        Some(Self {
            entry_id: entry.id?,
            title: truncate_text(&entry.display_title(), 60),
        })
    }
}

impl Display for EntryCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[条目 #{} '{}']", self.entry_id, self.title)
    }
}
