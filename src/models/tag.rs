//! 分类标签
//!
//! 服务端标签是普通字符串，这里把我们关心的几个标签收拢成一个封闭枚举，
//! 避免拼写错误悄悄在服务端生成一个新标签。

use phf::phf_map;
use std::fmt::Display;

/// 由本程序管理的标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationTag {
    /// 内容抓取失败（页数为 0、体积过小或阅读时间为 0）
    Broken,
    /// 创建超过 90 天
    Old,
    /// 创建超过 1 年，取代 `Old`
    VeryOld,
    /// 由存档替换流程新建的条目
    Archived,
}

static LABELS: phf::Map<&'static str, ClassificationTag> = phf_map! {
    "broken" => ClassificationTag::Broken,
    "old" => ClassificationTag::Old,
    "very-old" => ClassificationTag::VeryOld,
    "archived" => ClassificationTag::Archived,
};

impl ClassificationTag {
    /// 服务端使用的标签字符串
    pub fn as_label(self) -> &'static str {
        match self {
            ClassificationTag::Broken => "broken",
            ClassificationTag::Old => "old",
            ClassificationTag::VeryOld => "very-old",
            ClassificationTag::Archived => "archived",
        }
    }

    /// 从服务端标签解析（精确匹配，区分大小写）
    pub fn from_label(label: &str) -> Option<Self> {
        LABELS.get(label).copied()
    }
}

impl Display for ClassificationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}
