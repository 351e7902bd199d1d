//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整批条目的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 应用入口
//! - 校验配置、认证、持有客户端
//! - 按任务分发
//!
//! ### `label_processor` - 标签任务
//! - 遍历全部条目：分类 → 标签同步
//! - 输出标签统计
//!
//! ### `archive_processor` - 存档替换任务
//! - 遍历未读条目，交给 `workflow::ArchiveFlow`
//! - 输出替换统计
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (App)
//!     ↓
//! label_processor / archive_processor (处理 Vec<Entry>)
//!     ↓
//! workflow::ArchiveFlow (处理单个 Entry)
//!     ↓
//! services (能力层：fetch / classify / reconcile)
//!     ↓
//! clients (基础设施：Wallabag / 存档服务)
//! ```

pub mod archive_processor;
pub mod batch_processor;
pub mod label_processor;

// 重新导出主要类型
pub use archive_processor::{archive_paywalled, ArchiveStats};
pub use batch_processor::{App, Job, JobReport};
pub use label_processor::{label_catalog, label_entries, LabelStats};
