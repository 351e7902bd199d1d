//! # Wallabag Curator
//!
//! 维护 Wallabag 条目的命令行工具：给条目打质量/年龄标签，并用公开存档替换付费墙文章
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 只负责与远端通信，不做业务判断
//! - `CatalogClient` - Wallabag 条目接口（实现 `CatalogApi`）
//! - `ArchiveClient` - 网页存档服务（实现 `ArchiveService`）
//! - `auth` - OAuth 认证，产出只读的 `Session`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `EntryFetcher` - 分页拉取全部条目
//! - `classify` - 计算标签差异（纯函数）
//! - `TagReconciler` - 把标签差异落到服务端
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个条目"的完整处理流程
//! - `EntryCtx` - 日志上下文
//! - `ArchiveFlow` - 查找存档 → 重新添加 → 验证 → 删除原条目
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 认证、任务分发、统计
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ArchiveService, CatalogApi, Session};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ClassificationTag, Entry};
pub use orchestrator::{App, Job, JobReport};
pub use services::{classify, RuleSet, TagDecision};
pub use workflow::{ArchiveFlow, ArchiveOutcome};
