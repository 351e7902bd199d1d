//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次运行的生命周期。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、认证、创建客户端
//! 2. **任务分发**：按 `Job` 委托给 label_processor / archive_processor
//! 3. **资源管理**：唯一持有 `CatalogClient` 与 `ArchiveClient`
//!
//! 所有请求按顺序执行，不并发。

use anyhow::{Context, Result};
use tracing::info;

use crate::clients::{obtain_token, ArchiveClient, CatalogClient};
use crate::config::Config;
use crate::orchestrator::archive_processor::{archive_paywalled, ArchiveStats};
use crate::orchestrator::label_processor::{label_catalog, LabelStats};
use crate::services::RuleSet;
use crate::utils::logging::log_startup;

/// 要执行的任务
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// 分类并打标签
    Label(RuleSet),
    /// 用存档副本替换付费墙条目
    Archive,
}

impl Job {
    fn name(&self) -> &'static str {
        match self {
            Job::Label(_) => "条目分类与标签",
            Job::Archive => "付费墙条目存档替换",
        }
    }
}

/// 任务结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobReport {
    Label(LabelStats),
    Archive(ArchiveStats),
}

/// 应用主结构
pub struct App {
    config: Config,
    catalog: CatalogClient,
}

impl App {
    /// 初始化应用：校验配置并认证
    ///
    /// 配置缺失时不会发出任何请求。
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置不完整")?;

        info!("🌐 使用 Wallabag 实例: {}", config.instance_url);
        let http = reqwest::Client::new();
        let session = obtain_token(&http, &config.instance_url, &config.credentials())
            .await
            .context("认证失败，请检查凭据和实例地址")?;

        let catalog = CatalogClient::new(http, session);
        Ok(Self { config, catalog })
    }

    /// 运行指定任务
    pub async fn run(&self, job: Job) -> Result<JobReport> {
        log_startup(job.name(), &self.config.instance_url, self.config.dry_run);

        let report = match job {
            Job::Label(rules) => JobReport::Label(
                label_catalog(&self.catalog, &self.config, rules, chrono::Utc::now()).await,
            ),
            Job::Archive => {
                let archiver = ArchiveClient::new(&self.config.archive_base_url)
                    .context("无法创建存档服务客户端")?;
                JobReport::Archive(archive_paywalled(&self.catalog, &archiver, &self.config).await)
            }
        };

        info!("🏁 任务结束");
        Ok(report)
    }
}
