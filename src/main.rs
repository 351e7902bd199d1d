use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};

use wallabag_curator::config::{parse_host_list, Config};
use wallabag_curator::error::ConfigError;
use wallabag_curator::utils::logging;
use wallabag_curator::{App, Job, RuleSet};

#[derive(Parser)]
#[command(name = "wallabag-curator")]
#[command(about = "给 Wallabag 条目打标签，并用公开存档替换付费墙文章")]
#[command(version)]
struct Cli {
    /// TOML 配置文件
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wallabag 实例地址（默认读取 WALLABAG_INSTANCE_URL）
    #[arg(long, global = true)]
    instance_url: Option<String>,

    #[arg(long, global = true)]
    client_id: Option<String>,

    #[arg(long, global = true)]
    client_secret: Option<String>,

    #[arg(long, global = true)]
    username: Option<String>,

    #[arg(long, global = true)]
    password: Option<String>,

    /// 只记录将要执行的修改，不修改 Wallabag
    #[arg(long, global = true)]
    dry_run: bool,

    /// 输出 DEBUG 级别日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 分类条目并同步 broken / old / very-old 标签
    Label {
        /// 启用的检查
        #[arg(long, value_enum, default_value_t = Checks::All)]
        checks: Checks,
    },

    /// 用公开存档替换付费墙条目
    Archive {
        /// 逗号分隔的付费墙站点（默认读取 PAYWALLED_SITES）
        #[arg(long)]
        paywalled_sites: Option<String>,

        /// 阅读时间阈值（分钟）
        #[arg(long)]
        reading_time_threshold: Option<i64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Checks {
    Quality,
    Age,
    All,
}

impl From<Checks> for RuleSet {
    fn from(checks: Checks) -> Self {
        match checks {
            Checks::Quality => RuleSet::quality_only(),
            Checks::Age => RuleSet::age_only(),
            Checks::All => RuleSet::all(),
        }
    }
}

impl Cli {
    /// 命令行参数优先级最高
    fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(v) = &self.instance_url {
            config.instance_url = v.clone();
        }
        config.client_id = self.client_id.clone().or(config.client_id);
        config.client_secret = self.client_secret.clone().or(config.client_secret);
        config.username = self.username.clone().or(config.username);
        config.password = self.password.clone().or(config.password);
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;

        if let Commands::Archive {
            paywalled_sites,
            reading_time_threshold,
        } = &self.command
        {
            if let Some(sites) = paywalled_sites {
                config.paywalled_hosts = parse_host_list(sites);
            }
            if let Some(threshold) = reading_time_threshold {
                config.reading_time_threshold = *threshold;
            }
        }
        config
    }

    fn job(&self) -> Job {
        match self.command {
            Commands::Label { checks } => Job::Label(checks.into()),
            Commands::Archive { .. } => Job::Archive,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 读取 .env（如果存在）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 初始化日志
    logging::init(cli.verbose);
    info!("脚本启动...");

    // 加载配置：指定了配置文件时叠加文件，否则只读环境变量
    let base = match cli.config.as_deref() {
        Some(path) => Config::load(Some(path))?,
        None => Config::from_env()?,
    };
    let config = cli.apply_overrides(base);

    if let Err(e) = config.validate() {
        report_config_error(&e);
        std::process::exit(2);
    }

    // 认证失败只记录错误，正常退出
    let app = match App::initialize(config).await {
        Ok(app) => app,
        Err(e) => {
            error!("❌ {:#}", e);
            info!("脚本结束");
            return Ok(());
        }
    };

    if let Err(e) = app.run(cli.job()).await {
        error!("❌ 任务执行失败: {:#}", e);
    }

    info!("脚本结束");
    Ok(())
}

fn report_config_error(err: &ConfigError) {
    match err {
        ConfigError::MissingFields { fields } => {
            error!("缺少必填配置:");
            for field in fields {
                error!("  - {}", field);
            }
            error!("请通过命令行参数、环境变量或 .env 文件提供。退出。");
        }
        other => error!("{}", other),
    }
}
