/// 日志工具模块
///
/// 提供日志初始化以及格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// `RUST_LOG` 优先；否则默认 `info`，`verbose` 时为 `debug`。
/// 重复调用不会报错（测试里会多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    if verbose {
        tracing::debug!("已启用详细日志");
    }
}

/// 记录程序启动信息
///
/// # 参数
/// - `job`: 当前任务名称
/// - `instance_url`: Wallabag 实例地址
/// - `dry_run`: 是否为演练模式
pub fn log_startup(job: &str, instance_url: &str, dry_run: bool) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", job);
    info!("🌐 Wallabag 实例: {}", instance_url);
    if dry_run {
        info!("🧪 DRY RUN 模式：不会对 Wallabag 做任何修改");
    }
    info!("{}", "=".repeat(60));
}

/// 每处理 100 个条目输出一次进度
pub fn log_progress(processed: usize, total: usize) {
    if processed > 0 && processed % 100 == 0 && processed < total {
        info!("⏳ 已处理 {}/{} 个条目...", processed, total);
    }
}

/// 输出统计区块
///
/// # 参数
/// - `title`: 区块标题
/// - `lines`: (名称, 数值) 列表
pub fn print_stats_block(title: &str, lines: &[(&str, usize)]) {
    info!("{}", "=".repeat(60));
    info!("📊 {}", title);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "-".repeat(60));
    for (name, value) in lines {
        info!("{}: {}", name, value);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
