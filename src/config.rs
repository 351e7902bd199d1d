use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::clients::auth::Credentials;
use crate::error::ConfigError;

/// 默认的付费墙站点
pub const DEFAULT_PAYWALLED_HOSTS: &[&str] = &[
    "wsj.com",
    "ft.com",
    "bloomberg.com",
    "nytimes.com",
    "washingtonpost.com",
    "economist.com",
];

/// 删除标签时使用的接口
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagRemoval {
    /// `DELETE /api/entries/{id}/tags/{tagId}`
    #[default]
    ById,
    /// `PUT /api/entries/{id}/tags/{label}`
    ByLabel,
}

impl FromStr for TagRemoval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "by-id" | "id" => Ok(TagRemoval::ById),
            "by-label" | "label" => Ok(TagRemoval::ByLabel),
            other => Err(format!("未知的标签删除方式: {}", other)),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// Wallabag 实例地址
    pub instance_url: String,
    // --- OAuth 凭据 ---
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    // --- 存档替换 ---
    /// 付费墙站点（按域名后缀匹配）
    pub paywalled_hosts: Vec<String>,
    /// 阅读时间阈值（分钟），不超过该值视为抓取失败
    pub reading_time_threshold: i64,
    /// 存档服务地址
    pub archive_base_url: String,
    // --- 其他 ---
    /// 拉取条目时每页数量
    pub per_page: u32,
    pub tag_removal: TagRemoval,
    /// 只记录将要执行的修改，不真正修改
    pub dry_run: bool,
    /// 是否显示详细日志
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instance_url: "https://app.wallabag.it".to_string(),
            client_id: None,
            client_secret: None,
            username: None,
            password: None,
            paywalled_hosts: DEFAULT_PAYWALLED_HOSTS.iter().map(|h| h.to_string()).collect(),
            reading_time_threshold: 2,
            archive_base_url: "https://archive.is".to_string(),
            per_page: 50,
            tag_removal: TagRemoval::ById,
            dry_run: false,
            verbose: false,
        }
    }
}

/// TOML 配置文件，所有字段可选
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    instance_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    username: Option<String>,
    password: Option<String>,
    paywalled_hosts: Option<Vec<String>>,
    reading_time_threshold: Option<i64>,
    archive_base_url: Option<String>,
    per_page: Option<u32>,
    tag_removal: Option<TagRemoval>,
}

impl Config {
    /// 从环境变量读取配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_lookup(|key| std::env::var(key).ok())
    }

    /// 依次叠加：默认值 → 配置文件（可选）→ 环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::default()
                .merge_file(path)?
                .merge_lookup(|key| std::env::var(key).ok()),
            None => Self::from_env(),
        }
    }

    fn merge_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let load_err = |message: String| ConfigError::FileLoadFailed {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let file: FileConfig = toml::from_str(&content).map_err(|e| load_err(e.to_string()))?;

        if let Some(v) = file.instance_url {
            self.instance_url = v;
        }
        self.client_id = file.client_id.or(self.client_id);
        self.client_secret = file.client_secret.or(self.client_secret);
        self.username = file.username.or(self.username);
        self.password = file.password.or(self.password);
        if let Some(hosts) = file.paywalled_hosts {
            self.paywalled_hosts = normalize_hosts(hosts);
        }
        if let Some(v) = file.reading_time_threshold {
            self.reading_time_threshold = v;
        }
        if let Some(v) = file.archive_base_url {
            self.archive_base_url = v;
        }
        if let Some(v) = file.per_page {
            self.per_page = v;
        }
        if let Some(v) = file.tag_removal {
            self.tag_removal = v;
        }
        Ok(self)
    }

    /// 用任意键值来源覆盖配置（便于测试，不依赖进程环境变量）
    pub fn merge_lookup<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("WALLABAG_INSTANCE_URL") {
            self.instance_url = v;
        }
        self.client_id = non_empty("WALLABAG_CLIENT_ID").or(self.client_id);
        self.client_secret = non_empty("WALLABAG_CLIENT_SECRET").or(self.client_secret);
        self.username = non_empty("WALLABAG_USERNAME").or(self.username);
        self.password = non_empty("WALLABAG_PASSWORD").or(self.password);
        if let Some(v) = non_empty("PAYWALLED_SITES") {
            self.paywalled_hosts = parse_host_list(&v);
        }
        if let Some(v) = non_empty("READING_TIME_THRESHOLD") {
            self.reading_time_threshold = parse_var("READING_TIME_THRESHOLD", &v, "整数")?;
        }
        if let Some(v) = non_empty("ARCHIVE_BASE_URL") {
            self.archive_base_url = v;
        }
        if let Some(v) = non_empty("WALLABAG_PER_PAGE") {
            self.per_page = parse_var("WALLABAG_PER_PAGE", &v, "正整数")?;
        }
        if let Some(v) = non_empty("TAG_REMOVAL") {
            self.tag_removal = parse_var("TAG_REMOVAL", &v, "by-id 或 by-label")?;
        }
        Ok(self)
    }

    /// 检查必填项，一次性列出所有缺失的配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        let checks = [
            (Some(&self.instance_url), "Instance URL (WALLABAG_INSTANCE_URL 或 --instance-url)"),
            (self.client_id.as_ref(), "Client ID (WALLABAG_CLIENT_ID 或 --client-id)"),
            (self.client_secret.as_ref(), "Client Secret (WALLABAG_CLIENT_SECRET 或 --client-secret)"),
            (self.username.as_ref(), "Username (WALLABAG_USERNAME 或 --username)"),
            (self.password.as_ref(), "Password (WALLABAG_PASSWORD 或 --password)"),
        ];
        for (value, name) in checks {
            if value.map_or(true, |v| v.trim().is_empty()) {
                missing.push(name.to_string());
            }
        }
        if self.per_page == 0 {
            missing.push("每页数量必须大于 0 (WALLABAG_PER_PAGE)".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingFields { fields: missing })
        }
    }

    /// 认证所需的凭据
    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.clone().unwrap_or_default(),
            client_secret: self.client_secret.clone().unwrap_or_default(),
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
        }
    }
}

/// 解析逗号分隔的站点列表
pub fn parse_host_list(raw: &str) -> Vec<String> {
    normalize_hosts(raw.split(',').map(str::to_string))
}

fn normalize_hosts(hosts: impl IntoIterator<Item = String>) -> Vec<String> {
    hosts
        .into_iter()
        .map(|h| h.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

fn parse_var<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
        var_name: var_name.to_string(),
        value: value.to_string(),
        expected_type: expected_type.to_string(),
    })
}
