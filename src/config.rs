//! 通知配置
//!
//! 配置读取优先级：
//! 1. 命令行显式指定的文件
//! 2. 当前目录 `teams-notifier.json`
//! 3. `~/.config/teams-test-notifier/config.json`
//!
//! 环境变量 `TEAMS_WEBHOOK_URL` / `TEAMS_WEBHOOK_TYPE` 覆盖文件中的值。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::notification::link::LinkSource;
use crate::notification::mention::{MentionList, DEFAULT_MENTION_TEXT};
use crate::notification::policy::SuitePredicate;
use crate::notification::webhook::WebhookKind;
use crate::suite::{FlakyCounting, SuiteNode, DEFAULT_REPORT_PATH};

pub const DEFAULT_TITLE: &str = "Test results";
pub const DEFAULT_LINK_TEXT: &str = "View test results";
pub const DEFAULT_MAX_DETAILS_PER_GROUP: usize = 20;
pub const LOCAL_CONFIG_FILE: &str = "teams-notifier.json";
pub const ENV_WEBHOOK_URL: &str = "TEAMS_WEBHOOK_URL";
pub const ENV_WEBHOOK_TYPE: &str = "TEAMS_WEBHOOK_TYPE";

/// Notifier options. JSON keys are camelCase; every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotifierOptions {
    pub webhook_url: Option<String>,
    pub webhook_type: WebhookKind,
    /// 卡片大标题
    pub title: String,
    pub notify_on_success: bool,
    /// 不输出成功日志
    pub quiet: bool,
    /// 打印完整载荷
    pub debug: bool,
    /// 只能在代码中设置
    #[serde(skip)]
    pub should_run: Option<SuitePredicate>,
    pub mention_on_failure: Option<MentionList>,
    pub mention_on_failure_text: String,
    pub link_to_results_url: Option<LinkSource>,
    pub link_to_results_text: String,
    pub link_url_on_failure: Option<LinkSource>,
    pub link_text_on_failure: Option<String>,
    /// 按状态分组列出每个测试
    pub show_details: bool,
    pub max_details_per_group: usize,
    pub include_chart: bool,
    /// 自建 QuickChart 地址，默认公共服务
    pub chart_base_url: Option<String>,
    pub report_path: Option<PathBuf>,
    pub flaky_counting: FlakyCounting,
}

impl Default for NotifierOptions {
    fn default() -> Self {
        Self {
            webhook_url: None,
            webhook_type: WebhookKind::default(),
            title: DEFAULT_TITLE.to_string(),
            notify_on_success: true,
            quiet: false,
            debug: false,
            should_run: None,
            mention_on_failure: None,
            mention_on_failure_text: DEFAULT_MENTION_TEXT.to_string(),
            link_to_results_url: None,
            link_to_results_text: DEFAULT_LINK_TEXT.to_string(),
            link_url_on_failure: None,
            link_text_on_failure: None,
            show_details: false,
            max_details_per_group: DEFAULT_MAX_DETAILS_PER_GROUP,
            include_chart: false,
            chart_base_url: None,
            report_path: None,
            flaky_counting: FlakyCounting::default(),
        }
    }
}

impl NotifierOptions {
    pub fn new(webhook_url: impl Into<String>, webhook_type: WebhookKind) -> Self {
        Self {
            webhook_url: Some(webhook_url.into()),
            webhook_type,
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn notify_on_success(mut self, notify: bool) -> Self {
        self.notify_on_success = notify;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn should_run<F>(mut self, f: F) -> Self
    where
        F: Fn(&SuiteNode) -> bool + Send + Sync + 'static,
    {
        self.should_run = Some(SuitePredicate::new(f));
        self
    }

    /// 设置失败时提及的人和消息模板
    pub fn mention_on_failure(mut self, mentions: impl Into<MentionList>, text: impl Into<String>) -> Self {
        self.mention_on_failure = Some(mentions.into());
        self.mention_on_failure_text = text.into();
        self
    }

    pub fn link_to_results(mut self, url: impl Into<LinkSource>, text: impl Into<String>) -> Self {
        self.link_to_results_url = Some(url.into());
        self.link_to_results_text = text.into();
        self
    }

    pub fn link_on_failure(mut self, url: impl Into<LinkSource>, text: impl Into<String>) -> Self {
        self.link_url_on_failure = Some(url.into());
        self.link_text_on_failure = Some(text.into());
        self
    }

    pub fn show_details(mut self, show: bool) -> Self {
        self.show_details = show;
        self
    }

    pub fn include_chart(mut self, include: bool) -> Self {
        self.include_chart = include;
        self
    }

    pub fn flaky_counting(mut self, counting: FlakyCounting) -> Self {
        self.flaky_counting = counting;
        self
    }

    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// 报告文件路径（未配置时使用默认相对路径）
    pub fn resolved_report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH))
    }

    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let options: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), "Loaded notifier config");
        Ok(options)
    }

    /// Loads the first config file found, then applies environment overrides.
    /// With no file at all, defaults plus environment are used.
    pub fn auto_load(explicit: Option<&Path>) -> Result<Self> {
        let mut options = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::candidate_paths().into_iter().find(|p| p.exists()) {
                Some(path) => Self::load(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        options.apply_env(|key| std::env::var(key).ok());
        Ok(options)
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config/teams-test-notifier/config.json"));
        }
        paths
    }

    /// 应用环境变量覆盖
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_WEBHOOK_URL).filter(|u| !u.trim().is_empty()) {
            debug!("Using {} from environment", ENV_WEBHOOK_URL);
            self.webhook_url = Some(url);
        }
        if let Some(kind) = lookup(ENV_WEBHOOK_TYPE) {
            match WebhookKind::parse(&kind) {
                Some(kind) => self.webhook_type = kind,
                None => warn!(value = %kind, "Ignoring unknown {}", ENV_WEBHOOK_TYPE),
            }
        }
    }
}
