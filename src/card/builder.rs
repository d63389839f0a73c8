//! 卡片构建器 - 汇总 + 明细 → Adaptive Card
//!
//! 输出顺序固定：标题区（标题、状态、汇总表）→ 分组明细 → 图表 → 提及 → 按钮。
//! 不做任何网络或磁盘 I/O。

use chrono::{DateTime, Utc};

use super::chart::ChartUrlProvider;
use super::table::summary_table;
use super::{
    template, BackgroundImage, CardAction, CardDocument, CardElement, Container, FillMode, Image, ImageSize,
    Spacing, TextBlock, TextSize, TextWeight,
};
use crate::config::NotifierOptions;
use crate::notification::mention::MentionBlock;
use crate::notification::policy::{notification_background, notification_color, notification_title};
use crate::suite::{FlakyCounting, RunSummary, TestDetail, TestOutcome};

/// 显示选项
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub title: String,
    /// 每组最多列出的测试数
    pub max_details_per_group: usize,
    pub finished_at: Option<DateTime<Utc>>,
}

impl BuildOptions {
    pub fn from_options(options: &NotifierOptions) -> Self {
        Self {
            title: options.title.clone(),
            max_details_per_group: options.max_details_per_group,
            finished_at: None,
        }
    }

    pub fn with_finished_at(mut self, at: DateTime<Utc>) -> Self {
        self.finished_at = Some(at);
        self
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from_options(&NotifierOptions::default())
    }
}

/// Assembles a card from the run summary. Every `build` starts from a fresh
/// template, so one builder can produce any number of independent documents.
pub struct CardBuilder<'a> {
    options: BuildOptions,
    chart: Option<&'a dyn ChartUrlProvider>,
    mention: Option<MentionBlock>,
    actions: Vec<CardAction>,
}

impl<'a> CardBuilder<'a> {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            chart: None,
            mention: None,
            actions: Vec::new(),
        }
    }

    /// 设置图表来源
    pub fn with_chart(mut self, provider: &'a dyn ChartUrlProvider) -> Self {
        self.chart = Some(provider);
        self
    }

    pub fn with_mention(mut self, mention: Option<MentionBlock>) -> Self {
        self.mention = mention;
        self
    }

    pub fn with_actions(mut self, actions: Vec<CardAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn build(&self, summary: &RunSummary, details: &[TestDetail]) -> CardDocument {
        let mut card = template();

        card.body.push(self.header(summary));

        for outcome in TestOutcome::ORDER {
            let group: Vec<&TestDetail> = details
                .iter()
                .filter(|d| in_group(d.status, outcome, summary.counting))
                .collect();
            if !group.is_empty() {
                card.body.push(self.detail_group(outcome, &group));
            }
        }

        if let Some(url) = self.chart.and_then(|p| p.chart_url(summary)) {
            card.body.push(
                Image {
                    url,
                    alt_text: Some("Test results chart".to_string()),
                    size: Some(ImageSize::Stretch),
                }
                .into(),
            );
        }

        if let Some(mention) = &self.mention {
            card.body.push(TextBlock::new(&mention.message).size(TextSize::Medium).wrap().into());
            card.msteams.entities = mention.mentions.iter().map(|m| m.to_entity()).collect();
        }

        card.actions = self.actions.clone();
        card
    }

    fn header(&self, summary: &RunSummary) -> CardElement {
        let mut items: Vec<CardElement> = vec![
            TextBlock::new(&self.options.title)
                .size(TextSize::ExtraLarge)
                .weight(TextWeight::Bolder)
                .wrap()
                .into(),
            TextBlock::new(notification_title(summary))
                .size(TextSize::Large)
                .weight(TextWeight::Bolder)
                .color(notification_color(summary))
                .into(),
        ];

        if let Some(at) = self.options.finished_at {
            items.push(
                TextBlock::new(format!("Finished {}", at.format("%Y-%m-%d %H:%M UTC")))
                    .subtle()
                    .spacing(Spacing::None)
                    .into(),
            );
        }

        items.push(summary_table(summary).into());

        Container {
            bleed: Some(true),
            background_image: Some(BackgroundImage {
                url: notification_background(summary).to_string(),
                fill_mode: FillMode::RepeatHorizontally,
            }),
            ..Container::new(items)
        }
        .into()
    }

    fn detail_group(&self, outcome: TestOutcome, tests: &[&TestDetail]) -> CardElement {
        let mut items: Vec<CardElement> = vec![TextBlock::new(format!(
            "{} {} ({})",
            outcome.glyph(),
            outcome.label(),
            tests.len()
        ))
        .weight(TextWeight::Bolder)
        .into()];

        let limit = self.options.max_details_per_group;
        for test in tests.iter().take(limit) {
            items.push(detail_item(test));
        }
        if tests.len() > limit {
            items.push(
                TextBlock::new(format!("… and {} more", tests.len() - limit))
                    .subtle()
                    .into(),
            );
        }

        Container {
            separator: Some(true),
            spacing: Some(Spacing::Medium),
            ..Container::new(items)
        }
        .into()
    }
}

/// Group membership follows the table: under `Overlay` flaky tests are also
/// listed under Passed, keeping their own status line.
fn in_group(status: TestOutcome, group: TestOutcome, counting: FlakyCounting) -> bool {
    status == group
        || (counting == FlakyCounting::Overlay && group == TestOutcome::Passed && status == TestOutcome::Flaky)
}

/// 两行：测试名；状态 + 耗时
fn detail_item(test: &TestDetail) -> CardElement {
    Container {
        spacing: Some(Spacing::Small),
        ..Container::new(vec![
            TextBlock::new(&test.title).wrap().into(),
            TextBlock::new(format!(
                "{} {} · {}",
                test.status.glyph(),
                test.status.label(),
                format_duration(test.duration_ms)
            ))
            .size(TextSize::Small)
            .subtle()
            .spacing(Spacing::None)
            .into(),
        ])
    }
    .into()
}

pub fn format_duration(ms: u64) -> String {
    match ms {
        0..=999 => format!("{}ms", ms),
        1_000..=59_999 => format!("{:.1}s", ms as f64 / 1000.0),
        _ => format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000),
    }
}
