//! 测试结果通知入口
//!
//! 由宿主测试运行器在运行结束后调用。所有失败都只记录日志并返回，
//! 不会让宿主的测试运行失败。

use chrono::Utc;
use tracing::{error, info, warn};

use crate::card::{BuildOptions, CardBuilder, CardDocument, QuickChartProvider};
use crate::config::NotifierOptions;
use crate::error::NotifyError;
use crate::notification::payload::{apply_compatibility, render_message};
use crate::notification::policy::{evaluate, failure_mention, resolve_actions, NotifyDecision, SkipReason};
use crate::notification::webhook::{deliver, validate_webhook_url, DeliveryOutcome, WebhookTransport};
use crate::suite::{aggregate, load_test_details, RunSummary, SuiteNode, TestDetail};

/// 一次运行的最终结果
#[derive(Debug)]
pub enum ReportOutcome {
    /// 已发送
    Sent(DeliveryOutcome),
    /// 按策略跳过
    Skipped(SkipReason),
    /// 失败（已记录日志）
    Failed(NotifyError),
}

impl ReportOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, ReportOutcome::Sent(_))
    }
}

enum Prepared {
    Card(CardDocument),
    Skip(SkipReason),
}

/// Runs the whole pipeline: checks, gate, aggregation, card, one POST.
pub async fn process_results<T: WebhookTransport>(
    suite: Option<&SuiteNode>,
    options: &NotifierOptions,
    transport: &T,
) -> ReportOutcome {
    let card = match prepare(suite, options) {
        Ok(Prepared::Card(card)) => card,
        Ok(Prepared::Skip(reason)) => return ReportOutcome::Skipped(reason),
        Err(e) => {
            if e.is_configuration() {
                warn!(error = %e, "Notifier is not configured correctly");
            } else {
                error!(error = %e, "Notification aborted");
            }
            return ReportOutcome::Failed(e);
        }
    };

    match deliver(card, options, transport).await {
        Ok(outcome) => ReportOutcome::Sent(outcome),
        Err(e) => {
            error!(error = %e, "Failed to send message");
            ReportOutcome::Failed(e)
        }
    }
}

/// Renders the message body that `process_results` would send, without
/// sending it. `Ok(None)` means the policy suppressed the notification.
pub fn render_payload(suite: Option<&SuiteNode>, options: &NotifierOptions) -> Result<Option<String>, NotifyError> {
    match prepare(suite, options)? {
        Prepared::Card(mut card) => {
            apply_compatibility(&mut card, options.webhook_type);
            let body = render_message(&card)?;
            Ok(Some(body))
        }
        Prepared::Skip(_) => Ok(None),
    }
}

fn prepare(suite: Option<&SuiteNode>, options: &NotifierOptions) -> Result<Prepared, NotifyError> {
    validate_webhook_url(options.webhook_url.as_deref(), options.webhook_type)?;
    let suite = suite.ok_or(NotifyError::MissingSuite)?;

    let summary = aggregate(std::slice::from_ref(suite), options.flaky_counting);

    if let NotifyDecision::Suppressed(reason) = evaluate(suite, &summary, options) {
        if !options.quiet {
            info!(reason = %reason, "Skipping notification");
        }
        return Ok(Prepared::Skip(reason));
    }

    let details = load_details(&summary, options);
    Ok(Prepared::Card(build_card(&summary, &details, options)))
}

fn load_details(summary: &RunSummary, options: &NotifierOptions) -> Vec<TestDetail> {
    if !options.show_details {
        return Vec::new();
    }
    let details = load_test_details(&options.resolved_report_path());
    if !details.is_empty() {
        let reported = RunSummary::from_details(&details, options.flaky_counting);
        if reported != *summary {
            warn!(
                report_total = reported.total,
                report_failed = reported.failed,
                suite_total = summary.total,
                suite_failed = summary.failed,
                "Report artifact and suite disagree on counts"
            );
        }
    }
    details
}

fn build_card(summary: &RunSummary, details: &[TestDetail], options: &NotifierOptions) -> CardDocument {
    let chart = match &options.chart_base_url {
        Some(base_url) => QuickChartProvider::new().with_base_url(base_url),
        None => QuickChartProvider::new(),
    };
    let mut builder = CardBuilder::new(BuildOptions::from_options(options).with_finished_at(Utc::now()))
        .with_mention(failure_mention(summary, options))
        .with_actions(resolve_actions(summary, options));
    if options.include_chart {
        builder = builder.with_chart(&chart);
    }
    builder.build(summary, details)
}
