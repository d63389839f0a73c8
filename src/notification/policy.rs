//! 通知策略 - 是否发送，以及标题 / 颜色 / 背景

use std::fmt;
use std::sync::Arc;

use super::link::LinkSource;
use super::mention::{mention_block, MentionBlock};
use crate::card::{CardAction, TextColor};
use crate::config::NotifierOptions;
use crate::suite::{RunSummary, SuiteNode};

/// 自定义的运行条件
#[derive(Clone)]
pub struct SuitePredicate(Arc<dyn Fn(&SuiteNode) -> bool + Send + Sync>);

impl SuitePredicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&SuiteNode) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, suite: &SuiteNode) -> bool {
        (self.0)(suite)
    }
}

impl fmt::Debug for SuitePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SuitePredicate(..)")
    }
}

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 自定义条件返回 false
    PredicateRejected,
    /// 没有失败且未开启成功通知
    NoFailures,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PredicateRejected => write!(f, "shouldRun predicate returned false"),
            SkipReason::NoFailures => write!(f, "no failed tests"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyDecision {
    Send,
    Suppressed(SkipReason),
}

impl NotifyDecision {
    pub fn is_send(&self) -> bool {
        matches!(self, NotifyDecision::Send)
    }
}

/// Rules, first match wins: a rejecting predicate suppresses unconditionally,
/// then a run with no failures is suppressed unless `notify_on_success` is set.
pub fn evaluate(suite: &SuiteNode, summary: &RunSummary, options: &NotifierOptions) -> NotifyDecision {
    if let Some(predicate) = &options.should_run {
        if !predicate.call(suite) {
            return NotifyDecision::Suppressed(SkipReason::PredicateRejected);
        }
    }

    if summary.is_success() && !options.notify_on_success {
        return NotifyDecision::Suppressed(SkipReason::NoFailures);
    }

    NotifyDecision::Send
}

pub fn should_notify(suite: &SuiteNode, summary: &RunSummary, options: &NotifierOptions) -> bool {
    evaluate(suite, summary, options).is_send()
}

pub fn notification_title(summary: &RunSummary) -> &'static str {
    if summary.is_success() {
        "Tests passed"
    } else {
        "Tests failed"
    }
}

pub fn notification_color(summary: &RunSummary) -> TextColor {
    if summary.is_success() {
        TextColor::Good
    } else {
        TextColor::Attention
    }
}

const BACKGROUND_GOOD: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAAECAIAAADAusJtAAAADklEQVR4nGOQ7/ZhQMIAHhwD2QilHiwAAAAASUVORK5CYII=";
const BACKGROUND_ATTENTION: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAAECAIAAADAusJtAAAADklEQVR4nGO4aGLBgIQBKhQE9SmoDVgAAAAASUVORK5CYII=";

/// 卡片顶部的色条
pub fn notification_background(summary: &RunSummary) -> &'static str {
    if summary.is_success() {
        BACKGROUND_GOOD
    } else {
        BACKGROUND_ATTENTION
    }
}

/// 仅失败时生成提及块
pub fn failure_mention(summary: &RunSummary, options: &NotifierOptions) -> Option<MentionBlock> {
    if summary.is_success() {
        return None;
    }
    mention_block(options.mention_on_failure.as_ref(), &options.mention_on_failure_text)
}

/// Resolves link options into card buttons. Each supplier runs exactly once.
pub fn resolve_actions(summary: &RunSummary, options: &NotifierOptions) -> Vec<CardAction> {
    let mut actions = Vec::new();

    if let Some(url) = options.link_to_results_url.as_ref().and_then(LinkSource::resolve) {
        actions.push(CardAction::OpenUrl {
            title: options.link_to_results_text.clone(),
            url,
        });
    }

    if !summary.is_success() {
        if let (Some(text), Some(source)) = (&options.link_text_on_failure, &options.link_url_on_failure) {
            if let Some(url) = source.resolve() {
                actions.push(CardAction::OpenUrl {
                    title: text.clone(),
                    url,
                });
            }
        }
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::{TestCase, TestStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_failure_mention_only_on_failure() {
        let opts = NotifierOptions::default().mention_on_failure("Ann <ann@example.com>", "{mentions} ping");
        assert!(failure_mention(&RunSummary::new(3, 0, 0, 0), &opts).is_none());

        let block = failure_mention(&RunSummary::new(3, 1, 0, 0), &opts).unwrap();
        assert_eq!(block.message, "<at>ann@example.com</at> ping");
    }

    #[test]
    fn test_resolve_actions() {
        let failed = RunSummary::new(1, 1, 0, 0);
        let passed = RunSummary::new(2, 0, 0, 0);
        let opts = NotifierOptions::default()
            .link_to_results("https://ci.example.com/run/7", "View run")
            .link_on_failure("https://ci.example.com/triage", "Triage");

        let actions = resolve_actions(&failed, &opts);
        assert_eq!(
            actions,
            vec![
                CardAction::OpenUrl {
                    title: "View run".to_string(),
                    url: "https://ci.example.com/run/7".to_string(),
                },
                CardAction::OpenUrl {
                    title: "Triage".to_string(),
                    url: "https://ci.example.com/triage".to_string(),
                },
            ]
        );

        // 成功时不显示失败链接
        assert_eq!(resolve_actions(&passed, &opts).len(), 1);
    }

    #[test]
    fn test_failure_link_needs_text_and_url() {
        let failed = RunSummary::new(0, 1, 0, 0);
        let opts = NotifierOptions {
            link_url_on_failure: Some(LinkSource::literal("https://ci.example.com/triage")),
            link_text_on_failure: None,
            ..NotifierOptions::default()
        };
        assert!(resolve_actions(&failed, &opts).is_empty());
    }

    #[test]
    fn test_supplier_resolved_once_and_empty_skipped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let opts = NotifierOptions::default()
            .link_to_results(
                LinkSource::supplier(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Some(String::new())
                }),
                "View",
            );
        assert!(resolve_actions(&RunSummary::new(1, 1, 0, 0), &opts).is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    fn suite() -> SuiteNode {
        SuiteNode::new("root").with_test(TestCase::new("t", TestStatus::Passed))
    }

    fn options(notify_on_success: bool) -> NotifierOptions {
        NotifierOptions {
            notify_on_success,
            ..NotifierOptions::default()
        }
    }

    #[test]
    fn test_success_suppressed_without_notify_on_success() {
        let summary = RunSummary::new(10, 0, 0, 0);
        assert_eq!(
            evaluate(&suite(), &summary, &options(false)),
            NotifyDecision::Suppressed(SkipReason::NoFailures)
        );
        assert!(should_notify(&suite(), &summary, &options(true)));
    }

    #[test]
    fn test_success_suppressed_regardless_of_other_options() {
        let summary = RunSummary::new(3, 0, 2, 1);
        let opts = NotifierOptions {
            notify_on_success: false,
            quiet: true,
            debug: true,
            include_chart: true,
            should_run: Some(SuitePredicate::new(|_| true)),
            ..NotifierOptions::default()
        };
        assert!(!should_notify(&suite(), &summary, &opts));
    }

    #[test]
    fn test_failures_always_notify() {
        let summary = RunSummary::new(8, 2, 0, 0);
        assert!(should_notify(&suite(), &summary, &options(false)));
        assert!(should_notify(&suite(), &summary, &options(true)));
    }

    #[test]
    fn test_predicate_rejects_even_with_failures() {
        let summary = RunSummary::new(0, 5, 0, 0);
        let opts = NotifierOptions {
            should_run: Some(SuitePredicate::new(|_| false)),
            ..options(true)
        };
        assert_eq!(
            evaluate(&suite(), &summary, &opts),
            NotifyDecision::Suppressed(SkipReason::PredicateRejected)
        );
    }

    #[test]
    fn test_predicate_sees_suite() {
        let opts = NotifierOptions {
            should_run: Some(SuitePredicate::new(|s| s.title == "nightly")),
            ..options(true)
        };
        let summary = RunSummary::new(1, 1, 0, 0);
        assert!(!should_notify(&suite(), &summary, &opts));
        assert!(should_notify(&SuiteNode::new("nightly"), &summary, &opts));
    }

    #[test]
    fn test_decoration_two_states() {
        let ok = RunSummary::new(5, 0, 0, 2);
        let bad = RunSummary::new(5, 1, 0, 0);
        assert_eq!(notification_title(&ok), "Tests passed");
        assert_eq!(notification_title(&bad), "Tests failed");
        assert_eq!(notification_color(&ok), TextColor::Good);
        assert_eq!(notification_color(&bad), TextColor::Attention);
        assert_ne!(notification_background(&ok), notification_background(&bad));
        assert!(notification_background(&bad).starts_with("data:image/png;base64,"));
    }
}
