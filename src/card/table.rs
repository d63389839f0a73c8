//! 汇总表格 - 类型 / 数量 / 占比

use super::{
    CardElement, ContainerStyle, Table, TableCell, TableColumnDefinition, TableRow, TextBlock, TextWeight,
};
use crate::suite::{RunSummary, TestOutcome};

/// 行样式
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RowStyle {
    pub style: Option<ContainerStyle>,
    pub is_subtle: bool,
    pub weight: Option<TextWeight>,
}

impl RowStyle {
    pub fn styled(style: ContainerStyle) -> Self {
        Self {
            style: Some(style),
            ..Default::default()
        }
    }
}

/// 创建一行，每个单元格一个可换行的 TextBlock
pub fn create_table_row(label: &str, total: &str, percentage: &str, row_style: RowStyle) -> TableRow {
    let cell = |text: &str| {
        let mut block = TextBlock::new(text).wrap();
        if row_style.is_subtle {
            block = block.subtle();
        }
        if let Some(weight) = row_style.weight {
            block = block.weight(weight);
        }
        TableCell {
            items: vec![CardElement::TextBlock(block)],
            style: row_style.style,
        }
    };

    TableRow {
        cells: vec![cell(label), cell(total), cell(percentage)],
    }
}

/// `count / total * 100` with one decimal. An empty run renders `0.0%`.
pub fn format_percentage(count: usize, summary: &RunSummary) -> String {
    match summary.percentage(count) {
        Some(pct) => format!("{:.1}%", pct),
        None => "0.0%".to_string(),
    }
}

fn bucket_style(outcome: TestOutcome) -> ContainerStyle {
    match outcome {
        TestOutcome::Passed => ContainerStyle::Good,
        TestOutcome::Flaky => ContainerStyle::Warning,
        TestOutcome::Failed => ContainerStyle::Attention,
        TestOutcome::Skipped => ContainerStyle::Accent,
    }
}

/// Table rows follow this order; empty buckets are left out.
const TABLE_ORDER: [TestOutcome; 4] = [
    TestOutcome::Passed,
    TestOutcome::Flaky,
    TestOutcome::Failed,
    TestOutcome::Skipped,
];

/// 根据汇总生成表格：表头 + 非零分类 + 合计
pub fn summary_table(summary: &RunSummary) -> Table {
    let mut rows = vec![create_table_row(
        "Type",
        "Total",
        "Percentage",
        RowStyle {
            weight: Some(TextWeight::Bolder),
            ..Default::default()
        },
    )];

    for outcome in TABLE_ORDER {
        let count = summary.count(outcome);
        if count == 0 {
            continue;
        }
        rows.push(create_table_row(
            &format!("{} {}", outcome.glyph(), outcome.label()),
            &count.to_string(),
            &format_percentage(count, summary),
            RowStyle::styled(bucket_style(outcome)),
        ));
    }

    rows.push(create_table_row(
        "Total tests",
        &summary.total.to_string(),
        &format_percentage(summary.total, summary),
        RowStyle {
            is_subtle: true,
            weight: Some(TextWeight::Bolder),
            ..Default::default()
        },
    ));

    Table {
        columns: vec![
            TableColumnDefinition { width: 2 },
            TableColumnDefinition { width: 1 },
            TableColumnDefinition { width: 1 },
        ],
        rows,
        first_row_as_header: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_texts(row: &TableRow) -> Vec<String> {
        row.cells
            .iter()
            .map(|c| c.items[0].as_text().unwrap().text.clone())
            .collect()
    }

    #[test]
    fn test_create_table_row_default() {
        let row = create_table_row("Type", "Total", "50%", RowStyle::default());
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "TableRow",
                "cells": [
                    {"type": "TableCell", "items": [{"type": "TextBlock", "text": "Type", "wrap": true}]},
                    {"type": "TableCell", "items": [{"type": "TextBlock", "text": "Total", "wrap": true}]},
                    {"type": "TableCell", "items": [{"type": "TextBlock", "text": "50%", "wrap": true}]}
                ]
            })
        );
    }

    #[test]
    fn test_create_table_row_custom_style() {
        let row = create_table_row("Type", "Total", "50%", RowStyle::styled(ContainerStyle::Attention));
        assert_eq!(row.cells[0].style, Some(ContainerStyle::Attention));
    }

    #[test]
    fn test_create_table_row_subtle_and_bold() {
        let row = create_table_row(
            "Type",
            "Total",
            "50%",
            RowStyle {
                is_subtle: true,
                weight: Some(TextWeight::Bolder),
                ..Default::default()
            },
        );
        for cell in &row.cells {
            let text = cell.items[0].as_text().unwrap();
            assert_eq!(text.is_subtle, Some(true));
            assert_eq!(text.weight, Some(TextWeight::Bolder));
        }
    }

    #[test]
    fn test_summary_table_skips_empty_buckets() {
        let table = summary_table(&RunSummary::new(8, 2, 0, 0));
        let rows: Vec<Vec<String>> = table.rows.iter().map(cell_texts).collect();
        assert_eq!(
            rows,
            vec![
                vec!["Type", "Total", "Percentage"],
                vec!["✅ Passed", "8", "80.0%"],
                vec!["❌ Failed", "2", "20.0%"],
                vec!["Total tests", "10", "100.0%"],
            ]
        );
    }

    #[test]
    fn test_summary_table_includes_flaky_when_present() {
        let table = summary_table(&RunSummary::new(3, 0, 0, 1));
        let labels: Vec<String> = table.rows.iter().map(|r| cell_texts(r)[0].clone()).collect();
        assert_eq!(labels, vec!["Type", "✅ Passed", "⚠️ Flaky", "Total tests"]);
        assert_eq!(cell_texts(&table.rows[2])[2], "33.3%");
    }

    #[test]
    fn test_percentage_empty_run() {
        let summary = RunSummary::new(0, 0, 0, 0);
        assert_eq!(format_percentage(0, &summary), "0.0%");

        let table = summary_table(&summary);
        let json = serde_json::to_string(&table).unwrap();
        assert!(!json.contains("NaN"));
        assert!(!json.contains("inf"));
        assert_eq!(cell_texts(table.rows.last().unwrap()), vec!["Total tests", "0", "0.0%"]);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        for (passed, failed, skipped) in [(1, 1, 1), (7, 2, 3), (999, 1, 0), (1, 5, 11), (2, 0, 1)] {
            let summary = RunSummary::new(passed, failed, skipped, 0);
            let sum: f64 = [passed, failed, skipped]
                .iter()
                .map(|&c| {
                    let text = format_percentage(c, &summary);
                    let value: f64 = text.trim_end_matches('%').parse().unwrap();
                    let exact = c as f64 / summary.total as f64 * 100.0;
                    assert!((value - exact).abs() <= 0.05 + f64::EPSILON);
                    value
                })
                .sum();
            assert!((sum - 100.0).abs() <= 0.15, "sum was {}", sum);
        }
    }
}
