// src/report.rs
//! Turning outcomes into notification text.

use crate::config::consts::SUMMARY_TITLE;
use crate::engine::types::{Outcome, OutcomeStatus};

pub fn status_label(s: OutcomeStatus) -> &'static str {
    match s {
        OutcomeStatus::Success => "✅ 成功",
        OutcomeStatus::AuthInvalid => "🍪 Cookie失效",
        OutcomeStatus::ServerError => "⚠️ 服务器异常",
        OutcomeStatus::Unknown => "❓ 未知",
        OutcomeStatus::ExhaustedRetries => "❌ 失败",
        OutcomeStatus::Skipped => "🟡 跳过",
    }
}

/// `"<site> 签到成功"` / `"<site> 签到跳过"` / `"<site> 签到失败"`.
pub fn site_title(o: &Outcome) -> String {
    let verdict = match o.status {
        OutcomeStatus::Success => "签到成功",
        OutcomeStatus::Skipped => "签到跳过",
        _ => "签到失败",
    };
    format!("{} {}", o.site, verdict)
}

pub fn summary_title() -> &'static str {
    SUMMARY_TITLE
}

/// Table cells are single-line; pipes would break the row.
fn cell(s: &str) -> String {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

/// Markdown table, one row per site, in run order.
pub fn markdown_table(outcomes: &[Outcome]) -> String {
    let mut out = s!("| 站点 | 状态 | 详情 |\n| :--- | :--- | :--- |\n");
    for o in outcomes {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            cell(&o.site),
            status_label(o.status),
            cell(&o.message)
        ));
    }
    out
}

/// One line per site for the terminal.
pub fn plain_lines(outcomes: &[Outcome]) -> Vec<String> {
    outcomes
        .iter()
        .map(|o| {
            let value = o.value.as_deref().map(|v| format!(" value={v}")).unwrap_or_default();
            format!("{:<10} {:<18} attempts={}{}", o.site, o.status.to_string(), o.attempts, value)
        })
        .collect()
}
