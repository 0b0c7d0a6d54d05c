use colored::*;
use exposr_common::resource::ResourceKind;
use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Span carrying the audit spinner. The spinner lives as long as the span is entered.
pub fn audit_span() -> Span {
    let span = info_span!("audit");
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS);
    span.pb_set_style(&style);
    span.pb_set_message("Collecting inventory...");
    span
}

pub fn report_progress(span: &Span, kind: ResourceKind, settled: usize, total: usize) {
    span.pb_set_message(&format!(
        "Evaluated {} of {} {}...",
        settled.to_string().green().bold(),
        total,
        kind
    ));
}
