use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::bail;
use colored::*;
use tracing::{Instrument, warn};

use crate::mprint;
use crate::terminal::print::GLOBAL_KEY_WIDTH;
use crate::terminal::{colors, print, spinner, table::Table};
use exposr_common::config::Config;
use exposr_common::finding::Finding;
use exposr_common::resource::ResourceKind;
use exposr_core::auditor::ExposureAuditor;
use exposr_core::aws::{self, AwsClients, AwsInventory, CallerIdentity, Ec2SecurityGroups};
use exposr_core::report::{ExposureReport, KindReport, KindStatus};

/// Exit status when the report is incomplete.
const INCOMPLETE: u8 = 2;

pub async fn audit(cfg: &Config) -> anyhow::Result<ExitCode> {
    let sdk_config = aws::load_sdk_config(cfg).await;
    let Some(region) = sdk_config.region() else {
        bail!("no region configured: pass --region or set AWS_REGION");
    };
    print::header(&format!("auditing {region}"), cfg.quiet);

    let clients = AwsClients::from_conf(&sdk_config);
    if cfg.quiet == 0 {
        if let Some(identity) = aws::caller_identity(&clients).await {
            print_identity(&identity);
        }
    }

    let span = spinner::audit_span();
    let progress_span = span.clone();

    let auditor = ExposureAuditor::new(
        Box::new(AwsInventory::new(clients.clone())),
        Box::new(Ec2SecurityGroups::new(clients.ec2)),
        cfg,
    )
    .with_progress(Box::new(move |kind, settled, total| {
        spinner::report_progress(&progress_span, kind, settled, total);
    }));

    let start_time = Instant::now();
    let report = auditor.run().instrument(span).await?;

    render(&report, start_time.elapsed(), cfg);

    if report.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(INCOMPLETE))
    }
}

fn print_identity(identity: &CallerIdentity) {
    GLOBAL_KEY_WIDTH.set("Account".len());
    print::aligned_line("Account", identity.account.as_str().color(colors::ADDRESS));
    print::aligned_line("User", identity.arn.as_str().color(colors::TEXT_DEFAULT));
}

fn section_title(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::ComputeInstance => "Open Inbound Instance Routes",
        ResourceKind::ApplicationLoadBalancer => "Public ALBs (and NLBs)",
        ResourceKind::LegacyLoadBalancer => "Public ELBs",
        ResourceKind::ManagedDatabase => "Public RDS Instances",
    }
}

fn render(report: &ExposureReport, total_time: Duration, cfg: &Config) {
    if let Some(instances) = report.section(ResourceKind::ComputeInstance) {
        if instances.inventory_error.is_none() {
            print_public_instances(instances, cfg);
        }
    }

    for section in &report.sections {
        print_section(section, cfg);
    }

    print_summary(report, total_time, cfg);
}

fn print_public_instances(section: &KindReport, cfg: &Config) {
    print::header("Instances With Public IPs", cfg.quiet);
    if cfg.quiet > 1 {
        return;
    }

    let mut table = Table::new(vec![colors::PRIMARY, colors::TEXT_DEFAULT, colors::ADDRESS]);
    for resource in &section.resources {
        table.push(vec![resource.name.clone(), resource.id.clone(), resource.address.clone()]);
    }

    if table.is_empty() {
        print::print_status("No running instance has a public address");
    } else {
        table.print();
    }
}

/// What a section says on top of its findings table.
#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    Clear,
    Unknown(String),
}

fn section_verdict(section: &KindReport) -> Option<Verdict> {
    match section.status() {
        KindStatus::Exposed => None,
        KindStatus::NoExposure => Some(Verdict::Clear),
        KindStatus::Indeterminate => Some(Verdict::Unknown(format!(
            "Exposure unknown for {} of {} {}",
            section.failures.len(),
            section.resources.len(),
            section.kind
        ))),
        KindStatus::Unavailable => Some(Verdict::Unknown(match &section.inventory_error {
            Some(err) => format!("Exposure unknown, {err}"),
            None => format!("Exposure unknown, {} unavailable", section.kind),
        })),
    }
}

fn print_section(section: &KindReport, cfg: &Config) {
    if cfg.quiet == 0 {
        mprint!();
    }
    print::header(section_title(section.kind), cfg.quiet);

    match section_verdict(section) {
        Some(Verdict::Clear) if cfg.quiet < 2 => print::no_exposure(),
        Some(Verdict::Unknown(reason)) => print::problem(reason),
        _ => {}
    }

    if !section.findings.is_empty() {
        findings_table(&section.findings).print();
    }

    for failure in &section.failures {
        print::problem(format!(
            "{} ({}): {}",
            failure.resource.name, failure.resource.id, failure.error
        ));
    }

    for malformed in &section.malformed {
        print::problem(format!(
            "Ignored malformed range '{}' in {}",
            malformed.raw(),
            malformed.rule_set_id
        ));
    }
}

fn findings_table(findings: &[Finding]) -> Table {
    let mut table = Table::new(vec![
        colors::PRIMARY,
        colors::ADDRESS,
        colors::PORT,
        colors::CIDR,
        colors::TEXT_DEFAULT,
    ]);
    for finding in findings {
        table.push(vec![
            finding.resource.name.clone(),
            finding.resource.address.clone(),
            finding.rule.port_range.to_string(),
            finding.rule.source.to_string(),
            finding.rule.description().to_string(),
        ]);
    }
    table
}

fn headline(report: &ExposureReport) -> &'static str {
    if report.is_partial() {
        "Audit Partial"
    } else if !report.is_complete() {
        "Audit Incomplete"
    } else {
        "Audit Complete"
    }
}

fn print_summary(report: &ExposureReport, total_time: Duration, cfg: &Config) {
    let routes: String = format!("{} public routes", report.total_findings());
    let routes: ColoredString = match (report.total_findings(), report.is_complete()) {
        (0, true) => routes.bold().green(),
        (0, false) => routes.bold(),
        _ => routes.bold().red(),
    };
    let resources: ColoredString = format!("{} reachable resources", report.total_resources()).bold();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!(
        "{}: {routes} across {resources} in {total_time}",
        headline(report)
    );

    if cfg.quiet == 0 {
        print::fat_separator();
        print::centerln(&output);
    }

    if report.is_partial() {
        warn!("Run deadline expired before every resource was evaluated, the report is partial");
    } else if !report.is_complete() {
        warn!(
            failures = report.failures().count(),
            "Exposure could not be determined for every resource"
        );
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
