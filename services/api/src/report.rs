use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use mentor_kpi::error::AppError;
use mentor_kpi::workflows::kpi::{
    Center, DistributionReport, KpiType, MentorDetailSummary, MentorId, MentorProfileView,
};

use crate::infra::{parse_center, parse_kpi_type, snapshot_service};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// Snapshot JSON holding the `mentors` and `kpiSubmissions` collections
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Rubric to chart (Intellect or Cultural)
    #[arg(long, value_parser = parse_kpi_type, default_value = "Intellect")]
    pub(crate) kpi_type: KpiType,
    /// Restrict the chart to one center
    #[arg(long, value_parser = parse_center)]
    pub(crate) center: Option<Center>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct MentorArgs {
    /// Snapshot JSON holding the `mentors` and `kpiSubmissions` collections
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Mentor document id
    #[arg(long)]
    pub(crate) mentor_id: String,
    /// Print the profile as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let service = snapshot_service(&args.snapshot)?;
    let report = service.distribution(args.kpi_type, args.center)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_distribution(&report, args.format, Utc::now(), &mut out)
}

pub(crate) fn run_mentor_detail(args: MentorArgs) -> Result<(), AppError> {
    let service = snapshot_service(&args.snapshot)?;
    let profile = service.mentor_profile(&MentorId(args.mentor_id))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        write_json(&profile, &mut out)
    } else {
        render_profile(&profile, &mut out)
    }
}

pub(crate) fn render_distribution<W: Write>(
    report: &DistributionReport,
    format: OutputFormat,
    generated_at: DateTime<Utc>,
    out: &mut W,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Csv => Ok(report.write_csv(out)?),
        OutputFormat::Json => write_json(&report.view(), out),
        OutputFormat::Text => render_distribution_text(report, generated_at, out),
    }
}

fn render_distribution_text<W: Write>(
    report: &DistributionReport,
    generated_at: DateTime<Utc>,
    out: &mut W,
) -> Result<(), AppError> {
    let scope = report
        .center
        .map_or_else(|| "all centers".to_string(), |center| center.to_string());
    writeln!(out, "{} KPI distribution ({scope})", report.kpi_type.label())?;
    writeln!(out, "Generated {}", generated_at.format("%Y-%m-%d %H:%M UTC"))?;

    if report.is_empty() {
        writeln!(out, "\nNo data for current filters")?;
        return Ok(());
    }

    let shares = report.shares();
    for (bucket, (_, share)) in report.buckets.iter().zip(shares) {
        writeln!(
            out,
            "\n{}: {} mentor(s), {:.0}%",
            bucket.category_label,
            bucket.count,
            share * 100.0
        )?;
        for member in &bucket.members {
            writeln!(out, "- {member}")?;
        }
    }

    writeln!(out, "\nCharted mentors: {}", report.charted_mentors())?;
    Ok(())
}

fn render_profile<W: Write>(profile: &MentorProfileView, out: &mut W) -> Result<(), AppError> {
    writeln!(
        out,
        "{} ({}, {})",
        profile.mentor.name, profile.mentor.id, profile.mentor.center
    )?;
    render_summary(&profile.intellect, out)?;
    render_summary(&profile.cultural, out)?;
    Ok(())
}

fn render_summary<W: Write>(summary: &MentorDetailSummary, out: &mut W) -> Result<(), AppError> {
    writeln!(out, "\n{} KPI", summary.kpi_type.label())?;
    if summary.total_responses == 0 {
        writeln!(out, "No submissions yet")?;
        return Ok(());
    }

    writeln!(
        out,
        "Average score: {:.2} ({})",
        summary.avg_score,
        summary.scale_label
    )?;
    writeln!(out, "Total responses: {}", summary.total_responses)?;

    if summary.notes.is_empty() {
        writeln!(out, "Recent notes: none")?;
    } else {
        writeln!(out, "Recent notes")?;
        for note in &summary.notes {
            writeln!(out, "- {note}")?;
        }
    }
    Ok(())
}

fn write_json<T: serde::Serialize, W: Write>(value: &T, out: &mut W) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
