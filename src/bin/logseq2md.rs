//! logseq2md - Convert Logseq outline notes to flat standard Markdown
//!
//! Usage:
//!   logseq2md -f page.md -o flat.md
//!   logseq2md -f journal.md --tag work
//!   logseq2md -d ./pages -o ./export --pattern '*.md'
//!   cat page.md | logseq2md > flat.md

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser as ClapParser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use logseq2md::converter::{
    ConversionReport, ConvertOptions, LogseqConverter, TabPolicy,
};

#[derive(ValueEnum, Clone, Debug)]
enum ReportFormat {
    /// JSON format
    Json,
    /// Human-readable text
    Text,
}

#[derive(ClapParser)]
#[command(
    version,
    about = "Convert Logseq outline notes to standard Markdown",
    long_about = "Flattens Logseq's block-indented Markdown dialect into standard Markdown:\n\
                  outline depth becomes heading level, block properties are stripped and\n\
                  collapsed blocks are elided.\n\n\
                  If no input file is specified, reads from stdin.\n\
                  If no output file is specified, writes to stdout."
)]
struct Cli {
    /// Input Logseq file (reads from stdin if not specified)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output markdown file (writes to stdout if not specified)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Extract content starting at the first occurrence of this tag
    /// instead of converting to headings
    #[arg(short, long, value_name = "TAG")]
    tag: Option<String>,

    /// Expand tabs to this many spaces before measuring indentation
    /// (default: one tab counts as one indentation level)
    #[arg(long, value_name = "N")]
    tab_width: Option<usize>,

    /// Batch convert directory
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// File pattern for batch conversion
    #[arg(long, default_value = "*.md")]
    pattern: String,

    /// Generate conversion report
    #[arg(long, value_name = "REPORT_FILE")]
    report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    report_format: ReportFormat,

    /// Dry run (show what would be converted without writing)
    #[arg(long)]
    dry_run: bool,

    /// debug log file
    #[arg(long, value_name = "FILE")]
    debuglogfile: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn init_logger(filter_level: log::LevelFilter, logfile: Option<PathBuf>) {
    let mut loggers = Vec::new();
    if let Some(filename) = logfile {
        loggers.push(simplelog::WriteLogger::new(
            filter_level,
            simplelog::Config::default(),
            fs::File::create(filename).unwrap(),
        ) as Box<dyn simplelog::SharedLogger>)
    }
    simplelog::CombinedLogger::init(loggers).unwrap();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    init_logger(args.verbose.log_level_filter(), args.debuglogfile.clone());

    let mut options = ConvertOptions::new();
    if let Some(width) = args.tab_width {
        options = options.with_tab_policy(TabPolicy::Width(width));
    }
    let converter = LogseqConverter::new(options);

    // Handle batch conversion
    if let Some(ref dir) = args.directory {
        return batch_convert(&converter, dir, &args);
    }

    // Single file conversion
    let (input_content, input_name) = match &args.file {
        Some(path) => (fs::read_to_string(path)?, path.display().to_string()),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            (buffer, "stdin".to_string())
        }
    };

    let output_name = args
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());

    // Tag extraction mode bypasses heading conversion entirely
    if let Some(ref tag) = args.tag {
        let extracted = converter.extract_by_tag(&input_content, tag);
        if extracted.is_empty() {
            log::warn!("tag #{} does not occur in {}", tag, input_name);
            eprintln!("⚠ tag #{} does not occur in {}", tag, input_name);
        }
        write_output(&extracted, args.output.as_deref())?;
        return Ok(());
    }

    let result = converter.convert(&input_content, &input_name, &output_name);

    // Show warnings if verbose
    if args.verbose.log_level().is_some() && !result.report.warnings.is_empty() {
        for warning in &result.report.warnings {
            eprintln!("⚠ {}", warning);
        }
    }

    // Dry run - just show report
    if args.dry_run {
        eprintln!("{}", result.report.to_text());
        return Ok(());
    }

    write_output(&result.markdown, args.output.as_deref())?;

    if let Some(path) = &args.output {
        eprintln!(
            "✓ Converted {} to {} ({} headings, {} collapsed blocks elided)",
            input_name,
            path.display(),
            result.report.statistics.heading_lines,
            result.report.statistics.collapsed_blocks
        );
    }

    // Write report if requested
    if let Some(report_path) = args.report {
        write_report(&result.report, &report_path, &args.report_format)?;
        eprintln!("✓ Report written to {}", report_path.display());
    }

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> io::Result<()> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(fs::File::create(path)?);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn write_report(
    report: &ConversionReport,
    path: &Path,
    format: &ReportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = match format {
        ReportFormat::Json => report.to_json()?,
        ReportFormat::Text => report.to_text(),
    };
    fs::write(path, content)?;
    Ok(())
}

fn batch_convert(
    converter: &LogseqConverter,
    dir: &Path,
    args: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = args
        .output
        .as_ref()
        .ok_or("Output directory required for batch conversion")?;

    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
    }

    let start_time = Instant::now();
    let mut total_files = 0;
    let mut succeeded = 0;
    let mut failed = 0;
    let mut total_warnings = 0;
    let mut all_reports = Vec::new();

    // Find all matching files
    let pattern = format!("{}/{}", dir.display(), args.pattern);
    let entries: Vec<_> = glob::glob(&pattern)
        .map_err(|e| format!("Invalid pattern: {}", e))?
        .filter_map(|e| e.ok())
        .collect();

    for entry in entries {
        total_files += 1;

        let input_path = entry.clone();
        let relative = entry.strip_prefix(dir).unwrap_or(&entry);
        let output_path = output_dir.join(relative);

        // Create parent directories if needed
        if let Some(parent) = output_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        log::info!(
            "converting {} -> {}",
            input_path.display(),
            output_path.display()
        );

        let input_content = match fs::read_to_string(&input_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("✗ Failed to read {}: {}", input_path.display(), e);
                failed += 1;
                continue;
            }
        };

        let result = converter.convert(
            &input_content,
            &input_path.display().to_string(),
            &output_path.display().to_string(),
        );

        total_warnings += result.report.warnings.len();

        if !args.dry_run {
            if let Err(e) = fs::write(&output_path, &result.markdown) {
                eprintln!("✗ Failed to write {}: {}", output_path.display(), e);
                failed += 1;
                continue;
            }
        }

        if args.verbose.log_level().is_some() && !result.report.warnings.is_empty() {
            for warning in &result.report.warnings {
                eprintln!("  ⚠ {}", warning);
            }
        }

        all_reports.push(result.report);
        succeeded += 1;
    }

    let duration = start_time.elapsed();

    eprintln!("\nBatch Conversion Summary");
    eprintln!("========================");
    eprintln!("Files processed: {}", total_files);
    eprintln!("Succeeded:       {}", succeeded);
    eprintln!("Failed:          {}", failed);
    eprintln!("Total warnings:  {}", total_warnings);
    eprintln!("Duration:        {:?}", duration);

    if args.dry_run {
        eprintln!("\n(Dry run - no files were written)");
    }

    // Write batch report if requested
    if let Some(report_path) = &args.report {
        let batch_report =
            create_batch_report(dir, output_dir, &all_reports, duration.as_millis() as u64);

        let report_content = match args.report_format {
            ReportFormat::Json => serde_json::to_string_pretty(&batch_report)?,
            ReportFormat::Text => format_batch_report_text(&batch_report),
        };

        fs::write(report_path, report_content)?;
        eprintln!("✓ Report written to {}", report_path.display());
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct BatchReport {
    input_directory: String,
    output_directory: String,
    files_processed: usize,
    total_warnings: usize,
    duration_ms: u64,
    files: Vec<FileReport>,
}

#[derive(serde::Serialize)]
struct FileReport {
    input: String,
    output: String,
    headings: usize,
    collapsed_blocks: usize,
    warnings: usize,
}

fn create_batch_report(
    input_dir: &Path,
    output_dir: &Path,
    reports: &[ConversionReport],
    duration_ms: u64,
) -> BatchReport {
    let files: Vec<FileReport> = reports
        .iter()
        .map(|r| FileReport {
            input: r.input_file.clone(),
            output: r.output_file.clone(),
            headings: r.statistics.heading_lines,
            collapsed_blocks: r.statistics.collapsed_blocks,
            warnings: r.warnings.len(),
        })
        .collect();

    let total_warnings: usize = reports.iter().map(|r| r.warnings.len()).sum();

    BatchReport {
        input_directory: input_dir.display().to_string(),
        output_directory: output_dir.display().to_string(),
        files_processed: reports.len(),
        total_warnings,
        duration_ms,
        files,
    }
}

fn format_batch_report_text(report: &BatchReport) -> String {
    let mut output = String::new();

    output.push_str("Batch Conversion Report\n");
    output.push_str("=======================\n");
    output.push_str(&format!("Input directory:  {}\n", report.input_directory));
    output.push_str(&format!("Output directory: {}\n", report.output_directory));
    output.push_str(&format!("Duration:         {}ms\n\n", report.duration_ms));

    output.push_str("Files\n");
    output.push_str("-----\n");
    for file in &report.files {
        let status_icon = if file.warnings == 0 { "✓" } else { "⚠" };
        output.push_str(&format!(
            "{} {} -> {} ({} headings, {} warnings)\n",
            status_icon, file.input, file.output, file.headings, file.warnings
        ));
    }

    output
}
