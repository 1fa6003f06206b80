//! pdfcheck CLI - validate form fields and text in decoded document trees

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use pdfcheck::{JsonFormat, PageSpec, ProcessOptions, ProcessReport};

#[derive(Parser)]
#[command(name = "pdfcheck")]
#[command(version)]
#[command(about = "Validate form fields and text in decoded PDF document trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a document tree and optionally validate expected values
    Check {
        /// Input document tree (JSON produced by the external decoder)
        #[arg(value_name = "TREE")]
        input: PathBuf,

        /// Page spec: an integer N (first N pages) or tokens like "1,2,4-6"
        #[arg(long, value_name = "SPEC")]
        pages: Option<String>,

        /// JSON file with expected values, e.g. [{"Family_Name_Text_Box":"Solomon"}]
        #[arg(long, value_name = "FILE")]
        expect: Option<PathBuf>,

        /// Write the baseline (actual values) JSON to this file
        #[arg(long, value_name = "FILE")]
        baseline: Option<PathBuf>,

        /// Write the full report JSON to this file (stdout if "-")
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the reconstructed text lines of a document tree
    Lines {
        /// Input document tree
        #[arg(value_name = "TREE")]
        input: PathBuf,

        /// Page spec: an integer N (first N pages) or tokens like "1,2,4-6"
        #[arg(long, value_name = "SPEC")]
        pages: Option<String>,
    },

    /// Show fragment counts for a document tree
    Info {
        /// Input document tree
        #[arg(value_name = "TREE")]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            input,
            pages,
            expect,
            baseline,
            output,
            compact,
        } => run_check(input, pages, expect, baseline, output, compact),
        Commands::Lines { input, pages } => run_lines(input, pages),
        Commands::Info { input } => run_info(input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn build_options(pages: Option<String>) -> ProcessOptions {
    let mut options = ProcessOptions::new();
    if let Some(spec) = pages {
        let parsed = PageSpec::parse(&spec);
        log::debug!("page spec {spec:?} parsed as {parsed:?}");
        options = options.with_pages(parsed);
    }
    options
}

fn run_check(
    input: PathBuf,
    pages: Option<String>,
    expect: Option<PathBuf>,
    baseline: Option<PathBuf>,
    output: Option<PathBuf>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = build_options(pages);

    let expectation_count;
    if let Some(expect_path) = expect {
        let data = fs::read_to_string(&expect_path)?;
        let json: serde_json::Value = serde_json::from_str(&data)?;
        options = options.with_expectations_json(&json);
        expectation_count = options.expectations.len();
        log::debug!(
            "loaded {} expectation(s) from {}",
            expectation_count,
            expect_path.display()
        );
    } else {
        expectation_count = 0;
    }

    let report = pdfcheck::process_file_with_options(&input, &options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    if let Some(baseline_path) = baseline {
        fs::write(&baseline_path, report.baseline_json(format)?)?;
        println!(
            "{} baseline written to {}",
            "ok:".green().bold(),
            baseline_path.display()
        );
    }

    if let Some(output_path) = output {
        let json = report.to_json(format)?;
        if output_path.to_str() == Some("-") {
            println!("{json}");
        } else {
            fs::write(&output_path, json)?;
            println!(
                "{} report written to {}",
                "ok:".green().bold(),
                output_path.display()
            );
        }
    }

    print_summary(&report);
    if expectation_count > 0 {
        println!(
            "{} {} expected value(s) validated",
            "pass:".green().bold(),
            expectation_count
        );
    }

    Ok(())
}

fn run_lines(input: PathBuf, pages: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(pages);
    let report = pdfcheck::process_file_with_options(&input, &options)?;

    for (number, line) in &report.lines {
        if !line.is_empty() {
            println!("{:>5}  {}", number.to_string().dimmed(), line);
        }
    }
    Ok(())
}

fn run_info(input: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let report = pdfcheck::process_file(&input)?;
    print_summary(&report);

    for (index, fields) in report.fields.iter().enumerate() {
        for field in fields {
            let label = field
                .label
                .as_ref()
                .map(|l| l.value.as_str())
                .unwrap_or("-");
            println!(
                "  page group {}: {} [{}] = {}",
                index,
                field.id.cyan(),
                label,
                field.value
            );
        }
    }
    Ok(())
}

fn print_summary(report: &ProcessReport) {
    println!(
        "{} {} page(s), {} text(s), {} field(s), {} line(s)",
        "processed:".bold(),
        report.stats.page_count,
        report.stats.text_count,
        report.stats.field_count,
        report.stats.line_count
    );
}
