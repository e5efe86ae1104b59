use std::io::{self, Write};
use std::path::PathBuf;

use touki::{
    BatchEvent, BatchOptions, BatchProgress, ExtractOptions, FileOutcome,
    process_batch_with_progress,
};

use crate::cli::RecordsFormat;
use crate::shared::{ProgressReporter, csv_escape, to_json_line};

pub fn run(
    files: &[PathBuf],
    format: &RecordsFormat,
    jobs: Option<usize>,
    max_file_size: Option<usize>,
) -> Result<(), i32> {
    let mut options = BatchOptions {
        extract: ExtractOptions {
            max_input_bytes: max_file_size,
            ..ExtractOptions::default()
        },
        ..BatchOptions::default()
    };
    if let Some(jobs) = jobs {
        options.max_concurrency = jobs.max(1);
    }

    let total = files.len();
    tracing::info!(files = total, jobs = options.max_concurrency, "processing batch");
    let progress = ProgressReporter::new("file", total);
    let outcomes = process_batch_with_progress(files.to_vec(), &options, |p| match format {
        RecordsFormat::Ndjson => emit_events(&p),
        _ => progress.report(p.current),
    });
    progress.finish();

    match format {
        RecordsFormat::Text => write_text(&outcomes),
        RecordsFormat::Csv => write_csv(&outcomes),
        RecordsFormat::Json => write_json(&outcomes)?,
        RecordsFormat::Ndjson => {}
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        tracing::warn!(failed, total, "some files could not be processed");
    }
    if total > 0 && failed == total {
        return Err(1);
    }
    Ok(())
}

/// Print the progress event and the result or error event of one file.
///
/// Stdout stays locked for both lines so events of concurrent workers
/// never interleave.
fn emit_events(progress: &BatchProgress<'_>) {
    let mut out = io::stdout().lock();
    if let Err(e) = write_events(&mut out, progress) {
        tracing::error!(error = %e, "failed to write batch events");
    }
}

fn write_events(out: &mut impl Write, progress: &BatchProgress<'_>) -> io::Result<()> {
    for event in [
        BatchEvent::progress(progress),
        BatchEvent::from_outcome(progress.outcome),
    ] {
        match event.to_json_line() {
            Ok(line) => writeln!(out, "{line}")?,
            Err(e) => tracing::error!(error = %e, "failed to serialize batch event"),
        }
    }
    out.flush()
}

fn write_text(outcomes: &[FileOutcome]) {
    println!("file\trecord_date\tproperty_address\towner_name\towner_address");
    for outcome in outcomes {
        match &outcome.result {
            Ok(records) => {
                for r in records {
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        outcome.name, r.record_date, r.property_address, r.owner_name, r.owner_address
                    );
                }
            }
            Err(e) => eprintln!("Error: {}: {e}", outcome.name),
        }
    }
}

fn write_csv(outcomes: &[FileOutcome]) {
    println!("file,record_date,property_address,owner_name,owner_address");
    for outcome in outcomes {
        match &outcome.result {
            Ok(records) => {
                for r in records {
                    println!(
                        "{},{},{},{},{}",
                        csv_escape(&outcome.name),
                        csv_escape(&r.record_date),
                        csv_escape(&r.property_address),
                        csv_escape(&r.owner_name),
                        csv_escape(&r.owner_address)
                    );
                }
            }
            Err(e) => eprintln!("Error: {}: {e}", outcome.name),
        }
    }
}

fn write_json(outcomes: &[FileOutcome]) -> Result<(), i32> {
    let files: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(records) => serde_json::json!({
                "file": outcome.name,
                "size": outcome.size,
                "records": records,
            }),
            Err(e) => serde_json::json!({
                "file": outcome.name,
                "size": outcome.size,
                "error": e.to_string(),
            }),
        })
        .collect();
    println!("{}", to_json_line(&serde_json::Value::Array(files))?);
    Ok(())
}
