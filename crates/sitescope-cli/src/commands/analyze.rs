use crate::cli::AnalyzeArgs;
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::{AnalyzeOutput, ClassCountRow, PreviewRow};
use anyhow::{bail, Context, Result};
use sitescope_analysis::process;
use sitescope_core::config::CliConfigOverrides;
use sitescope_core::models::ThresholdOverrides;
use sitescope_core::table_io::{read_csv, write_csv};
use std::fs::File;
use std::io::{BufReader, BufWriter};

pub fn execute(args: AnalyzeArgs, output: &OutputWriter) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    config.update_from_cli(CliConfigOverrides {
        radius_km: args.radius_km,
        threshold_m: args.threshold_m,
        mode: args.mode,
        thresholds: ThresholdOverrides {
            rural: args.rural,
            suburban: args.suburban,
            urban: args.urban,
        },
    });
    let params = config.pipeline_params();

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let raw = read_csv(BufReader::new(file))
        .with_context(|| format!("Failed to read CSV {}", args.input.display()))?;

    tracing::info!(input = %args.input.display(), rows = raw.len(), "Loaded site table");

    let result = process(&raw, &params)?;

    if result.is_empty() {
        for message in &result.messages {
            output.warning(message);
        }
        bail!("No valid rows after processing. Check CSV format and data quality.");
    }

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_csv(&result.table, BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let summary = result.table.summary();
    let preview: Vec<PreviewRow> =
        result.table.iter().take(args.preview).map(PreviewRow::from).collect();

    if output.is_json() {
        output.result(AnalyzeOutput {
            input: args.input.display().to_string(),
            output: args.output.as_ref().map(|p| p.display().to_string()),
            params,
            summary,
            total_rows: result.table.len(),
            messages: result.messages,
            preview,
        })?;
    } else {
        output.section("Messages");
        for message in &result.messages {
            output.info(message);
        }

        output.section("Parameters");
        output.kv("Radius", format!("{} km", params.radius_km));
        output.kv("Co-location threshold", format!("{} m", params.threshold_m));
        output.kv("Mode", params.mode);

        output.section("Area Classes");
        output.table(&ClassCountRow::from_summary(&summary))?;

        if !preview.is_empty() {
            output.section(format!("Preview ({} of {} rows)", preview.len(), result.table.len()));
            output.table(&preview)?;
        }

        if let Some(path) = &args.output {
            output.success(format!("Wrote {} rows to {}", result.table.len(), path.display()));
        }
    }

    Ok(())
}
