use crate::cli::ConfigArgs;
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::{ConfigOutput, ConfigRow};
use anyhow::Result;

pub fn execute(args: ConfigArgs, output: &OutputWriter) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let values: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
        .collect();

    if output.is_json() {
        output.result(ConfigOutput {
            config_file: args.config.as_ref().map(|p| p.display().to_string()),
            values,
        })?;
    } else {
        output.section("Configuration Values");
        if let Some(path) = &args.config {
            output.kv("Config file", path.display());
        }
        output.table(&values)?;
    }

    Ok(())
}
