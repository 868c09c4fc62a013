use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use regcond::merge::paints_anything;
use regcond::node::{InputKind, registry};
use regcond::slots::slot_name;
use regcond::{merge_fingerprint, merge_regions};
use regcond_core::logging::{LogFormat, init_subscriber};

use crate::document::GraphDocument;
use crate::error::{CliError, Result};
use crate::report::MergeReport;

#[derive(Debug, Parser)]
#[command(
    name = "regcond",
    about = "Validate, fingerprint, and merge region conditioning graph documents",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge the document's regions and print a report.
    Merge(MergeArgs),

    /// Check the document against the node input bounds.
    Validate(InputArgs),

    /// Print the registered graph nodes.
    #[command(name = "list-nodes")]
    ListNodes(ListNodesArgs),

    /// Print the merge fingerprint of the document.
    Fingerprint(InputArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Graph document to read.
    #[arg(long, short)]
    pub input: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct MergeArgs {
    /// Graph document to read.
    #[arg(long, short)]
    pub input: PathBuf,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON report to this path.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ListNodesArgs {
    /// Print the registry as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Parse arguments without letting clap exit on bad input.
///
/// `--help` and `--version` still print and exit through clap; every other
/// parse failure becomes [`CliError::Usage`].
pub fn parse_args<I, T>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(error) if !error.use_stderr() => error.exit(),
        Err(error) => Err(CliError::Usage {
            message: error.to_string().trim_end().to_owned(),
        }),
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = parse_args(std::env::args_os())?;
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_subscriber(format).map_err(|error| CliError::Logging {
        message: error.to_string(),
    })?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Merge(args) => run_merge(&args, out),
        Commands::Validate(args) => run_validate(&args, out),
        Commands::ListNodes(args) => run_list_nodes(&args, out),
        Commands::Fingerprint(args) => run_fingerprint(&args, out),
    }
}

fn run_merge(args: &MergeArgs, out: &mut dyn Write) -> Result<()> {
    let document = GraphDocument::load(&args.input)?;
    let (canvas, slots) = document.build()?;

    for (i, region) in slots.iter().enumerate() {
        if let Some(region) = region
            && !paints_anything(canvas, &region.geometry)
        {
            tracing::warn!(
                slot = %slot_name(i + 1),
                mode = region.geometry.mode(),
                "region lies outside the canvas; its masks stay empty"
            );
        }
    }

    let merged = merge_regions(canvas, &slots);
    let fingerprint = merge_fingerprint(canvas, &slots)?;
    let report = MergeReport::new(canvas, &slots, &merged, fingerprint);

    tracing::info!(
        input = %args.input.display(),
        entries = report.entries.len(),
        fingerprint = %report.fingerprint,
        "merged graph document"
    );

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
    }

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", report.to_text())?;
    }
    Ok(())
}

fn run_validate(args: &InputArgs, out: &mut dyn Write) -> Result<()> {
    let document = GraphDocument::load(&args.input)?;
    document.validate()?;
    let canvas = document.canvas();
    let connected = document.regions.iter().filter(|r| r.is_some()).count();
    writeln!(
        out,
        "ok: {connected} connected region(s) on a {}x{} canvas",
        canvas.width, canvas.height
    )?;
    Ok(())
}

fn run_list_nodes(args: &ListNodesArgs, out: &mut dyn Write) -> Result<()> {
    let nodes = registry();
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &nodes)?;
        writeln!(out)?;
        return Ok(());
    }

    for node in &nodes {
        writeln!(
            out,
            "{} ({}) [{}] -> {}",
            node.type_name, node.display_name, node.category, node.output_type
        )?;
        for input in node.inputs {
            match input.kind {
                InputKind::Conditioning => writeln!(out, "    {}: CONDITIONING", input.name)?,
                InputKind::Int { default, min, max } => writeln!(
                    out,
                    "    {}: INT default={default} range=[{min}, {max}]",
                    input.name
                )?,
                InputKind::Float {
                    default,
                    min,
                    max,
                    step,
                } => writeln!(
                    out,
                    "    {}: FLOAT default={default} range=[{min}, {max}] step={step}",
                    input.name
                )?,
            }
        }
    }
    Ok(())
}

fn run_fingerprint(args: &InputArgs, out: &mut dyn Write) -> Result<()> {
    let document = GraphDocument::load(&args.input)?;
    let (canvas, slots) = document.build()?;
    writeln!(out, "{}", merge_fingerprint(canvas, &slots)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn run_to_string(command: Commands) -> Result<String> {
        let mut out = Vec::new();
        run(
            Cli {
                log_json: false,
                command,
            },
            &mut out,
        )?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn list_nodes_prints_every_node() {
        let text = run_to_string(Commands::ListNodes(ListNodesArgs { json: false }))
            .expect("list-nodes");
        assert!(text.contains("RegionConditionSpecPct (Region Condition Spec (Percentage))"));
        assert!(text.contains("RegionConditionSpecPx"));
        assert!(text.contains("RegionConditionMerge"));
        assert!(text.contains("width: INT default=512 range=[64, 8192]"));
    }

    #[test]
    fn list_nodes_json_is_an_array() {
        let text =
            run_to_string(Commands::ListNodes(ListNodesArgs { json: true })).expect("list-nodes");
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value.as_array().map(Vec::len), Some(3));
        assert_eq!(value[0]["type_name"], "RegionConditionSpecPct");
        assert_eq!(value[1]["inputs"][3]["type"], "INT");
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        let error = parse_args(["regcond", "merge", "--bogus"]).expect_err("bad flag");
        assert!(matches!(&error, CliError::Usage { message } if message.contains("--bogus")));
        assert_eq!(error.exit_code(), 64);
    }

    #[test]
    fn parse_args_reads_global_flag() {
        let cli = parse_args(["regcond", "list-nodes", "--log-json"]).expect("valid args");
        assert!(cli.log_json);
        assert!(matches!(cli.command, Commands::ListNodes(ListNodesArgs { json: false })));
    }

    #[test]
    fn missing_input_is_a_read_error() {
        let temp = tempdir().expect("tempdir");
        let error = run_to_string(Commands::Validate(InputArgs {
            input: temp.path().join("missing.json"),
        }))
        .expect_err("missing file");
        assert!(matches!(error, CliError::Read { .. }));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn merge_writes_json_report_to_output() {
        let temp = tempdir().expect("tempdir");
        let input = temp.path().join("doc.json");
        let output = temp.path().join("report.json");
        fs::write(
            &input,
            r#"{"width": 64, "height": 64,
                "regions": [{"mode": "px", "width": 32, "height": 16,
                             "conditioning": [{"embedding": "e"}]}]}"#,
        )
        .expect("write doc");

        let text = run_to_string(Commands::Merge(MergeArgs {
            input,
            json: false,
            output: Some(output.clone()),
        }))
        .expect("merge");
        assert!(text.contains("1 merged entries"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).expect("report")).expect("json");
        assert_eq!(written["entries"][0]["mask"]["nonzero"], 512);
    }
}
