use muscle_chart::MuscleBarChart;
use muscle_chart::codec::{compress, decode_configuration, decompress, encode_configuration};
use muscle_chart::core::ChartConfiguration;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

const USAGE: &str = "usage: chart_state_tool <compress|decompress|encode-config|decode-config|visual-tree> --input <path> --output <path>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Compress,
    Decompress,
    EncodeConfig,
    DecodeConfig,
    VisualTree,
}

#[derive(Debug)]
struct CliArgs {
    command: CommandKind,
    input: PathBuf,
    output: PathBuf,
}

fn main() {
    let _ = muscle_chart::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("failed to read `{}`: {err}", args.input.display()))?;

    match args.command {
        CommandKind::Compress => write_text(&args.output, &compress(&raw)),
        CommandKind::Decompress => {
            let text = decompress(raw.trim())
                .ok_or_else(|| "input is not a valid compressed string".to_owned())?;
            write_text(&args.output, &text)
        }
        CommandKind::EncodeConfig => {
            let config = parse_configuration(&raw)?;
            let encoded = encode_configuration(&config).map_err(|err| err.to_string())?;
            write_text(&args.output, &encoded)
        }
        CommandKind::DecodeConfig => {
            let config = decode_configuration(raw.trim())
                .ok_or_else(|| "input does not decode to a chart configuration".to_owned())?;
            write_json(&args.output, &config)
        }
        CommandKind::VisualTree => {
            let config = parse_configuration(&raw)?;
            let tree = MuscleBarChart::from_configuration(&config).map_err(|err| err.to_string())?;
            write_json(&args.output, &tree)
        }
    }
}

fn parse_configuration(raw: &str) -> Result<ChartConfiguration, String> {
    let config: ChartConfiguration =
        serde_json::from_str(raw).map_err(|err| format!("invalid json: {err}"))?;
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn write_text(path: &PathBuf, text: &str) -> Result<(), String> {
    fs::write(path, text).map_err(|err| format!("failed to write `{}`: {err}", path.display()))
}

fn write_json<T: Serialize>(path: &PathBuf, value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize json: {err}"))?;
    write_text(path, &payload)
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let command = match args.next().as_deref() {
        Some("compress") => CommandKind::Compress,
        Some("decompress") => CommandKind::Decompress,
        Some("encode-config") => CommandKind::EncodeConfig,
        Some("decode-config") => CommandKind::DecodeConfig,
        Some("visual-tree") => CommandKind::VisualTree,
        _ => return Err(USAGE.to_owned()),
    };

    let mut input = None::<PathBuf>;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --input".to_owned())?;
                input = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    let input = input.ok_or_else(|| "missing --input".to_owned())?;
    let output = output.ok_or_else(|| "missing --output".to_owned())?;
    Ok(CliArgs {
        command,
        input,
        output,
    })
}
