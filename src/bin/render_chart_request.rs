use std::fs;
use std::path::PathBuf;

use chart_mcp::api::{ChartKind, DisplayMode, ServerConfig, ToolDispatcher, ToolResult};
use serde_json::Value;

#[derive(Debug)]
struct CliArgs {
    request_path: PathBuf,
    output_dir: Option<PathBuf>,
    dpi: Option<u32>,
    display: bool,
}

fn main() {
    let _ = chart_mcp::telemetry::init_default_tracing();
    match run() {
        Ok(result) if result.is_success() => {}
        Ok(_) => std::process::exit(2),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<ToolResult, String> {
    let args = parse_args()?;
    let raw = fs::read_to_string(&args.request_path).map_err(|err| {
        format!(
            "failed to read request `{}`: {err}",
            args.request_path.display()
        )
    })?;
    let mut arguments: Value = serde_json::from_str(&raw).map_err(|err| {
        format!(
            "failed to parse request `{}`: {err}",
            args.request_path.display()
        )
    })?;
    let kind: ChartKind = arguments
        .as_object_mut()
        .and_then(|object| object.remove("kind"))
        .ok_or_else(|| "request must be a JSON object with a `kind` field".to_owned())
        .and_then(|tag| {
            serde_json::from_value(tag).map_err(|err| format!("unknown chart kind: {err}"))
        })?;

    let mut config = ServerConfig::load().map_err(|err| err.to_string())?;
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(dpi) = args.dpi {
        config.dpi = dpi;
    }
    if !args.display {
        config.display = DisplayMode::Headless;
    }

    let mut dispatcher = ToolDispatcher::new(&config).map_err(|err| err.to_string())?;
    let result = dispatcher.dispatch_arguments(kind, arguments);
    let json = serde_json::to_string_pretty(&result)
        .map_err(|err| format!("failed to encode result: {err}"))?;
    println!("{json}");
    Ok(result)
}

fn parse_args() -> Result<CliArgs, String> {
    let mut request_path: Option<PathBuf> = None;
    let mut output_dir: Option<PathBuf> = None;
    let mut dpi: Option<u32> = None;
    let mut display = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--request" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --request".to_owned())?;
                request_path = Some(PathBuf::from(value));
            }
            "--output-dir" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output-dir".to_owned())?;
                output_dir = Some(PathBuf::from(value));
            }
            "--dpi" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --dpi".to_owned())?;
                dpi = Some(
                    value
                        .parse()
                        .map_err(|err| format!("invalid --dpi `{value}`: {err}"))?,
                );
            }
            "--display" => display = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument `{arg}`\n\n{}", usage_message()));
            }
        }
    }

    let request_path =
        request_path.ok_or_else(|| format!("--request is required\n\n{}", usage_message()))?;
    Ok(CliArgs {
        request_path,
        output_dir,
        dpi,
        display,
    })
}

fn print_usage() {
    println!("{}", usage_message());
}

fn usage_message() -> String {
    "Usage: render-chart-request --request <file> [options]\n\nRenders one JSON chart request (tagged by `kind`) and prints the tool result.\n\nOptions:\n  --request <path>      Chart request JSON file\n  --output-dir <path>   Output directory (default: CHART_MCP_OUTPUT_DIR or the temp dir)\n  --dpi <n>             Raster resolution (default: 300)\n  --display             Open the saved PNG in the configured viewer\n  -h, --help            Show this message"
        .to_owned()
}
