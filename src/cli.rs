use anyhow::{Result, bail};
use console::style;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use gremlin_datasource::{
    ConnectionSettings, DataSource, GremlinQuery, ProbeStatus, QueryRequest, ScopedVars, TimeRange,
};

use crate::terminal::{print_error, print_status, print_success};

const SETTINGS_FILE: &str = "datasource.toml";

pub async fn run_main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("query") => run_query(&args, 2).await,
        Some("probe") => run_probe(&args, 2).await,
        Some("help") | Some("--help") | None => {
            print_help();
            Ok(())
        }
        Some(other) => {
            print_help();
            bail!("unknown command: {}", other)
        }
    }
}

fn print_help() {
    println!(
        "\n {} {} <command> [flags]\n",
        style("Usage:").bold(),
        style("gremlin-ds").green()
    );
    println!(
        "  {}   Run a Gremlin query against the topology API",
        style("query").cyan()
    );
    println!(
        "  {}   Check connectivity to the backend",
        style("probe").cyan()
    );
    println!(
        "\n Flags: --url <base>  --from <secs> --to <secs>  --var <name=value>\n"
    );
}

#[derive(Debug, Default)]
struct CliArgs {
    url: Option<String>,
    from: Option<i64>,
    to: Option<i64>,
    vars: ScopedVars,
    positional: Vec<String>,
}

fn parse_cli_args(args: &[String], start: usize) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--url" | "-u" => {
                parsed.url = Some(flag_value(args, i, "--url")?);
                i += 2;
            }
            "--from" => {
                parsed.from = Some(flag_value(args, i, "--from")?.parse()?);
                i += 2;
            }
            "--to" => {
                parsed.to = Some(flag_value(args, i, "--to")?.parse()?);
                i += 2;
            }
            "--var" => {
                let pair = flag_value(args, i, "--var")?;
                let Some((name, value)) = pair.split_once('=') else {
                    bail!("--var expects name=value, got: {}", pair);
                };
                parsed.vars.insert(name.to_string(), value.to_string());
                i += 2;
            }
            flag if flag.starts_with('-') => bail!("unknown flag: {}", flag),
            _ => {
                parsed.positional.push(args[i].clone());
                i += 1;
            }
        }
    }
    Ok(parsed)
}

fn flag_value(args: &[String], i: usize, flag: &str) -> Result<String> {
    match args.get(i + 1) {
        Some(value) => Ok(value.clone()),
        None => bail!("{} expects a value", flag),
    }
}

async fn datasource_for(url: Option<String>) -> Result<DataSource> {
    let settings = match url {
        Some(url) => ConnectionSettings::new(url),
        None => ConnectionSettings::load(SETTINGS_FILE).await?,
    };
    Ok(DataSource::with_http(settings))
}

async fn run_query(args: &[String], start: usize) -> Result<()> {
    let parsed = parse_cli_args(args, start)?;
    let Some(query_text) = parsed.positional.first() else {
        bail!("usage: gremlin-ds query <gremlin> [--from SECS --to SECS] [--var name=value] [--url BASE]");
    };
    let range = match (parsed.from, parsed.to) {
        (Some(from), Some(to)) => TimeRange::bounded(from, to),
        (None, None) => TimeRange::unbounded(),
        _ => bail!("--from and --to must be given together"),
    };

    let datasource = datasource_for(parsed.url).await?;
    let request = QueryRequest {
        range,
        scoped_vars: parsed.vars,
        targets: vec![GremlinQuery::new("A", query_text.as_str())],
    };

    for result in datasource.query(&request).await {
        match result {
            Ok(frame) => println!("{}", serde_json::to_string_pretty(&frame)?),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

async fn run_probe(args: &[String], start: usize) -> Result<()> {
    let parsed = parse_cli_args(args, start)?;
    let datasource = datasource_for(parsed.url).await?;
    print_status("Backend", datasource.base_url());

    let result = datasource.probe().await;
    match result.status {
        ProbeStatus::Success => print_success(&result.message),
        ProbeStatus::Error => {
            print_error(&result.message);
            std::process::exit(1);
        }
    }
    Ok(())
}
