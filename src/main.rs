use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pnp_datadomain::{classify, perfdata, GraphFragment, HostContext, Mode};

/// Renders the Data Domain graph templates for one service as rrdtool recipes.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Host the perfdata belongs to
    #[arg(long, env = "NAGIOS_HOSTNAME")]
    hostname: String,
    /// Service description the perfdata belongs to
    #[arg(long, env = "NAGIOS_SERVICEDESC")]
    service: String,
    /// RRD file holding the datasources
    #[arg(long, env = "RRDFILE")]
    rrd_file: String,
    /// Use the compact replication templates
    #[arg(long)]
    replication: bool,
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Performance data; read from stdin when omitted
    perfdata: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let input = match cli.perfdata {
        Some(ref perfdata) => perfdata.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read perfdata from stdin")?;
            buf
        }
    };

    let datasources = perfdata::parse(&input, &cli.rrd_file).context("invalid perfdata")?;
    debug!(count = datasources.len(), "parsed perfdata");

    let mode = if cli.replication {
        Mode::Replication
    } else {
        Mode::Standard
    };
    let host = HostContext::new(&cli.hostname, &cli.service);
    let fragments = classify(&datasources, &host, mode);

    let recognized = fragments.iter().filter(|f| !f.is_empty()).count();
    info!(recognized, total = fragments.len(), %host, "rendered graph templates");

    match cli.format {
        Format::Text => print!("{}", to_text(&fragments)),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&fragments).context("failed to serialize fragments")?
        ),
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .context("failed to create log filter")?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set global tracing subscriber")?;

    Ok(())
}

fn to_text(fragments: &[GraphFragment]) -> String {
    let mut out = String::new();

    for fragment in fragments {
        out.push_str(&format!("# [{}] {}\n", fragment.index, fragment.ds_name));
        out.push_str(&format!("opt[{}] = {}\n", fragment.index, fragment.opt()));
        out.push_str(&format!("def[{}] = {}\n", fragment.index, fragment.def().trim_end()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from([
            "pnp-datadomain",
            "--hostname",
            "dd01",
            "--service",
            "Replication",
            "--rrd-file",
            "r.rrd",
            "--replication",
            "--format",
            "json",
            "x_perc=1",
        ])
        .unwrap();

        assert!(cli.replication);
        assert!(matches!(cli.format, Format::Json));
        assert_eq!(cli.perfdata.as_deref(), Some("x_perc=1"));
    }

    #[test]
    fn test_to_text() {
        let datasources = perfdata::parse("mystery=1", "r.rrd").unwrap();
        let fragments = classify(&datasources, &HostContext::new("dd01", "x"), Mode::Standard);

        assert_eq!(
            &to_text(&fragments),
            "# [1] mystery\nopt[1] = \ndef[1] = \n"
        );
    }
}
