use anyhow::Result;
use clap::{CommandFactory, Parser, ValueEnum};
use std::io;
use tracing::warn;
use volstat::config::{self, Config};
use volstat::util::{human::fmt_mib, logger, report};
use volstat::{StorageStats, Volume};

#[derive(Parser, Debug)]
#[command(name = "volstat", about = "Primary / removable volume capacity in MiB", version)]
struct Cli {
    /// Metric to print; all three when omitted
    #[arg(value_enum)]
    metric: Option<Metric>,

    /// Query the removable volume instead of the primary one
    #[arg(short, long)]
    removable: bool,

    /// Append a human-readable size to each number
    #[arg(short = 'H', long)]
    human: bool,

    /// Print a JSON snapshot of both volumes and exit
    #[arg(long)]
    json: bool,

    /// Print a human-readable report of both volumes and exit
    #[arg(long)]
    report: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Metric {
    Total,
    Free,
    Used,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logging();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "volstat", &mut io::stdout());
        return Ok(());
    }
    if cli.config {
        return run_print_config();
    }

    let stats = StorageStats::platform();
    if cli.json {
        let results = collect_all(&stats);
        println!("{}", serde_json::to_string_pretty(&report::json(&results))?);
        return Ok(());
    }
    if cli.report {
        print!("{}", report::generate(&collect_all(&stats)));
        return Ok(());
    }

    let metrics: &[Metric] = match &cli.metric {
        Some(m) => std::slice::from_ref(m),
        None    => &[Metric::Total, Metric::Free, Metric::Used],
    };
    for metric in metrics {
        let mib = match metric {
            Metric::Total => stats.total_space(cli.removable)?,
            Metric::Free  => stats.free_space(cli.removable)?,
            Metric::Used  => stats.used_space(cli.removable)?,
        };
        let value = if cli.human { format!("{} ({})", mib, fmt_mib(mib)) } else { mib.to_string() };
        if cli.metric.is_some() {
            println!("{}", value);
        } else {
            println!("{:<6}{}", format!("{:?}", metric).to_lowercase(), value);
        }
    }
    Ok(())
}

fn collect_all(stats: &StorageStats) -> Vec<report::VolumeResult> {
    Volume::ALL.iter().map(|&v| (v, stats.usage(v))).collect()
}

fn run_print_config() -> Result<()> {
    let created = config::write_defaults_if_missing().unwrap_or_else(|e| {
        warn!("failed to write default config: {}", e);
        false
    });
    let cfg = Config::load();
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let r = &cfg.roots;
    println!("Config: {}{}", path, if created { " (created with defaults)" } else { "" });
    println!();
    println!("[roots]");
    println!("  primary                 = {}", r.primary);
    println!("  removable               = {}", if r.removable.is_empty() { "(auto)" } else { r.removable.as_str() });
    println!("  require_removable_mount = {}", r.require_removable_mount);
    println!("  mount_table             = {}", r.mount_table);
    Ok(())
}
