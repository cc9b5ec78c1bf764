use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use subbrute::types::INPUT_SOURCE;
use subbrute::{config, utils, Args, BruteForceService, Config, Request, RequestTag, Service};
use tokio::sync::mpsc;
use tokio::time;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(&args);

    let config = Arc::new(build_config(&args)?);

    let roots = get_domains_from_args(&args);
    if roots.is_empty() {
        error!("No input provided. Use -d <domain>, -l <file>, or pipe domains to stdin");
        process::exit(1);
    }
    let names = get_names_from_args(&args, &roots);

    info!(
        "Brute forcing {} root domains with {} words (recursive: {})",
        roots.len(),
        config.wordlist.len(),
        config.recursive
    );

    let (in_tx, in_rx) = mpsc::channel(config.channel_capacity);
    let (out_tx, mut out_rx) = mpsc::channel(config.channel_capacity);
    let service = BruteForceService::new(in_rx, out_tx, config.clone());
    service.start()?;

    for root in roots {
        in_tx.send(Request::root(root)).await?;
    }
    for (name, root) in names {
        in_tx
            .send(Request::new(name, root, RequestTag::Dns, INPUT_SOURCE))
            .await?;
    }

    let mut writer = open_output(&args)?;
    let mut produced = 0usize;
    loop {
        match time::timeout(config.idle_timeout, out_rx.recv()).await {
            Ok(Some(req)) => {
                writeln!(writer, "{}", req.name())?;
                produced += 1;
            }
            Ok(None) => break,
            Err(_) if !service.is_active() => break,
            Err(_) => continue,
        }
    }
    writer.flush()?;

    service.stop().await?;
    drop(in_tx);

    info!("Generated {} candidates", produced);
    Ok(())
}

fn init_logging(args: &Args) {
    let level = if args.silent {
        log::LevelFilter::Error
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = match args.config_path.as_deref() {
        Some(path) => config::load_config(path)?,
        None => config::load_default_config()?,
    };

    if let Some(path) = &args.wordlist {
        config.wordlist = config::load_wordlist(path)?;
    }
    if let Some(recursive) = args.recursion_override() {
        config.recursive = recursive;
    }
    if let Some(secs) = args.idle_timeout {
        config.idle_timeout = Duration::from_secs(secs);
    }

    config::validate_config(&config)?;
    Ok(config)
}

fn open_output(args: &Args) -> Result<Box<dyn Write>> {
    match &args.output_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn get_domains_from_args(args: &Args) -> Vec<String> {
    let mut raw = Vec::new();

    raw.extend(args.domain.iter().cloned());

    if let Some(file_path) = &args.domains_file {
        match utils::read_lines(file_path) {
            Ok(lines) => raw.extend(lines),
            Err(e) => {
                error!("Failed to read domains from file {:?}: {}", file_path, e);
            }
        }
    }

    if args.use_stdin() {
        let stdin = io::stdin();
        for line in stdin.lock().lines().map_while(|line| line.ok()) {
            raw.push(line);
        }
    }

    let mut domains: Vec<String> = Vec::new();
    for line in raw {
        if line.trim().is_empty() {
            continue;
        }
        match utils::parse_root_domain(&line) {
            Ok(domain) => {
                if !domains.contains(&domain) {
                    domains.push(domain);
                }
            }
            Err(e) => warn!("Skipping {}", e),
        }
    }

    domains
}

fn get_names_from_args(args: &Args, roots: &[String]) -> Vec<(String, String)> {
    let Some(file_path) = &args.names_file else {
        return Vec::new();
    };

    let lines = match utils::read_lines(file_path) {
        Ok(lines) => lines,
        Err(e) => {
            error!("Failed to read names from file {:?}: {}", file_path, e);
            return Vec::new();
        }
    };

    let mut names = Vec::new();
    for line in lines {
        let name = utils::clean_domain(&line);
        if name.is_empty() {
            continue;
        }
        match utils::matching_root(&name, roots) {
            Some(root) => names.push((name.clone(), root.to_string())),
            None => warn!("Skipping {}: not under any root domain", name),
        }
    }

    names
}
