//! LXMF Vanity Address Generator CLI
//!
//! Usage:
//!   lxmf-vanity -p dead            # Find address starting with "dead"
//!   lxmf-vanity -s beef            # Find address ending with "beef"
//!   lxmf-vanity -p ca -s fe -w 4   # Both, with 4 workers
//!   lxmf-vanity --verify identity  # Recompute the address of a saved identity

use std::io::Write;
use std::path::Path;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use log::warn;

use lxmf_vanity::worker::{format_number, ProgressSample};
use lxmf_vanity::{load_identity, save_identity, AddressDeriver, Config, ProgressReporter, WorkerPool};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::parse();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    if let Some(path) = &config.verify {
        verify(path);
        return;
    }

    let pattern = match config.pattern() {
        Ok(pattern) => pattern,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    // Print startup info
    println!("Searching for LXMF vanity address...");
    if !pattern.prefix_nibbles().is_empty() {
        println!("  Prefix:     {}", pattern.prefix_hex());
    }
    if !pattern.suffix_nibbles().is_empty() {
        println!("  Suffix:     {}", pattern.suffix_hex());
    }
    println!("  Difficulty: {}", pattern.difficulty_description());
    println!("  Workers:    {}", config.worker_count());
    if config.dry_run {
        println!("  Mode:       DRY RUN (nothing will be saved)");
    }
    println!();

    let pool = match WorkerPool::new(config.worker_count(), pattern, AddressDeriver::lxmf()) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    ctrlc_handler(pool.stop_flag_clone());

    let stats = pool.stats();
    let interval = config.report_interval;
    let reporter = if interval > 0 {
        match ProgressReporter::spawn(stats.clone(), Duration::from_secs(interval), move |sample| {
            print_progress(sample, interval)
        }) {
            Ok(reporter) => Some(reporter),
            Err(e) => {
                warn!("progress display disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let started = Instant::now();
    let outcome = pool.wait();
    if let Some(reporter) = reporter {
        reporter.finish();
    }

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            eprintln!("\nError: {}", e);
            process::exit(1);
        }
    };

    let identity = &result.identity;
    println!("\n✓ Found matching address: {}", identity.address());
    println!("  Identity hash:  {}", identity.fingerprint());
    println!("  Total attempts: {}", stats.total_attempts());
    println!("  Worker:         {}", result.worker_id);
    println!("  Time elapsed:   {:.2}s", started.elapsed().as_secs_f64());

    if config.dry_run {
        return;
    }

    match save_identity(identity, &config.out) {
        Ok(report) => {
            println!("  Saved to:       {}", config.out.display());
            println!("  Report:         {}", report.display());
        }
        Err(e) => {
            eprintln!("Error saving identity: {}", e);
            process::exit(1);
        }
    }
}

fn verify(path: &Path) {
    match load_identity(path, &AddressDeriver::lxmf()) {
        Ok(identity) => {
            println!("Identity file:  {}", path.display());
            println!("Address (LXMF): {}", identity.address());
            println!("Identity Hash:  {}", identity.fingerprint());
            println!("X25519 Public:  {}", hex::encode(identity.exchange_public()));
            println!("Ed25519 Public: {}", hex::encode(identity.signing_public()));
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn print_progress(sample: ProgressSample, interval_secs: u64) {
    print!(
        "\r  Speed: {}/s (avg: {}/s) | Total: {}        ",
        format_number(sample.rate / interval_secs),
        format_number(sample.average_rate as u64),
        format_number(sample.total)
    );
    let _ = std::io::stdout().flush();
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Release);
    }) {
        warn!("failed to install Ctrl-C handler: {}", e);
    }
}
