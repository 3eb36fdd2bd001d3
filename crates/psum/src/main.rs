//! psum - evaluate prefix sum queries from the command line

mod handler;

use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use prefixcache::{CacheConfig, SumCache, DEFAULT_CAPACITY};
use prefixsum::{InputPolicy, Strategy};
use tracing::{error, info};

use crate::handler::QueryHandler;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Queries to evaluate; read from stdin, one per line, when omitted
    #[arg(allow_negative_numbers = true)]
    queries: Vec<String>,

    /// Cache capacity (number of entries)
    #[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Reject negative and non-integer queries instead of answering 0
    #[arg(long)]
    strict: bool,

    /// Seed forward extensions longer than this from the closed form
    #[arg(long)]
    seed_threshold: Option<u64>,

    /// Strategy used to answer queries
    #[arg(short, long, default_value_t = Strategy::Cached)]
    strategy: Strategy,

    /// Cross-check every query against all strategies
    #[arg(long)]
    check: bool,

    /// Print cache statistics on exit
    #[arg(long)]
    stats: bool,

    /// Print responses and statistics as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let policy = if args.strict {
        InputPolicy::Strict
    } else {
        InputPolicy::Lenient
    };
    let config = CacheConfig::with_capacity(args.capacity)
        .policy(policy)
        .seed_threshold(args.seed_threshold);

    let cache = Arc::new(SumCache::with_config(config)?);
    info!(
        capacity = args.capacity,
        ?policy,
        strategy = %args.strategy,
        "psum v{} ready",
        env!("CARGO_PKG_VERSION")
    );

    let handler = QueryHandler::new(Arc::clone(&cache), args.strategy, args.check);
    let mut failures = 0usize;

    if args.queries.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            failures += run_query(&handler, &line, args.json)?;
        }
    } else {
        for query in &args.queries {
            failures += run_query(&handler, query, args.json)?;
        }
    }

    if args.stats {
        print_stats(&cache, args.json)?;
    }

    if failures > 0 {
        anyhow::bail!("{} of the queries failed", failures);
    }
    Ok(())
}

/// Evaluate one query and print the answer; returns 1 on a query error
fn run_query(handler: &QueryHandler, line: &str, json: bool) -> Result<usize> {
    match handler.handle(line) {
        Ok(response) => {
            if json {
                println!("{}", serde_json::to_string(&response)?);
            } else {
                println!("{}", response);
            }
            Ok(0)
        }
        Err(e) => {
            error!("{}: {}", line.trim(), e);
            Ok(1)
        }
    }
}

fn print_stats(cache: &SumCache, json: bool) -> Result<()> {
    let snapshot = cache.stats().snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("\n📊 CACHE STATISTICS:");
    println!("   Resident entries:  {} / {}", cache.len(), cache.capacity());
    println!("   High-water mark:   {}", cache.high_water_mark());
    println!("   Hits / misses:     {} / {}", snapshot.hits, snapshot.misses);
    println!("   Hit ratio:         {:.2}", cache.stats().hit_ratio());
    println!("   Forward steps:     {}", snapshot.forward_steps);
    println!("   Backward steps:    {}", snapshot.backward_steps);
    println!("   Closed-form seeds: {}", snapshot.seeds);
    println!("   Inserts:           {}", snapshot.inserts);
    println!("   Evictions:         {}", snapshot.evictions);
    println!("   Invalid inputs:    {}", snapshot.invalid_inputs);
    Ok(())
}
