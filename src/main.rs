//! runpow Prover CLI
//!
//! A command-line tool for run-length proof-of-work searches.
//!
//! # Commands
//!
//! - `search` - Find a nonce whose digest beats a target run length
//! - `score` - Score a text (or raw digest) and highlight its longest run
//! - `benchmark` - Run performance benchmark

use std::io::Write;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use runpow::algorithm::{
    DIGEST_NIBBLES, MAX_SCORE, PrefixDigest, hash, longest_run, longest_run_span,
};
use runpow::engine::YIELD_INTERVAL;
use runpow::{SearchEngine, SearchRequest, SearchResult};

#[derive(Parser)]
#[command(name = "runpow")]
#[command(version = "0.1.0")]
#[command(about = "Run-length proof-of-work searcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the smallest nonce whose digest beats the target run length
    Search {
        /// Text prefix the decimal nonce is appended to
        prefix: String,

        /// Nonce to start from; the search tries strictly greater values
        #[arg(short = 'n', long, default_value = "0")]
        start_nonce: u64,

        /// Target run length to strictly exceed
        /// (default: the score of prefix + start nonce, i.e. ratchet up)
        #[arg(short, long)]
        difficulty: Option<u32>,

        /// Status poll interval in milliseconds
        #[arg(long, default_value = "50")]
        poll_ms: u64,
    },

    /// Score a text and show its digest with the longest run highlighted
    Score {
        /// Text to hash and score
        text: Option<String>,

        /// Score a raw hex digest instead of hashing a text
        #[arg(long, conflicts_with = "text")]
        hex: Option<String>,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of nonces to hash and score
        #[arg(short, long, default_value = "200000")]
        count: u64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Search {
            prefix,
            start_nonce,
            difficulty,
            poll_ms,
        } => cmd_search(prefix, start_nonce, difficulty, poll_ms, cli.json),
        Commands::Score { text, hex } => cmd_score(text, hex, cli.json),
        Commands::Benchmark { count } => cmd_benchmark(count),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_search(
    prefix: String,
    start_nonce: u64,
    difficulty: Option<u32>,
    poll_ms: u64,
    json: bool,
) -> anyhow::Result<()> {
    // Omitted target means "beat the current text": score the digest
    // of prefix + start nonce and search past it.
    let target = match difficulty {
        Some(d) => d,
        None => longest_run(&PrefixDigest::new(prefix.as_bytes()).digest_nonce(start_nonce)),
    };

    if !json {
        println!("Searching for a run longer than {}...", target);
        println!("Prefix: {} bytes", prefix.len());
        println!("Starting nonce: {}", start_nonce);
    }

    let engine = SearchEngine::new();
    let request = SearchRequest {
        prefix,
        starting_nonce: start_nonce,
        target_difficulty: target,
    };

    let rt = tokio::runtime::Runtime::new()?;
    let result: SearchResult = rt.block_on(async {
        engine.start_search(request)?;

        let mut interval = tokio::time::interval(Duration::from_millis(poll_ms));
        loop {
            interval.tick().await;
            let status = engine.poll_status();
            if !status.running {
                break;
            }

            if !json && status.elapsed_secs > 0.0 {
                let tried = status.current_nonce.saturating_sub(start_nonce);
                let rate = tried as f64 / status.elapsed_secs;
                print!(
                    "\rNonce: {} | Rate: {:.0} H/s | Time: {:.1}s",
                    status.current_nonce, rate, status.elapsed_secs
                );
                std::io::stdout().flush().ok();
            }
        }

        engine.result().map_err(anyhow::Error::from)
    })?;

    let digest = hash(result.final_text.as_bytes());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("\n\nFound qualifying nonce!");
    println!("Nonce: {}", result.final_nonce);
    println!("Text: {}", result.final_text);
    println!("Digest: {}", highlight_hex(&digest));
    println!("Run length: {}", longest_run(&digest));
    println!("Search time: {:.2}s", result.search_time_secs);

    let tried = result.final_nonce - start_nonce;
    if result.search_time_secs > 0.0 {
        println!(
            "Hashrate: {:.2} H/s over {} nonces",
            tried as f64 / result.search_time_secs,
            tried
        );
    }

    Ok(())
}

fn cmd_score(text: Option<String>, hex_digest: Option<String>, json: bool) -> anyhow::Result<()> {
    let digest: Vec<u8> = match (&text, &hex_digest) {
        (_, Some(h)) => hex::decode(h)?,
        (Some(t), None) => hash(t.as_bytes()).to_vec(),
        (None, None) => anyhow::bail!("provide a text to hash or --hex <digest>"),
    };

    let score = longest_run(&digest);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "digest": hex::encode(&digest),
                "run_length": score,
                "span": longest_run_span(&digest).map(|s| {
                    serde_json::json!({
                        "symbol": format!("{:x}", s.symbol),
                        "start": s.start,
                        "len": s.len,
                    })
                }),
            })
        );
        return Ok(());
    }

    println!("Digest: {}", highlight_hex(&digest));
    println!("Run length: {}", score);
    if let Some(span) = longest_run_span(&digest) {
        println!(
            "Longest run: {} x '{:x}' at nibble {}",
            span.len, span.symbol, span.start
        );
    }

    Ok(())
}

fn cmd_benchmark(count: u64) -> anyhow::Result<()> {
    println!("Running benchmark with {} nonces...", count);

    let prefix = "benchmark block text for runpow throughput measurement ";
    let incremental = PrefixDigest::new(prefix.as_bytes());

    let start = Instant::now();
    let mut best = 0u32;

    for nonce in 0..count {
        let digest = incremental.digest_nonce(nonce);
        let score = longest_run(&digest);
        if score > best {
            best = score;
        }
    }

    let elapsed = start.elapsed();
    let hashrate = count as f64 / elapsed.as_secs_f64();

    println!("\nResults:");
    println!("  Total nonces: {}", count);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} H/s", hashrate);
    println!("  Best run length seen: {}", best);

    println!("\nAlgorithm parameters:");
    println!("  Digest: SHA-256 ({} nibbles)", DIGEST_NIBBLES);
    println!("  Maximum score: {}", MAX_SCORE);
    println!("  Yield interval: {} iterations", YIELD_INTERVAL);

    Ok(())
}

/// Render a digest as lowercase hex with the longest run bracketed,
/// e.g. `3f9[777]a2c...`.
fn highlight_hex(digest: &[u8]) -> String {
    let encoded = hex::encode(digest);
    match longest_run_span(digest) {
        Some(span) => {
            let end = span.start + span.len as usize;
            format!(
                "{}[{}]{}",
                &encoded[..span.start],
                &encoded[span.start..end],
                &encoded[end..]
            )
        }
        None => encoded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_brackets_the_run() {
        // Nibbles A,B,B,C
        assert_eq!(highlight_hex(&[0xAB, 0xBC]), "a[bb]c");
        assert_eq!(highlight_hex(&[]), "");
    }
}
