//! Bridge diagnostic - localizes a hanging GetFrame RPC.
//!
//! Run with: cargo run --bin bridge-diagnose -- --bridge localhost:50051

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use bridge_bench::{diagnose, GrpcBridge, ProbeConfig, ProbeError, ProbeVerdict};

#[derive(Parser, Debug)]
#[command(
    name = "bridge-diagnose",
    about = "Classify a bridge hang with escalating capture deadlines"
)]
struct Cli {
    /// Bridge address.
    #[arg(long, default_value = "localhost:50051")]
    bridge: String,

    /// Capture deadlines to try, in seconds, ascending.
    #[arg(long, value_delimiter = ',', default_values_t = [5u64, 10, 30])]
    timeouts: Vec<u64>,

    /// Save the successful probe frame here.
    #[arg(long)]
    save_frame: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    println!("{}", "=".repeat(60));
    println!("🔍 BRIDGE DIAGNOSTIC - Isolating GetFrame Issue");
    println!("{}", "=".repeat(60));
    println!("\n📡 Connecting to bridge at {}...\n", cli.bridge);

    let rpc = GrpcBridge::connect(&cli.bridge)
        .await
        .with_context(|| format!("make sure the bridge is running at {}", cli.bridge))?;

    let config = ProbeConfig::default()
        .with_timeouts(cli.timeouts.iter().map(|s| Duration::from_secs(*s)).collect());

    let report = match diagnose(&rpc, &config).await {
        Ok(report) => report,
        Err(ProbeError::ChannelBroken {
            call,
            source,
            attempts,
        }) => {
            print_attempts(&attempts);
            println!("\n{}", "=".repeat(60));
            println!("❌ DIAGNOSIS: Bridge channel is BROKEN");
            println!("   → {} failed: {}", call, source);
            println!("   → The bridge is unreachable, not hanging");
            println!("{}\n", "=".repeat(60));
            return Ok(ExitCode::from(2));
        }
    };

    print_attempts(&report.attempts);
    println!();

    match report.verdict {
        ProbeVerdict::BridgeHealthy => {
            println!("{}", "=".repeat(60));
            println!("✅ DIAGNOSIS: Bridge GetFrame is WORKING");
            println!("   → Issue is likely on the caller/hub side");
            println!("{}\n", "=".repeat(60));

            if let (Some(path), Some(frame)) = (&cli.save_frame, &report.frame) {
                frame.save(path)?;
                println!("💾 Saved probe frame to: {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        ProbeVerdict::BridgeHanging => {
            println!("{}", "=".repeat(60));
            println!("❌ DIAGNOSIS: Bridge GetFrame is HANGING");
            println!("   → Heartbeat and registration kept succeeding,");
            println!("     so the fault is in the bridge's observation path");
            println!("{}\n", "=".repeat(60));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_attempts(attempts: &[bridge_bench::ProbeAttempt]) {
    println!("Evidence trail:");
    for attempt in attempts {
        println!(
            "   {:<14} timeout={:>4.0}s elapsed={:>6.2}s verdict={}",
            attempt.rpc_name,
            attempt.timeout_used.as_secs_f64(),
            attempt.elapsed.as_secs_f64(),
            attempt.verdict
        );
    }
}
