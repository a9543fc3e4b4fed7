//! Bridge Bench - batch benchmark runner for the desktop-agent bridge.
//!
//! Run with: cargo run --bin bridge-bench -- --full

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgGroup, Parser};

use bridge_bench::config::{load_suite, select, Selection};
use bridge_bench::{
    BenchConfig, BenchmarkRun, FixedCyclePolicy, GrpcBridge, Reporter, SessionManager,
    TaskOrchestrator, TaskSpec,
};

#[derive(Parser, Debug)]
#[command(
    name = "bridge-bench",
    about = "Run desktop benchmark tasks through the bridge",
    group(ArgGroup::new("selection").required(true).args(["test", "difficulty", "full"]))
)]
struct Cli {
    /// Run a single test by id (e.g. osworld_012).
    #[arg(long)]
    test: Option<String>,

    /// Run all tests of one difficulty tier.
    #[arg(long, value_parser = ["easy", "medium", "hard"])]
    difficulty: Option<String>,

    /// Run the full suite.
    #[arg(long)]
    full: bool,

    /// Bridge address.
    #[arg(long, default_value = "localhost:50051")]
    bridge: String,

    /// API key for the decision policy.
    #[arg(long, env = "BRIDGE_BENCH_API_KEY")]
    api_key: Option<String>,

    /// Directory for result artifacts.
    #[arg(long, default_value = "./bench_results")]
    output_dir: PathBuf,

    /// Suite definition file.
    #[arg(long, default_value = "config/default_test.json")]
    suite: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let selection = if let Some(id) = &cli.test {
        Selection::Single(id.clone())
    } else if let Some(tier) = &cli.difficulty {
        Selection::Difficulty(tier.clone())
    } else {
        Selection::Full
    };

    println!("📚 Loading benchmark suite from {}...", cli.suite.display());
    let all_cases = load_suite(&cli.suite).context("failed to load suite")?;
    let cases = select(&all_cases, &selection)?;
    println!("🎯 Found {} test(s) to run\n", cases.len());

    let mut config = BenchConfig::default().with_bridge_address(&cli.bridge);
    if let Some(api_key) = &cli.api_key {
        config = config.with_api_key(api_key);
    }

    // Session establishment is fatal: no task runs without a live
    // agent_id.
    println!("🔌 Connecting to bridge at {}...", cli.bridge);
    let rpc = Arc::new(
        GrpcBridge::connect(&cli.bridge)
            .await
            .with_context(|| format!("make sure the bridge is running at {}", cli.bridge))?,
    );
    let mut session = SessionManager::connect(Arc::clone(&rpc), &config)
        .await
        .context("agent registration failed")?;
    println!("✅ Connected, agent ID: {}\n", session.agent_id());

    let mut orchestrator = TaskOrchestrator::new(
        session.rpc(),
        session.agent_id(),
        FixedCyclePolicy::new(),
        &config,
    );
    let reporter = Reporter::new(&cli.output_dir);
    let mut run = BenchmarkRun::new();

    for (index, case) in cases.iter().enumerate() {
        println!("Progress: {}/{}", index + 1, cases.len());
        println!("🧪 Running test: {}", case.test_id);
        println!("   Task: {}", case.instruction);

        let spec = TaskSpec::new(&case.test_id, &case.instruction, case.max_steps);
        let result = orchestrator.run_task(&spec).await;

        println!(
            "   {} {} ({} steps, {:.1}s)\n",
            result.status,
            case.test_id,
            result.steps_taken,
            result.duration
        );

        run.record(result);

        // Persist the full run after every task so a crash never loses
        // more than the in-flight task.
        let artifacts = reporter.persist(&run).context("failed to persist results")?;
        println!("💾 Results saved: {}", artifacts.results_path.display());
        println!("📄 Report saved: {}\n", artifacts.report_path.display());
    }

    let summary = run.summarize();
    println!("{}", "=".repeat(60));
    println!("🎉 Testing Complete!");
    println!("{}", "=".repeat(60));
    println!(
        "✅ Passed: {}/{} ({:.1}%)",
        summary.passed,
        summary.total,
        summary.pass_rate * 100.0
    );
    println!("💰 Total Cost: ${:.2}", summary.total_cost);
    println!("⏱️  Total Time: {:.1} minutes", summary.total_duration / 60.0);

    session.close();
    Ok(())
}
