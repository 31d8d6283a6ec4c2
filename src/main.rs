// MarketGap Watch - Main Entry Point
// Terminal client that starts a workflow and follows its progress

mod backend;
mod poller;
mod state;
mod ui;

use backend::BackendClient;
use clap::Parser;
use poller::StatusPoller;
use state::ViewState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use ui::{render_view, EventLog};

/// Follow a MarketGap workflow from the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Base URL of the MarketGap backend
    #[arg(long, env = "MARKETGAP_BACKEND_URL", default_value = "http://localhost:8080")]
    backend_url: String,

    /// Start a workflow for this industry before watching
    #[arg(long)]
    industry: Option<String>,

    /// Seconds between status polls
    #[arg(long, default_value_t = 5)]
    interval: u64,

    /// Stop after this many polls
    #[arg(long)]
    ticks: Option<u64>,

    /// Keep polling after every phase is complete
    #[arg(long)]
    follow: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not mix with the rendered view
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let client = BackendClient::new(&args.backend_url);
    let mut log = EventLog::default();

    // Status reads never create agents, so make sure they exist first
    client
        .initialize()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize agents: {}", e))?;
    log.add_line("Agents ready".to_string());

    let mut workflow = args.industry.clone().map(|industry| {
        let client = client.clone();
        log.add_line(format!("Starting workflow for {}", industry));
        tokio::spawn(async move { client.start_workflow(&industry).await })
    });

    let view = Arc::new(Mutex::new(ViewState::new()));
    let mut poller = StatusPoller::new(
        Arc::new(client),
        Arc::clone(&view),
        Duration::from_secs(args.interval.max(1)),
    );
    if let Some(ticks) = args.ticks {
        poller = poller.with_max_ticks(ticks);
    }
    let mut updates = poller.subscribe();
    let mut polling = poller.start();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = view.lock().await;
                print_frame(&render_view(&view, &log, args.industry.as_deref()));
                // A run still in flight may be showing the previous run's blocks
                if view.is_finished() && workflow.is_none() && !args.follow {
                    log.add_line("All phases complete".to_string());
                    drop(view);
                    poller.stop().await;
                }
            }
            result = wait_for(&mut workflow), if workflow.is_some() => {
                workflow = None;
                match result {
                    Ok(Ok(_)) => log.add_line("Workflow finished".to_string()),
                    Ok(Err(e)) => log.add_line(format!("Workflow failed: {}", e)),
                    Err(e) => log.add_line(format!("Workflow task failed: {}", e)),
                }
            }
            _ = &mut polling => break,
            _ = tokio::signal::ctrl_c() => {
                log.add_line("Interrupted".to_string());
                poller.stop().await;
            }
        }
    }

    let view = view.lock().await;
    print_frame(&render_view(&view, &log, args.industry.as_deref()));
    Ok(())
}

/// Await the workflow task, or never resolve if there is none
async fn wait_for<T>(task: &mut Option<JoinHandle<T>>) -> Result<T, tokio::task::JoinError> {
    match task {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Clear the terminal and print one frame
fn print_frame(frame: &str) {
    print!("\x1B[2J\x1B[H{}", frame);
}
