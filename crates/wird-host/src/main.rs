use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use wird_core::WirdConfig;
use wird_dispatch::{Delivery, DispatchHandler};
use wird_scheduler::{Scheduler, SqliteStore, Trigger, WakeupPayload};

mod cli;
mod console;
mod display;
mod router;
mod timer;

use cli::{Cli, Command, StartTrigger};
use console::Console;
use display::LogDisplay;
use router::FireRouter;
use timer::TokioTimer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wird_host=info,wird_scheduler=info,wird_dispatch=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // explicit --config / WIRD_CONFIG > ~/.wird/wird.toml
    let config = WirdConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        WirdConfig::default()
    });

    let store_path = &config.store.path;
    ensure_parent_dir(store_path);
    info!(path = %store_path, "opening key-value store");
    let store = Arc::new(SqliteStore::open(store_path)?);

    // Fired wake-up channel: TokioTimer -> fire loop
    let (fired_tx, fired_rx) = mpsc::channel::<WakeupPayload>(64);
    let timer = Arc::new(TokioTimer::new(fired_tx, config.timer.allow_while_idle));
    let scheduler = Arc::new(
        Scheduler::new(timer.clone(), store).with_completion_delay(chrono::Duration::seconds(
            config.completion.delay_secs as i64,
        )),
    );

    match cli.command.unwrap_or(Command::Run {
        trigger: StartTrigger::Boot,
    }) {
        Command::Run { trigger } => run(scheduler, timer, fired_rx, trigger.into()).await,
        Command::List { json } => {
            let planned = scheduler.list_planned();
            if json {
                println!("{}", serde_json::to_string_pretty(&planned)?);
            } else {
                for p in planned {
                    println!(
                        "{:>5}  {:<18} {:02}:{:02}",
                        p.id.to_string(),
                        p.category.label(),
                        p.hour,
                        p.minute
                    );
                }
            }
            Ok(())
        }
        Command::Status => {
            println!("{}", serde_json::to_string_pretty(&scheduler.status())?);
            Ok(())
        }
        Command::ClearEpoch => {
            scheduler.clear_epoch()?;
            println!("epoch cleared; the next start re-arms every reminder");
            Ok(())
        }
    }
}

async fn run(
    scheduler: Arc<Scheduler>,
    timer: Arc<TokioTimer>,
    mut fired_rx: mpsc::Receiver<WakeupPayload>,
    trigger: Trigger,
) -> anyhow::Result<()> {
    let display = Arc::new(LogDisplay::new());
    let handler = Arc::new(DispatchHandler::new(display.clone()));
    let router = Arc::new(FireRouter::new(scheduler.clone(), handler.clone()));
    let console = Console {
        scheduler: scheduler.clone(),
        timer: timer.clone(),
        display,
        handler,
        router: router.clone(),
    };

    // Wake-ups armed by an earlier process died with it, so any start is
    // handled like a boot unless the caller says otherwise.
    let report = scheduler.on_trigger(trigger);
    info!(
        %trigger,
        armed = report.armed,
        failed = report.failed,
        pending = timer.pending().len(),
        "wird host running; Ctrl-C to stop"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            Some(payload) = fired_rx.recv() => {
                router.route(Delivery::from(payload));
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match console.execute(&line) {
                    Ok(Some(out)) => println!("{out}"),
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "console command failed"),
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!(error = %e, "stdin closed");
                    stdin_open = false;
                }
            },
            _ = &mut shutdown => {
                info!("wird host shutting down");
                break;
            }
        }
    }
    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
