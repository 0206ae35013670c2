//! Session loop of the console host.

use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use ap_app::{AppViewModel, Frame};
use ap_core::config::AppConfig;

use super::wiring::wire_dependencies;
use crate::console::{parse_command, render_frame, Command, Console};

const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Build the runtime and drive one session until `quit`, end of input or
/// Ctrl-C.
pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    let result = runtime.block_on(run_session(config));
    // A pending stdin read would otherwise hold the shutdown.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

fn redraw(vm: &AppViewModel, last: &mut Option<Frame>) {
    let frame = vm.frame();
    if last.as_ref() == Some(&frame) {
        return;
    }
    println!("\n{}", render_frame(&frame));
    *last = Some(frame);
}

fn report(result: anyhow::Result<Option<String>>) {
    match result {
        Ok(Some(message)) => println!("{message}"),
        Ok(None) => {}
        Err(err) => println!("Error: {err:#}"),
    }
}

async fn run_session(config: AppConfig) -> anyhow::Result<()> {
    let (deps, settings) = wire_dependencies(&config)?;
    let vm = AppViewModel::new(deps, settings);
    let session = vm.start();
    let console = Console::new(vm.clone());

    let mut revisions = vm.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_frame = None;
    redraw(&vm, &mut last_frame);

    loop {
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                redraw(&vm, &mut last_frame);
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    info!("end of input");
                    break;
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) if command.is_async() => {
                        let console = console.clone();
                        tokio::spawn(async move { report(console.execute(command).await) });
                    }
                    Ok(Some(command)) => report(console.execute(command).await),
                    Err(err) => println!("{err}"),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    warn!(error = %err, "ctrl-c handler failed");
                }
                info!("interrupted");
                break;
            }
        }
    }

    session.shutdown();
    info!("session closed");
    Ok(())
}
