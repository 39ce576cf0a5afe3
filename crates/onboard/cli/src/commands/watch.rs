//! Live progress polling

use std::sync::Arc;

use clap::Args;
use colored::*;
use onboard_progress::{render, ProgressEvent, ProgressMonitor, StageSet, WatchKey};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use super::{CommandContext, ViewArgs};
use crate::error::CliResult;
use crate::output::{
    colored_bar, print_info, print_json, print_success, print_warning, OutputFormat,
};

/// Arguments for `onboard watch`
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Seconds between evaluations
    #[arg(long)]
    pub interval: Option<u64>,
}

/// Execute `onboard watch`
pub async fn execute(args: WatchArgs, mut ctx: CommandContext) -> CliResult<()> {
    if let Some(secs) = args.interval {
        ctx.config.polling.interval_secs = secs.max(1);
    }

    let resources = args.view.resources()?;
    let gateway = ctx.gateway()?;
    let stage_set = StageSet::for_variant(args.view.variant, gateway.clone());
    ctx.warn_if_signed_out();

    let monitor = ProgressMonitor::new(
        Arc::new(ctx.evaluator()),
        gateway,
        ctx.config.polling.clone(),
    );
    let key = WatchKey::for_view(args.view.variant, &ctx.auth, &resources);
    let mut events = monitor.watch(key.clone(), ctx.auth.clone(), resources)?;

    if matches!(ctx.format, OutputFormat::Text) {
        print_info(&format!(
            "Watching {} every {}s (Ctrl+C to stop)",
            key,
            ctx.config.polling.interval().as_secs()
        ));
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                monitor.stop_all();
                break;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    if !print_event(&event, &stage_set, ctx.format)? {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Watcher events lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    Ok(())
}

/// Print one event. Returns `false` once the watcher has stopped.
fn print_event(
    event: &ProgressEvent,
    stage_set: &StageSet,
    format: OutputFormat,
) -> CliResult<bool> {
    if let OutputFormat::Json = format {
        if let ProgressEvent::Evaluated(snapshot) = event {
            print_json(snapshot.as_ref())?;
        }
        return Ok(!matches!(event, ProgressEvent::Stopped));
    }

    match event {
        ProgressEvent::Evaluated(snapshot) => {
            let bar = render(&snapshot.state, stage_set, None);
            println!(
                "{} {}",
                snapshot.evaluated_at.format("%H:%M:%S").to_string().dimmed(),
                colored_bar(&bar)
            );
        }
        ProgressEvent::StageAdvanced { from, to } => {
            print_success(&format!("Advanced from stage {} to {}", from, to));
        }
        ProgressEvent::StageRegressed { from, to } => {
            print_warning(&format!("Dropped back from stage {} to {}", from, to));
        }
        ProgressEvent::TickSkipped => {
            debug!("Skipped overlapping poll");
        }
        ProgressEvent::RefreshQueued => {
            debug!("Refresh queued behind running evaluation");
        }
        ProgressEvent::Stopped => return Ok(false),
    }
    Ok(true)
}
