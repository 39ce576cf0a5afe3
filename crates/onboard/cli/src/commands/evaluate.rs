//! One-shot progress evaluation

use clap::Args;
use colored::*;
use onboard_progress::{click, render, ClickOutcome, CompletionPolicy, ExecutionMode, StageSet};
use onboard_types::StageId;
use serde_json::json;

use super::{CommandContext, ViewArgs};
use crate::error::{CliError, CliResult};
use crate::output::{colored_bar, print_json, print_outcomes, print_success, OutputFormat};

/// Arguments for `onboard evaluate`
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Completion policy (contiguous, highest-true)
    #[arg(long)]
    pub policy: Option<CompletionPolicy>,

    /// Run stage checks concurrently
    #[arg(long)]
    pub concurrent: bool,

    /// Stage to show the tooltip for
    #[arg(long)]
    pub hover: Option<u32>,
}

/// Execute `onboard evaluate`
pub async fn execute(args: EvaluateArgs, mut ctx: CommandContext) -> CliResult<()> {
    if let Some(policy) = args.policy {
        ctx.config.evaluation.policy = policy;
    }
    if args.concurrent {
        ctx.config.evaluation.mode = ExecutionMode::Concurrent;
    }

    let hover = match args.hover {
        Some(id) => Some(
            StageId::new(id)
                .ok_or_else(|| CliError::InvalidInput(format!("stage {} does not exist", id)))?,
        ),
        None => None,
    };

    let resources = args.view.resources()?;
    let stage_set = StageSet::for_variant(args.view.variant, ctx.gateway()?);
    ctx.warn_if_signed_out();

    let evaluation = ctx
        .evaluator()
        .evaluate_detailed(&stage_set, &ctx.auth, &resources)
        .await;
    let bar = render(&evaluation.state, &stage_set, hover);
    let next = click(&evaluation.state, &stage_set, evaluation.state.next_stage);

    match ctx.format {
        OutputFormat::Json => print_json(&json!({
            "variant": args.view.variant,
            "policy": ctx.config.evaluation.policy,
            "state": evaluation.state,
            "outcomes": evaluation.outcomes,
            "bar": bar,
            "next": next,
        })),
        OutputFormat::Text => {
            println!("{} {}", "Dashboard:".bold(), args.view.variant);
            println!("{}", colored_bar(&bar));
            println!();
            print_outcomes(&evaluation.outcomes);
            println!();

            match next {
                ClickOutcome::Remediate { stage, remediation } => {
                    let label = stage_set
                        .get(stage)
                        .map(|s| s.label.as_str())
                        .unwrap_or_default();
                    println!("{} {} ({})", "Next:".bold(), label, remediation.to_string().cyan());
                }
                ClickOutcome::Ignored if evaluation.state.is_terminal() => {
                    print_success("Onboarding complete");
                }
                ClickOutcome::Ignored => {}
            }
            Ok(())
        }
    }
}
