//! Gated dashboard actions

use clap::Subcommand;
use onboard_progress::ActionGate;
use onboard_types::ResourceContext;
use serde_json::json;

use super::CommandContext;
use crate::error::CliResult;
use crate::output::{print_json, print_success, print_warning, OutputFormat};

/// Gate subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum GateCommands {
    /// Whether the operator may invite collaborators
    InviteCollaborator,
}

impl GateCommands {
    fn gate(&self) -> ActionGate {
        match self {
            GateCommands::InviteCollaborator => ActionGate::InviteCollaborator,
        }
    }
}

/// Execute a gate command
pub async fn execute(command: GateCommands, ctx: CommandContext) -> CliResult<()> {
    let gate = command.gate();
    ctx.warn_if_signed_out();

    let open = ctx
        .evaluator()
        .evaluate_gate(gate, ctx.gateway()?, &ctx.auth, &ResourceContext::none())
        .await;

    match ctx.format {
        OutputFormat::Json => print_json(&json!({ "gate": gate, "open": open })),
        OutputFormat::Text => {
            if open {
                print_success(&format!("{} is enabled", gate));
            } else {
                print_warning(&format!("{} is disabled until a meter is authorized", gate));
            }
            Ok(())
        }
    }
}
