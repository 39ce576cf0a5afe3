//! Session management commands

use clap::Subcommand;
use serde_json::json;

use crate::error::{CliError, CliResult};
use crate::output::{print_info, print_json, print_success, OutputFormat};
use crate::session::{Session, SessionStore};

/// Session subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommands {
    /// Save the --user-id and --token credentials for later commands
    Login,

    /// Show the saved session
    Show,

    /// Forget the saved session
    Logout,
}

/// Execute a session command
pub fn execute(
    command: SessionCommands,
    store: &SessionStore,
    format: OutputFormat,
    user_id: Option<String>,
    token: Option<String>,
) -> CliResult<()> {
    match command {
        SessionCommands::Login => {
            let (Some(user_id), Some(auth_token)) = (user_id, token) else {
                return Err(CliError::InvalidInput(
                    "session login needs --user-id and --token".into(),
                ));
            };
            let session = Session {
                user_id,
                auth_token,
            };
            if !session.auth().is_complete() {
                return Err(CliError::InvalidInput(
                    "user id and token must not be blank".into(),
                ));
            }

            store.save(&session)?;
            print_success(&format!(
                "Signed in as {} ({})",
                session.user_id,
                store.path().display()
            ));
            Ok(())
        }

        SessionCommands::Show => {
            let session = store.load()?;
            let auth = session.as_ref().map(Session::auth);

            match format {
                OutputFormat::Json => print_json(&json!({
                    "signedIn": auth.is_some(),
                    "userId": auth.as_ref().map(|a| a.user_id.as_str()),
                    "token": auth.as_ref().map(|a| a.redacted_token()),
                    "path": store.path(),
                })),
                OutputFormat::Text => {
                    match auth {
                        Some(auth) => {
                            println!("User:  {}", auth.user_id.as_str());
                            println!("Token: {}", auth.redacted_token());
                        }
                        None => print_info("Not signed in"),
                    }
                    Ok(())
                }
            }
        }

        SessionCommands::Logout => {
            if store.clear()? {
                print_success("Signed out");
            } else {
                print_info("No saved session");
            }
            Ok(())
        }
    }
}
