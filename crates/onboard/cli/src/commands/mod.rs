//! CLI command implementations

pub mod evaluate;
pub mod gate;
pub mod session;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use onboard_gateway::{HttpGateway, ResourceGateway};
use onboard_progress::{Evaluator, ProgressConfig};
use onboard_types::{AuthContext, DashboardVariant, FacilityRecord, ResourceContext};

use crate::error::{CliError, CliResult};
use crate::output::{print_warning, OutputFormat};

/// Shared state handed to every command.
pub struct CommandContext {
    pub config: ProgressConfig,
    pub auth: AuthContext,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn gateway(&self) -> CliResult<Arc<dyn ResourceGateway>> {
        Ok(Arc::new(HttpGateway::new(&self.config.gateway)?))
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.config.evaluation.clone())
    }

    /// Warn once when evaluation will short-circuit to the baseline.
    pub fn warn_if_signed_out(&self) {
        if !self.auth.is_complete() && matches!(self.format, OutputFormat::Text) {
            print_warning("Not signed in; progress stays at the baseline stage");
        }
    }
}

/// Selects the dashboard view to evaluate.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Dashboard variant (operator, commercial, residential)
    #[arg(long, default_value = "operator")]
    pub variant: DashboardVariant,

    /// Facility to fetch from the backend
    #[arg(long, conflicts_with = "facility_file")]
    pub facility_id: Option<String>,

    /// Facility record already on hand, as JSON
    #[arg(long)]
    pub facility_file: Option<PathBuf>,
}

impl ViewArgs {
    /// Resource context for the selected view.
    pub fn resources(&self) -> CliResult<ResourceContext> {
        let Some(kind) = self.variant.facility_kind() else {
            if self.facility_id.is_some() || self.facility_file.is_some() {
                return Err(CliError::InvalidInput(
                    "the operator view does not take a facility".into(),
                ));
            }
            return Ok(ResourceContext::none());
        };

        if let Some(path) = &self.facility_file {
            let contents = std::fs::read_to_string(path)?;
            let record = FacilityRecord::from_value(serde_json::from_str(&contents)?);
            return Ok(ResourceContext::with_facility(kind, record));
        }

        match &self.facility_id {
            Some(id) => Ok(ResourceContext::with_facility_id(kind, id.as_str())),
            None => Err(CliError::InvalidInput(format!(
                "the {} view needs --facility-id or --facility-file",
                self.variant
            ))),
        }
    }
}
