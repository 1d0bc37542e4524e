//! Conversion workflow submission

use std::collections::BTreeMap;
use std::sync::Arc;

use bridge_traits::library::{
    InputSource, InvocationRequest, LibraryDataset, WorkflowInput, WorkflowInvocation,
    WorkflowRunner,
};
use tracing::{info, instrument};

use crate::error::Result;

/// Stored workflow converting raw files to profile-mode mzML
pub const DEFAULT_CONVERSION_WORKFLOW_ID: &str = "13cea0e6d733b865";

/// Shape of the conversion workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub workflow_id: String,
    /// Step receiving the raw dataset
    pub input_step: String,
    /// Step writing the converted file back to the export
    pub output_step: String,
    /// Parameter of `output_step` holding the absolute output path
    pub output_param: String,
    /// Prefix of the per-run history name
    pub history_prefix: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            workflow_id: DEFAULT_CONVERSION_WORKFLOW_ID.to_string(),
            input_step: "0".to_string(),
            output_step: "2".to_string(),
            output_param: "remote_path".to_string(),
            history_prefix: "conversion of".to_string(),
        }
    }
}

pub struct WorkflowInvoker {
    runner: Arc<dyn WorkflowRunner>,
    settings: WorkflowSettings,
}

impl WorkflowInvoker {
    pub fn new(runner: Arc<dyn WorkflowRunner>, settings: WorkflowSettings) -> Self {
        Self { runner, settings }
    }

    pub fn build_request(&self, dataset: &LibraryDataset, output_path: &str) -> InvocationRequest {
        let mut inputs = BTreeMap::new();
        inputs.insert(
            self.settings.input_step.clone(),
            WorkflowInput {
                id: dataset.id.clone(),
                src: InputSource::LibraryDataset,
            },
        );

        let mut step = BTreeMap::new();
        step.insert(self.settings.output_param.clone(), output_path.to_string());
        let mut parameters = BTreeMap::new();
        parameters.insert(self.settings.output_step.clone(), step);

        InvocationRequest {
            workflow_id: self.settings.workflow_id.clone(),
            inputs,
            parameters,
            history_name: format!("{} {}", self.settings.history_prefix, dataset.name),
        }
    }

    /// Start converting `dataset`, writing the result to `output_path`.
    ///
    /// Returns once the service accepted the run; completion is not awaited.
    #[instrument(skip(self, dataset), fields(dataset_id = %dataset.id))]
    pub async fn invoke_conversion(
        &self,
        dataset: &LibraryDataset,
        output_path: &str,
    ) -> Result<WorkflowInvocation> {
        let request = self.build_request(dataset, output_path);
        let invocation = self.runner.invoke(request).await?;

        info!(
            invocation_id = %invocation.id,
            workflow_id = %invocation.workflow_id,
            "Started conversion of {}",
            dataset.name
        );
        Ok(invocation)
    }
}
