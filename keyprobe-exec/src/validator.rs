use keyprobe_core::variables::missing_variables;
use keyprobe_core::{SecretTemplate, TemplateMode, VariableSet};
use uuid::Uuid;

use crate::error::UsageError;
use crate::executor::{Event, Executor, ValidationOutcome};

/// Entry points for the two validation modes.
///
/// Usage errors are returned before any request is sent; everything that happens on the wire
/// ends up in the outcome instead.
pub struct SecretValidator {
    executor: Executor,
}

impl SecretValidator {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub async fn validate_single(
        &self,
        template: &SecretTemplate,
        secret: &str,
    ) -> Result<ValidationOutcome, UsageError> {
        let run_id = self.start(template).await;
        self.require_mode(run_id, template, TemplateMode::Single)
            .await?;
        Ok(self
            .executor
            .execute(run_id, template, &VariableSet::single(secret))
            .await)
    }

    pub async fn validate_multipart(
        &self,
        template: &SecretTemplate,
        vars: &VariableSet,
    ) -> Result<ValidationOutcome, UsageError> {
        let run_id = self.start(template).await;
        self.require_mode(run_id, template, TemplateMode::Multipart)
            .await?;

        let missing = missing_variables(&template.required_variables, vars);
        if !missing.is_empty() {
            return Err(self
                .reject(run_id, template, UsageError::MissingVariables(missing))
                .await);
        }

        Ok(self.executor.execute(run_id, template, vars).await)
    }

    /// Dispatches on the template's mode. Single mode reads the `SECRET` entry of `vars`.
    pub async fn validate(
        &self,
        template: &SecretTemplate,
        vars: &VariableSet,
    ) -> Result<ValidationOutcome, UsageError> {
        match template.mode {
            TemplateMode::Multipart => self.validate_multipart(template, vars).await,
            _ => {
                let secret = vars
                    .expose(keyprobe_core::SECRET_VARIABLE)
                    .unwrap_or_default();
                self.validate_single(template, secret).await
            }
        }
    }

    async fn start(&self, template: &SecretTemplate) -> Uuid {
        let run_id = Uuid::new_v4();
        self.executor
            .event_sink()
            .emit(Event::ValidationStarted {
                run_id,
                template: template.name.clone(),
                mode: template.mode.to_string(),
            })
            .await;
        run_id
    }

    async fn require_mode(
        &self,
        run_id: Uuid,
        template: &SecretTemplate,
        expected: TemplateMode,
    ) -> Result<(), UsageError> {
        if template.mode == expected {
            return Ok(());
        }
        let err = UsageError::ModeMismatch {
            template: template.name.clone(),
            expected,
            actual: template.mode.clone(),
        };
        Err(self.reject(run_id, template, err).await)
    }

    async fn reject(&self, run_id: Uuid, template: &SecretTemplate, err: UsageError) -> UsageError {
        self.executor
            .event_sink()
            .emit(Event::UsageRejected {
                run_id,
                template: template.name.clone(),
                reason: err.to_string(),
            })
            .await;
        err
    }
}
