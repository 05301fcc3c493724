use std::sync::Arc;

use keyprobe_core::variables::parse_var_args;
use keyprobe_core::{SecretTemplate, TemplateMode, VariableSet, SECRET_VARIABLE};
use keyprobe_exec::report::{ReportContext, TemplateSource, ValidationReport};
use keyprobe_exec::{write_report, Executor, SecretValidator, TracingEventSink};

use crate::cmd::{describe_load_error, load_template, template_identifier};
use crate::exit_codes;
use crate::output::{print_error, print_failure, print_success, warn_secret_in_args};
use crate::{ReportArgs, TemplateFileArgs, TemplatesArgs};

pub const ENV_SECRET: &str = "KEYPROBE_SECRET";
pub const ENV_VAR_PREFIX: &str = "KEYPROBE_VAR_";

/// Variables gathered for a run, and whether any of them came from the command line.
#[derive(Debug)]
pub struct SecretIntake {
    pub vars: VariableSet,
    pub from_args: bool,
}

pub async fn validate_cmd(
    templates: &TemplatesArgs,
    template: Option<&str>,
    secret: Option<&str>,
    var_args: &[String],
    file: TemplateFileArgs,
    report: ReportArgs,
) -> i32 {
    // With --template-file, a single positional is the secret.
    let (name, secret) = match (&file.template_file, template, secret) {
        (Some(_), Some(first), None) => (None, Some(first)),
        _ => (template, secret),
    };

    let source = if file.template_file.is_some() {
        TemplateSource::File
    } else {
        TemplateSource::Builtin
    };
    let mut ctx = ReportContext::new(
        template_identifier(name, file.template_file.as_deref()),
        source,
    );
    tracing::info!("starting secret validation");

    let resolved = match load_template(templates, name, file.template_file.as_ref()) {
        Ok(r) => r,
        Err((identifier, err)) => {
            tracing::debug!(error = %err, "template load failed");
            let message = describe_load_error(&identifier, &err);
            return fail_before_run(&report, &ctx, None, &message);
        }
    };
    if resolved.from_file {
        ctx.source = TemplateSource::File;
    }
    let template = &resolved.template;

    let env = |key: &str| std::env::var(key).ok();
    let intake = match template.mode {
        TemplateMode::Multipart => multipart_intake(template, secret, var_args, &env),
        _ => single_intake(secret, var_args, &env),
    };
    let intake = match intake {
        Ok(i) => i,
        Err(message) => return fail_before_run(&report, &ctx, Some(template), &message),
    };
    if intake.from_args {
        warn_secret_in_args();
    }
    let ctx = ctx.with_variables(intake.vars.names());

    let executor = match Executor::with_default_client() {
        Ok(e) => e.with_events(Arc::new(TracingEventSink)),
        Err(e) => {
            print_error(&format!("failed to create HTTP client: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let validator = SecretValidator::new(executor);

    let outcome = match validator.validate(template, &intake.vars).await {
        Ok(o) => o,
        Err(e) => return fail_before_run(&report, &ctx, Some(template), &e.to_string()),
    };

    if let Some(path) = &report.output_json {
        let full = ValidationReport::from_outcome(&ctx, template, &outcome);
        if let Err(e) = write_report(path, &full) {
            print_error(&format!("failed to write JSON output: {e}"));
        }
    }

    if outcome.result.is_valid() {
        tracing::info!(attempts = outcome.attempts, "validation successful");
        print_success(report.json_only, outcome.result.detail());
        exit_codes::SUCCESS
    } else {
        tracing::info!(attempts = outcome.attempts, "validation failed");
        print_failure(outcome.result.detail());
        exit_codes::SECRET_INVALID
    }
}

fn fail_before_run(
    report: &ReportArgs,
    ctx: &ReportContext,
    template: Option<&SecretTemplate>,
    message: &str,
) -> i32 {
    if let Some(path) = &report.output_json {
        let error_report = ValidationReport::from_error(ctx, template, message);
        if let Err(e) = write_report(path, &error_report) {
            tracing::warn!(error = %e, "could not write error report");
        }
    }
    print_failure(message);
    exit_codes::USAGE_ERROR
}

/// `KEYPROBE_SECRET` first, then the positional argument.
pub fn single_intake(
    secret: Option<&str>,
    var_args: &[String],
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<SecretIntake, String> {
    if !var_args.is_empty() {
        return Err("--var arguments not allowed in single mode".to_string());
    }

    if let Some(value) = env(ENV_SECRET).filter(|v| !v.is_empty()) {
        return Ok(SecretIntake {
            vars: VariableSet::single(value),
            from_args: false,
        });
    }

    match secret {
        Some(value) if !value.is_empty() => Ok(SecretIntake {
            vars: VariableSet::single(value),
            from_args: true,
        }),
        _ => Err(format!(
            "secret required. Provide via {ENV_SECRET} environment variable or command-line argument"
        )),
    }
}

/// `KEYPROBE_VAR_<NAME>` per required variable, falling back to `--var` flags.
pub fn multipart_intake(
    template: &SecretTemplate,
    secret: Option<&str>,
    var_args: &[String],
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<SecretIntake, String> {
    if secret.is_some() {
        return Err(format!(
            "secret argument not allowed in multipart mode. Use --var or {ENV_VAR_PREFIX}* environment variables instead"
        ));
    }

    let flags = parse_var_args(var_args).map_err(|e| e.to_string())?;
    let unexpected: Vec<&str> = flags
        .names()
        .filter(|n| {
            *n == SECRET_VARIABLE || !template.required_variables.iter().any(|r| r.as_str() == *n)
        })
        .collect();
    if !unexpected.is_empty() {
        return Err(format!("Unexpected variables: {}", unexpected.join(", ")));
    }

    let mut vars = VariableSet::new();
    let mut from_args = false;
    for name in &template.required_variables {
        if let Some(value) = env(&format!("{ENV_VAR_PREFIX}{name}")).filter(|v| !v.is_empty()) {
            vars.insert(name.clone(), value);
        } else if let Some(value) = flags.expose(name) {
            vars.insert(name.clone(), value);
            from_args = true;
        }
    }

    Ok(SecretIntake { vars, from_args })
}
