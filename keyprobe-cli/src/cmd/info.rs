use std::fmt::Write as _;

use keyprobe_core::variables::{cli_var_name, mask};
use keyprobe_core::{SecretTemplate, TemplateMode};

use crate::cmd::{describe_load_error, load_template};
use crate::exit_codes;
use crate::output::print_failure;
use crate::{TemplateFileArgs, TemplatesArgs};

pub fn info_cmd(templates: &TemplatesArgs, template: Option<&str>, file: TemplateFileArgs) -> i32 {
    match load_template(templates, template, file.template_file.as_ref()) {
        Ok(resolved) => {
            let invocation = match &file.template_file {
                Some(path) => format!("--template-file {}", path.display()),
                None => resolved.identifier.clone(),
            };
            print!("{}", render_info(&resolved.template, &invocation));
            exit_codes::SUCCESS
        }
        Err((identifier, err)) => {
            print_failure(&describe_load_error(&identifier, &err));
            exit_codes::USAGE_ERROR
        }
    }
}

/// Human-readable template summary. Templated values are shown masked.
pub fn render_info(t: &SecretTemplate, invocation: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Template: {}", t.name);
    let _ = writeln!(out, "Description: {}", t.description);
    let _ = writeln!(out, "Mode: {}", t.mode);
    let _ = writeln!(out, "API URL: {}", mask(&t.api_url));
    let _ = writeln!(out, "Method: {}", t.method);
    out.push('\n');

    if t.mode == TemplateMode::Multipart {
        out.push_str("Required Variables:\n");
        for name in &t.required_variables {
            let _ = writeln!(out, "  {name} (--var {}=<value>)", cli_var_name(name));
        }
        out.push('\n');

        let flags: Vec<String> = t
            .required_variables
            .iter()
            .map(|n| format!("--var {}=<value>", cli_var_name(n)))
            .collect();
        out.push_str("Usage:\n");
        let _ = writeln!(out, "  keyprobe validate {invocation} {}", flags.join(" "));
    } else {
        out.push_str("Usage:\n");
        let _ = writeln!(out, "  keyprobe validate {invocation} <secret>");
    }
    out.push('\n');

    if !t.request.headers.is_empty() {
        out.push_str("Request Headers:\n");
        for (k, v) in &t.request.headers {
            let _ = writeln!(out, "  {k}: {}", mask(v));
        }
        out.push('\n');
    }

    if !t.request.query_params.is_empty() {
        out.push_str("Query Parameters:\n");
        for (k, v) in &t.request.query_params {
            let _ = writeln!(out, "  {k}: {}", mask(v));
        }
        out.push('\n');
    }

    let _ = writeln!(out, "Timeout: {}s", t.request.timeout);
    out.push('\n');

    out.push_str("Success Criteria:\n");
    let codes: Vec<String> = t
        .success_criteria
        .status_codes
        .iter()
        .map(u16::to_string)
        .collect();
    let _ = writeln!(out, "  Status Codes: {}", codes.join(", "));
    if !t.success_criteria.required_fields.is_empty() {
        let _ = writeln!(
            out,
            "  Required Fields: {}",
            t.success_criteria.required_fields.join(", ")
        );
    }
    out.push('\n');

    out.push_str("Error Handling:\n");
    let _ = writeln!(out, "  Max Retries: {}", t.error_handling.max_retries);
    let _ = writeln!(out, "  Retry Delay: {}s", t.error_handling.retry_delay);
    if !t.error_handling.error_messages.is_empty() {
        out.push_str("  Error Messages:\n");
        for (code, message) in &t.error_handling.error_messages {
            let _ = writeln!(out, "    {code}: {message}");
        }
    }
    out
}
