pub mod info;
pub mod list;
pub mod validate;

use std::path::{Path, PathBuf};

use keyprobe_core::loader::{is_file_path, load_from_file};
use keyprobe_core::{SecretTemplate, TemplateError, TemplateLoader};

use crate::TemplatesArgs;

/// A template together with how the user named it.
pub struct ResolvedTemplate {
    pub identifier: String,
    pub from_file: bool,
    pub template: SecretTemplate,
}

pub fn template_identifier(name: Option<&str>, file: Option<&Path>) -> String {
    match file {
        Some(path) => path.display().to_string(),
        None => name.unwrap_or_default().to_string(),
    }
}

pub fn load_template(
    templates: &TemplatesArgs,
    name: Option<&str>,
    file: Option<&PathBuf>,
) -> Result<ResolvedTemplate, (String, TemplateError)> {
    let identifier = template_identifier(name, file.map(PathBuf::as_path));
    let loaded = match file {
        Some(path) => load_from_file(path),
        None => TemplateLoader::new(&templates.templates_dir).get_template(&identifier),
    };
    match loaded {
        Ok(template) => {
            tracing::info!(template = %identifier, name = %template.name, "template loaded");
            Ok(ResolvedTemplate {
                from_file: file.is_some() || is_file_path(&identifier),
                identifier,
                template,
            })
        }
        Err(e) => Err((identifier, e)),
    }
}

pub fn describe_load_error(identifier: &str, err: &TemplateError) -> String {
    if err.is_not_found() {
        format!("Template '{identifier}' not found")
    } else {
        format!("Template '{identifier}' is invalid: {err}")
    }
}
