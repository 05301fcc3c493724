mod discovery;

use std::path::{Path, PathBuf};

use crate::error::TemplateError;
use crate::parser::{parse_template_str, DocumentFormat};
use crate::types::SecretTemplate;
use crate::validate::validate_template;

pub use discovery::{discover_templates, display_name};

pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub(crate) const TEMPLATE_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Resolves template identifiers (bare names or file paths) to validated templates.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    templates_dir: PathBuf,
}

impl Default for TemplateLoader {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATES_DIR)
    }
}

impl TemplateLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    pub fn get_template(&self, identifier: &str) -> Result<SecretTemplate, TemplateError> {
        if is_file_path(identifier) {
            load_from_file(Path::new(identifier))
        } else {
            load_from_directory(identifier, &self.templates_dir)
        }
    }
}

/// Anything with a path separator or a template extension is a path, not a name.
pub fn is_file_path(identifier: &str) -> bool {
    identifier.contains('/')
        || identifier.contains('\\')
        || TEMPLATE_EXTENSIONS
            .iter()
            .any(|ext| identifier.ends_with(&format!(".{ext}")))
}

/// read, parse, default-fill, validate.
pub fn load_from_file(path: &Path) -> Result<SecretTemplate, TemplateError> {
    let identifier = path.display().to_string();
    if !path.is_file() {
        return Err(TemplateError::NotFound { identifier });
    }

    let content = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut template = parse_template_str(&content, DocumentFormat::Auto)
        .map_err(|source| TemplateError::Parse {
            identifier: identifier.clone(),
            source,
        })?
        .template;

    template.set_defaults();

    validate_template(&template)
        .map_err(|source| TemplateError::Validation { identifier, source })?;

    Ok(template)
}

pub fn load_from_directory(name: &str, dir: &Path) -> Result<SecretTemplate, TemplateError> {
    if !dir.is_dir() {
        return Err(TemplateError::DirectoryNotFound {
            dir: dir.to_path_buf(),
        });
    }

    for ext in TEMPLATE_EXTENSIONS {
        let candidate = dir.join(format!("{name}.{ext}"));
        if candidate.is_file() {
            return load_from_file(&candidate);
        }
    }

    Err(TemplateError::NotFound {
        identifier: name.to_string(),
    })
}
