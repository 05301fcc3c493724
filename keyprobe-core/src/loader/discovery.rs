use std::collections::BTreeSet;
use std::path::Path;

use crate::error::TemplateError;

use super::{is_file_path, TEMPLATE_EXTENSIONS};

/// Sorted, de-duplicated stems of every `.yaml`/`.yml` file under `dir`, recursively.
pub fn discover_templates(dir: &Path) -> Result<Vec<String>, TemplateError> {
    if !dir.is_dir() {
        return Err(TemplateError::DirectoryNotFound {
            dir: dir.to_path_buf(),
        });
    }

    let mut names = BTreeSet::new();
    walk(dir, &mut names)?;
    Ok(names.into_iter().collect())
}

fn walk(dir: &Path, names: &mut BTreeSet<String>) -> Result<(), TemplateError> {
    let io_err = |source| TemplateError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            walk(&path, names)?;
            continue;
        }
        let has_template_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| TEMPLATE_EXTENSIONS.contains(&e));
        if !has_template_ext {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.insert(stem.to_string());
        }
    }
    Ok(())
}

/// File stem for paths; names pass through.
pub fn display_name(identifier: &str) -> String {
    if !is_file_path(identifier) {
        return identifier.to_string();
    }
    Path::new(identifier)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(identifier)
        .to_string()
}
