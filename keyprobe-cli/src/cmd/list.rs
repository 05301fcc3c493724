use keyprobe_core::{discover_templates, TemplateLoader, TemplateMode};

use crate::exit_codes;
use crate::output::print_error;
use crate::TemplatesArgs;

pub fn list_cmd(templates: &TemplatesArgs) -> i32 {
    let names = match discover_templates(&templates.templates_dir) {
        Ok(n) => n,
        Err(e) => {
            print_error(&e.to_string());
            return exit_codes::USAGE_ERROR;
        }
    };

    if names.is_empty() {
        println!("No templates found.");
        return exit_codes::SUCCESS;
    }

    println!("Available templates ({}):\n", names.len());

    let loader = TemplateLoader::new(&templates.templates_dir);
    for name in &names {
        match loader.get_template(name) {
            Ok(t) => {
                let mode = match &t.mode {
                    TemplateMode::Unset => TemplateMode::Single.to_string(),
                    m => m.to_string(),
                };
                println!("  {:<15} [{:<10}] - {}", t.name, mode, t.description);
            }
            Err(e) => {
                tracing::debug!(template = %name, error = %e, "skipping invalid template");
                println!("  {:<15} [{:<10}] - [Invalid template]", name, "invalid");
            }
        }
    }

    exit_codes::SUCCESS
}
