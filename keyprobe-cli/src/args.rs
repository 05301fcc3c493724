use std::path::PathBuf;

use clap::Args;
use keyprobe_core::loader::DEFAULT_TEMPLATES_DIR;

#[derive(Debug, Args, Clone)]
pub struct TemplatesArgs {
    /// Directory holding the built-in templates.
    #[arg(
        long,
        env = "KEYPROBE_TEMPLATES_DIR",
        default_value = DEFAULT_TEMPLATES_DIR,
        global = true
    )]
    pub templates_dir: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct TemplateFileArgs {
    /// Load the template from this file instead of the templates directory.
    #[arg(long, value_name = "FILE")]
    pub template_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone, Default)]
pub struct LogArgs {
    #[arg(long, short)]
    pub verbose: bool,
    #[arg(long, short)]
    pub debug: bool,
}

#[derive(Debug, Args, Clone, Default)]
pub struct ReportArgs {
    /// Write a structured validation report to this file.
    #[arg(long = "output-json", short = 'o', value_name = "FILE")]
    pub output_json: Option<PathBuf>,
    /// Suppress the success line when a report file is written.
    #[arg(long, requires = "output_json")]
    pub json_only: bool,
}
