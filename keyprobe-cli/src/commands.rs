use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a secret using the specified template.
    ///
    /// Single mode reads the secret from KEYPROBE_SECRET, or from the SECRET argument.
    /// Multipart mode reads KEYPROBE_VAR_<NAME> for each required variable, or --var flags.
    /// Environment variables keep secrets out of shell history and process lists.
    Validate {
        /// Template name, looked up in the templates directory.
        #[arg(required_unless_present = "template_file")]
        template: Option<String>,
        secret: Option<String>,
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
        #[command(flatten)]
        file: TemplateFileArgs,
        #[command(flatten)]
        log: LogArgs,
        #[command(flatten)]
        report: ReportArgs,
    },
    /// List all available templates.
    List,
    /// Show detailed information about a template.
    Info {
        #[arg(required_unless_present = "template_file")]
        template: Option<String>,
        #[command(flatten)]
        file: TemplateFileArgs,
    },
}
