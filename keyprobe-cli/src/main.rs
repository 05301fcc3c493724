use clap::Parser;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod logging;
mod output;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(
    name = "keyprobe",
    version,
    about = "Validate API secrets against declarative templates"
)]
struct Cli {
    #[command(flatten)]
    templates: TemplatesArgs,
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.templates, cli.command));
    std::process::exit(exit_code);
}

async fn run_command(templates: TemplatesArgs, command: Command) -> i32 {
    match command {
        Command::Validate {
            template,
            secret,
            vars,
            file,
            log,
            report,
        } => {
            logging::init(&log);
            cmd::validate::validate_cmd(
                &templates,
                template.as_deref(),
                secret.as_deref(),
                &vars,
                file,
                report,
            )
            .await
        }
        Command::List => {
            logging::init(&LogArgs::default());
            cmd::list::list_cmd(&templates)
        }
        Command::Info { template, file } => {
            logging::init(&LogArgs::default());
            cmd::info::info_cmd(&templates, template.as_deref(), file)
        }
    }
}
