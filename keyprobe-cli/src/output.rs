pub const SUCCESS_INDICATOR: &str = "[SUCCESS]";
pub const FAILURE_INDICATOR: &str = "[FAILED]";

pub const SECRET_IN_ARGS_WARNING: &str = "\
[WARNING] Passing secrets as command-line arguments is not secure.
          Secrets will be exposed in:
          - Shell history (~/.bash_history, ~/.zsh_history)
          - Process lists (ps, top, htop)
          - System logs and monitoring tools

          Recommended: Use environment variables instead:
          - Single mode: export KEYPROBE_SECRET=\"your-secret\"
          - Multipart mode: export KEYPROBE_VAR_API_KEY=\"value\"
";

pub fn print_success(quiet: bool, message: &str) {
    if quiet {
        return;
    }
    println!("{SUCCESS_INDICATOR} {message}");
}

/// Failures always print, whatever the quiet setting.
pub fn print_failure(message: &str) {
    eprintln!("{FAILURE_INDICATOR} {message}");
}

pub fn print_error(message: &str) {
    eprintln!("error: {message}");
}

pub fn warn_secret_in_args() {
    eprint!("{SECRET_IN_ARGS_WARNING}");
}
