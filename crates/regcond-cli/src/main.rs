#![forbid(unsafe_code)]

fn main() {
    let mode = regcond_cli::output::OutputMode::detect();
    if let Err(error) = regcond_cli::run_from_env() {
        if mode.should_emit_json() {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("{error}");
        }
        std::process::exit(error.exit_code());
    }
}
