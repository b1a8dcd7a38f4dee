//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    hitfactor_cli::logging::init();
    if let Err(err) = hitfactor_cli::run() {
        eprintln!("hitfactor: {err}");
        std::process::exit(1);
    }
}
