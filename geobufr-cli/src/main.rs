//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::init();
    if let Err(err) = geobufr_cli::run() {
        eprintln!("geobufr: {err}");
        std::process::exit(1);
    }
}
