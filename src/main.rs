use std::process::ExitCode;

use tsv_fixtures::{logging, Generator};

fn main() -> ExitCode {
    if let Err(error) = tracing::subscriber::set_global_default(logging::get_subscriber()) {
        eprintln!("failed to set up logging: {}", error);
    }

    match Generator::default().run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}
