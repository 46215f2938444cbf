use std::process::ExitCode;

fn main() -> ExitCode {
    match econ_snapshot::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
