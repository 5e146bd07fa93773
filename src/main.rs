use std::process::ExitCode;

fn main() -> ExitCode {
    rawhttp::app::run()
}
