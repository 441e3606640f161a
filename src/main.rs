use std::process::ExitCode;

fn main() -> ExitCode {
    devicecheck_lib::run()
}
