use std::process::ExitCode;

fn main() -> ExitCode {
    ontograph::cli::main()
}
