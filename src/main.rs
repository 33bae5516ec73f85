use anyhow::Result;
use simple_shell::{EditorReader, Interpreter, LineSource, StreamReader};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Respects RUST_LOG; quiet unless something goes wrong.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut shell = Interpreter::default();
    let mut source: Box<dyn LineSource> = if io::stdin().is_terminal() {
        Box::new(EditorReader::new()?)
    } else {
        Box::new(StreamReader::new(io::stdin().lock(), io::stdout()))
    };
    shell.repl(&mut source, &mut io::stdout(), &mut io::stderr())
}
