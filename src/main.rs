// src/main.rs

use eventexec::{RunOutcome, cli, logging, run};

/// Exit status when a handler aborted the event.
const EXIT_ABORTED: i32 = 2;

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(RunOutcome::Aborted) => std::process::exit(EXIT_ABORTED),
        Ok(_) => {}
        Err(err) => {
            eprintln!("eventexec error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<RunOutcome> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
