use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use orbit_core::{
    AnswerCallback, Config, InterviewDriver, InterviewState, Notice, OrbitClient,
    QuestionRenderer, RecordingLogger, ResultsRenderer, ResultsView,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::Terminal;

/// ORBIT: adaptive interview in the terminal
#[derive(Parser, Debug)]
#[command(name = "orbit")]
#[command(about = "Take the ORBIT adaptive interview", long_about = None)]
struct Cli {
    /// API base URL (if not provided, will use ORBIT_API_URL environment variable)
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the interview on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }

    let recording_logger = if config.recording_enabled {
        info!(
            "Recording requests to {}",
            config.recording_log_path.display()
        );
        Some(RecordingLogger::new(config.recording_log_path.clone()))
    } else {
        None
    };

    let client = OrbitClient::new_with_recording(&config, recording_logger)?;
    info!("Using ORBIT API at {}", client.base_url());

    let mut driver = InterviewDriver::new(Arc::new(client), config.result_retry);
    let stdin = io::stdin();
    let mut terminal = Terminal::new(stdin.lock(), io::stdout());

    run(&mut driver, &mut terminal).await
}

/// Drive the interview until the user quits.
async fn run<R: BufRead, W: Write>(
    driver: &mut InterviewDriver,
    terminal: &mut Terminal<R, W>,
) -> Result<()> {
    loop {
        let notices = match driver.state() {
            InterviewState::Idle => {
                if !terminal.confirm("Start a new interview?")? {
                    return Ok(());
                }
                terminal.show_waiting()?;
                driver.start().await
            }

            InterviewState::Interviewing { question, .. } => {
                let question = question.clone();
                let event =
                    terminal.render_question(&question, AnswerCallback::for_question(&question))?;
                terminal.show_waiting()?;
                driver.process_event(event).await
            }

            InterviewState::CompletePending { .. } => {
                if terminal.confirm("Try fetching your results again?")? {
                    terminal.show_waiting()?;
                    driver.retry_result().await
                } else if terminal.confirm("Abandon this interview and start over?")? {
                    driver.reset().await
                } else {
                    return Ok(());
                }
            }

            InterviewState::Done { result, reason } => {
                let view = ResultsView::new(result, reason.as_ref());
                terminal.render_results(&view)?;
                if !terminal.confirm("Take the interview again?")? {
                    return Ok(());
                }
                driver.reset().await
            }

            // The driver settles before returning, so a request can never
            // be in flight here
            busy @ (InterviewState::Starting
            | InterviewState::Submitting { .. }
            | InterviewState::Fetching { .. }) => {
                bail!("interview stopped in {} state", busy.name())
            }
        };

        show_notices(terminal, &notices)?;
    }
}

fn show_notices<R: BufRead, W: Write>(
    terminal: &mut Terminal<R, W>,
    notices: &[Notice],
) -> Result<()> {
    for notice in notices {
        terminal.show_notice(notice)?;
    }
    Ok(())
}
