use std::time::Duration;

use hilo_blackjack::{GamePhase, Table, TableEvent};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::advisor::{Advisor, BasicStrategyAdvisor, Debouncer, THINKING};
use crate::command::Command;
use crate::config::Config;

/// One line of output.
#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum FeedLine<'a> {
    Event(&'a TableEvent),
    View(hilo_blackjack::TableView),
    Rejected(String),
}

/// Play from a command stream, writing the table as JSON lines.
pub async fn run<R, W>(
    table: Table,
    config: &Config,
    input: R,
    output: W,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    run_with(BasicStrategyAdvisor, table, config, input, output).await
}

/// Like [`run`], with a chosen advisor. Advice is fetched in the background;
/// commands keep flowing while it is pending and a fresh view is written when
/// it lands.
pub async fn run_with<A, R, W>(
    advisor: A,
    mut table: Table,
    config: &Config,
    input: R,
    mut output: W,
) -> Result<(), Box<dyn std::error::Error>>
where
    A: Advisor + Send + Sync + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let pause = config.dealer_pause();
    let (mut debouncer, mut suggestions) =
        Debouncer::new(advisor, config.advisor_delay(), config.advisor_timeout());
    emit_events(&mut table, &mut output, Duration::ZERO).await?;
    emit(&mut output, &FeedLine::View(table.view())).await?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let command: Command = match line.parse() {
                    Ok(command) => command,
                    Err(e) => {
                        emit(&mut output, &FeedLine::Rejected(e.to_string())).await?;
                        continue;
                    }
                };
                if command == Command::Quit {
                    break;
                }

                match command.apply(&mut table) {
                    Ok(()) => {}
                    Err(e) if e.is_fatal() => {
                        log::error!("Session over: {e}");
                        return Err(e.into());
                    }
                    Err(e) => {
                        log::debug!("{e}");
                        emit(&mut output, &FeedLine::Rejected(e.to_string())).await?;
                        continue;
                    }
                }

                advise(&mut table, &mut debouncer, command);
                emit_events(&mut table, &mut output, pause).await?;
                emit(&mut output, &FeedLine::View(table.view())).await?;
            }
            Some(suggestion) = suggestions.recv() => {
                if debouncer.is_current(&suggestion) && table.phase() == GamePhase::PlayerTurn {
                    table.set_advisory(suggestion.text);
                    emit(&mut output, &FeedLine::View(table.view())).await?;
                } else {
                    log::debug!("Dropping stale advice from request {}", suggestion.generation);
                }
            }
        }
    }
    Ok(())
}

fn advise<A>(table: &mut Table, debouncer: &mut Debouncer<A>, command: Command)
where
    A: Advisor + Send + Sync + 'static,
{
    if table.phase() != GamePhase::PlayerTurn {
        debouncer.cancel();
        table.clear_advisory();
        return;
    }
    if command.changes_hand() {
        if let Some(request) = table.advisory_request() {
            debouncer.schedule(request);
            table.set_advisory(THINKING);
        }
    }
}

/// Write queued events, pausing before each dealer step.
async fn emit_events<W: AsyncWrite + Unpin>(
    table: &mut Table,
    output: &mut W,
    pause: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    for event in table.take_events() {
        let dealer_step = matches!(
            event,
            TableEvent::HoleRevealed(_) | TableEvent::DealerDrew(_) | TableEvent::DealerStood(_)
        );
        if dealer_step && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        emit(output, &FeedLine::Event(&event)).await?;
    }
    Ok(())
}

async fn emit<W: AsyncWrite + Unpin>(
    output: &mut W,
    line: &FeedLine<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut json = serde_json::to_string(line)?;
    json.push('\n');
    output.write_all(json.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
