use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use log::LevelFilter;

mod advisor;
mod app;
mod command;
mod config;
mod headless;
mod tui_logger;
mod ui;

use app::App;
use command::{Command, CHIPS};
use config::Config;
use tui_logger::TuiLogger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let config = Config::parse();

    if config.json {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
        let table = config.open_table()?;
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        return headless::run(table, &config, stdin, tokio::io::stdout()).await;
    }

    let log_buffer = TuiLogger::install(LevelFilter::Info)?;
    let table = config.open_table()?;

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(table, &config, Some(log_buffer));
    let res = run_app(&mut terminal, app).await;

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err}");
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<(), Box<dyn Error>>
where
    B::Error: 'static,
{
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui::ui(f, &app))?;

        // Poll with a timeout so timers keep running between keys
        if !event::poll(Duration::from_millis(50))? {
            tokio::task::yield_now().await;
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let command = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Char('l') | KeyCode::Char('L') => {
                app.toggle_log();
                continue;
            }
            KeyCode::Char(c @ '1'..='5') => {
                let chip = CHIPS[c as usize - '1' as usize];
                Command::Bet(chip)
            }
            KeyCode::Char('c') | KeyCode::Char('C') => Command::Clear,
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Enter => Command::Deal,
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Up => Command::Hit,
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Command::Stand,
            KeyCode::Char('n') | KeyCode::Char('N') => Command::Reset,
            _ => continue,
        };
        app.handle(command, Instant::now())?;
    }
}
