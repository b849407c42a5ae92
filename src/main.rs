//! Reaction TestKit - Terminal reaction-time assessment
//!
//! Hosts the assessment and refresh rate monitor in a single TUI.

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::border,
    widgets::{Block, Borders},
    Terminal,
};
use std::{
    fs::{self, File},
    io::{stdout, Stdout},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use reaction_testkit::{
    config::Config,
    ui::{
        App, AppState, AppView, AssessmentPanel, HelpPanel, StatsBar, StatusBar, TabBar,
        ThemeColors,
    },
};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Route `log` output to a file when RUST_LOG is set.
///
/// stderr belongs to the alternate screen while the TUI runs.
fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let Some(dir) = dirs::data_dir().map(|d| d.join("reaction-testkit")) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    if let Ok(file) = File::create(dir.join("reaction-testkit.log")) {
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Undo everything `setup_terminal` may have done, even partially
fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture, Show);
    raw?;
    screen?;
    Ok(())
}

fn run(terminal: &mut Tui, app: &mut App, config: &Config, quit_requested: &AtomicBool) -> Result<()> {
    let colors = ThemeColors::from_theme(config.ui.theme);
    let tick_rate = config.refresh_interval();
    let regions = &config.assessment.regions;
    let mut panel_area = Rect::default();

    loop {
        if quit_requested.load(Ordering::SeqCst) {
            app.quit();
        }
        if app.state == AppState::Quitting {
            return Ok(());
        }

        app.tick();

        // Draw UI
        terminal.draw(|frame| {
            let size = frame.area();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Tab bar
                    Constraint::Length(1), // Stats bar
                    Constraint::Min(5),    // Main content
                    Constraint::Length(1), // Status bar
                ])
                .split(size);

            let tab_names: Vec<&str> = AppView::all().iter().map(|v| v.name()).collect();
            frame.render_widget(TabBar::new(&tab_names, app.view.index(), colors), chunks[0]);

            let stats = [
                app.region_text(&regions.stage),
                app.region_text(&regions.strikes),
                app.region_text(&regions.last_average),
                app.region_text(&regions.best_average),
                app.region_text(&config.monitor.region),
            ];
            frame.render_widget(StatsBar::new(&stats, colors), chunks[1]);

            match app.view {
                AppView::Help => {
                    panel_area = Rect::default();
                    frame.render_widget(HelpPanel::new(colors), chunks[2]);
                }
                AppView::Assessment => {
                    let block = Block::default()
                        .title(" Reaction ")
                        .borders(Borders::ALL)
                        .border_set(border::ROUNDED)
                        .border_style(Style::default().fg(colors.dim));
                    let inner = block.inner(chunks[2]);
                    frame.render_widget(block, chunks[2]);
                    frame.render_widget(AssessmentPanel::new(app.assessment.display()), inner);
                    panel_area = inner;
                }
            }

            let elapsed = app.elapsed_formatted();
            let status = StatusBar::new(
                app.assessment.state().name(),
                app.view.name(),
                &elapsed,
                app.total_activations,
                colors,
            )
            .message(app.get_status());
            frame.render_widget(status, chunks[3]);
        })?;

        app.frame_rendered();

        if event::poll(app.next_wakeup(tick_rate))? {
            app.handle_event(&event::read()?, panel_area);
        }
    }
}

fn main() -> Result<()> {
    init_logging();

    let quit_requested = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&quit_requested);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("failed to install Ctrl-C handler")?;
    }

    let config = Config::load().unwrap_or_else(|err| {
        log::warn!("using default configuration: {}", err);
        Config::default()
    });

    let mut app = App::new(config.clone()).context("failed to set up assessment")?;

    // The terminal is restored whether or not the loop failed
    let result = setup_terminal()
        .and_then(|mut terminal| run(&mut terminal, &mut app, &config, &quit_requested));
    let restored = restore_terminal();
    result?;
    restored?;

    let session = app.assessment.session();
    println!("\nReaction TestKit session complete.");
    match session.last_average_ms {
        Some(avg) => println!("Last average: {} ms", avg),
        None => println!("Last average: -"),
    }
    match session.best_average_ms {
        Some(best) => println!("Best average: {} ms", best),
        None => println!("Best average: -"),
    }
    println!("Total activations: {}", app.total_activations);
    println!("Session duration: {}", app.elapsed_formatted());

    Ok(())
}
