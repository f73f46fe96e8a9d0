use std::fs::File;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pacman_canvas::canvas::Raster;
use pacman_canvas::components::Direction;
use pacman_canvas::player::intent_for;
use pacman_canvas::render::{paint, surface_size};
use pacman_canvas::screen::Screen;
use pacman_canvas::{LogSettings, Session, Settings};

enum Command {
    Steer(Direction),
    Restart,
    Quit,
}

fn command_for(key: KeyEvent) -> Option<Command> {
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
            code => intent_for(code).map(Command::Steer),
        },
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    // The subscriber goes first so rejected settings are logged.
    init_logging(&LogSettings::from_env())?;
    let settings = Settings::from_env();

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &settings);
    let restored = restore(&mut stdout, terminal::disable_raw_mode);
    result.and(restored)
}

/// Runs every restore step even when an earlier one fails; the first error wins.
fn restore<W: Write>(
    out: &mut W,
    disable_raw_mode: impl FnOnce() -> io::Result<()>,
) -> anyhow::Result<()> {
    let show = out.execute(Show).map(|_| ());
    let leave = out.execute(LeaveAlternateScreen).map(|_| ());
    let raw = disable_raw_mode();
    show.and(leave).and(raw).context("failed to restore the terminal")
}

fn init_logging(log: &LogSettings) -> anyhow::Result<()> {
    let Some(path) = &log.path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("cannot open log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&log.level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, settings: &Settings) -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    let mut session = Session::new(settings.variant, settings.tuning.clone())?;
    let (w, h) = surface_size(&session);
    let mut raster = Raster::new(w, h, settings.scale);
    let mut screen = Screen::new(&raster);
    let tick = settings.tick();
    let frame_time = settings.frame_time();
    info!(?settings, "starting");

    let epoch = Instant::now();
    let mut last_tick = Instant::now();
    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match command_for(key) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Restart) => session.restart(),
                    Some(Command::Steer(dir)) => session.request(dir),
                    None => {}
                }
            }
        }

        // Game over only stops the gameplay step; drawing and input carry on.
        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            session.frame(epoch.elapsed(), &mut rng);
        }

        paint(&mut raster, &session, epoch.elapsed());
        screen.present(stdout, terminal::size()?, &raster, &session.hud())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
