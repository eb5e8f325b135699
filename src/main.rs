use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use std::fs::File;
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::Mutex;
use std::thread;
use tracing::info;
use tracing_subscriber::EnvFilter;

use maze_carver::config::log_file_from_env;
use maze_carver::session::log_finished;
use maze_carver::terminal::{poll_input, FramePacer, Renderer};
use maze_carver::{CarveStep, Config, Frame, Gameplay, MazeError, Screen, Session, CELL_PIXELS};

fn main() -> Result<(), MazeError> {
    init_logging(log_file_from_env().as_deref())?;
    let config = Config::from_env()?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &config);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, config: &Config) -> Result<(), MazeError> {
    info!("starting session: seed {:#06x}, policy {}", config.seed, config.policy);
    let mut session = Session::from_config(config);
    let mut screen = Screen::new(session.width(), session.height(), CELL_PIXELS);
    let mut renderer = Renderer::new(session.width(), session.height());

    let carving_hud = format!(
        "Carving...  Seed: {:#06x}  Policy: {}",
        config.seed, config.policy
    );
    let mut carver = session.begin(&mut screen);
    renderer.present(stdout, &screen, &carving_hud)?;
    while !carver.is_finished() {
        if let CarveStep::Carved { .. } = carver.step(&mut screen) {
            renderer.present(stdout, &screen, &carving_hud)?;
            if !config.carve_delay.is_zero() {
                thread::sleep(config.carve_delay);
            }
        }
    }
    let maze = carver.finish(&mut screen);
    log_finished(&maze, session.policy());

    let mut game = Gameplay::new(maze);
    let mut pacer = FramePacer::new(config.frame_time());
    loop {
        pacer.wait_for_next_frame();
        let input = poll_input()?;
        if game.frame(&input, &mut screen) == Frame::Quit {
            return Ok(());
        }
        let hud = gameplay_hud(config, &game);
        renderer.present(stdout, &screen, &hud)?;
    }
}

fn gameplay_hud(config: &Config, game: &Gameplay) -> String {
    let state = if game.is_paused() {
        "PAUSED"
    } else if game.goal_reached() {
        "GOAL!"
    } else {
        "Find the diamond"
    };
    format!(
        "{}  Moves: {}  Time: {}s  Seed: {:#06x}  (p pause, q quit)",
        state,
        game.navigator().moves(),
        game.ticks() / config.fps.max(1),
        config.seed
    )
}
