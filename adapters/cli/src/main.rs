#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Grid Chase experience.
//!
//! Decodes keyboard input into directional commands, feeds them to the
//! engine, and paints the published snapshots back into the terminal. The
//! engine itself never touches a terminal; everything IO-shaped lives here.

mod config;
mod layout_transfer;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use grid_chase_core::{CellKind, Direction, PursuerKind, WELCOME_BANNER};
use grid_chase_engine::Session;
use grid_chase_rendering::{Scene, UnitVisual};
use grid_chase_world::layout::Layout;
use grid_chase_world::World;

use config::TimingConfig;

/// The built-in level: a walled arena with two wrap-around lanes left open
/// and one pursuer of each identity.
const DEFAULT_LAYOUT: [&str; 11] = [
    "###################",
    "#P.......#.......A#",
    "#.##.###.#.###.##.#",
    "#.................#",
    "#.##.#.#####.#.##.#",
    "#....#.D.#...#....#",
    "#.##.#.#####.#.##.#",
    "#.................#",
    "#.##.###.#.###.##.#",
    "#F.......#.......E#",
    "###################",
];

#[derive(Debug, Parser)]
#[command(name = "grid-chase", about = "A toroidal chase game in the terminal")]
struct Args {
    /// Path to a TOML file overriding the loop timing.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Encoded layout string to play instead of the built-in level.
    #[arg(long)]
    layout: Option<String>,

    /// Print the built-in level as an encoded layout string and exit.
    #[arg(long)]
    export_layout: bool,

    /// Run without a terminal UI until the given tick count is reached.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
}

/// Entry point for the Grid Chase command-line interface.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.export_layout {
        println!("{}", layout_transfer::encode(&DEFAULT_LAYOUT));
        return Ok(());
    }

    let world = build_world(args.layout.as_deref())?;
    let timing = TimingConfig::load(args.config.as_deref())?;

    let mut session = Session::new(world, timing.into_session_config());
    session.start();
    if !session.is_running() {
        bail!("the level needs a living player and at least one collectible");
    }

    let outcome = match args.headless {
        Some(ticks) => run_headless(&session, ticks),
        None => run_interactive(&session),
    };
    session.stop();
    outcome?;

    if let Some(snapshot) = session.latest_snapshot() {
        let hud = Scene::from_world(snapshot.world()).hud();
        let verdict = if !hud.alive {
            "caught"
        } else if grid_chase_world::query::remaining_collectibles(snapshot.world()) == 0 {
            "cleared"
        } else {
            "stopped"
        };
        println!(
            "{verdict} after {} ticks with {} points",
            snapshot.tick(),
            hud.score
        );
    }
    Ok(())
}

fn build_world(encoded: Option<&str>) -> anyhow::Result<World> {
    let decoded_rows;
    let rows: Vec<&str> = match encoded {
        Some(value) => {
            decoded_rows = layout_transfer::decode(value).context("decoding --layout")?;
            decoded_rows.iter().map(String::as_str).collect()
        }
        None => DEFAULT_LAYOUT.to_vec(),
    };

    let layout = Layout::parse(&rows).context("parsing level layout")?;
    let mut world = layout.build_world().context("assembling the level")?;
    let _ = world.register_player();
    Ok(world)
}

fn run_headless(session: &Session, ticks: u64) -> anyhow::Result<()> {
    while session.is_running() {
        if session
            .latest_snapshot()
            .is_some_and(|snapshot| snapshot.tick() >= ticks)
        {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    Ok(())
}

fn run_interactive(session: &Session) -> anyhow::Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();

    loop {
        if event::poll(Duration::from_millis(50)).context("polling terminal events")? {
            if let Event::Key(key) = event::read().context("reading terminal events")? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Up | KeyCode::Char('w') => {
                            session.report_command(Direction::North);
                        }
                        KeyCode::Down | KeyCode::Char('s') => {
                            session.report_command(Direction::South);
                        }
                        KeyCode::Left | KeyCode::Char('a') => {
                            session.report_command(Direction::West);
                        }
                        KeyCode::Right | KeyCode::Char('d') => {
                            session.report_command(Direction::East);
                        }
                        _ => {}
                    }
                }
            }
        }

        if let Some(snapshot) = session.latest_snapshot() {
            draw(&mut stdout, &Scene::from_world(snapshot.world()))?;
        }

        if !session.is_running() {
            // Leave the final frame on screen briefly before tearing down.
            std::thread::sleep(Duration::from_millis(750));
            break;
        }
    }
    Ok(())
}

fn draw(stdout: &mut io::Stdout, scene: &Scene) -> anyhow::Result<()> {
    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(ClearType::All)
    )
    .context("clearing the terminal")?;

    write!(stdout, "{WELCOME_BANNER}\r\n\r\n").context("writing the banner")?;
    for row in scene.rows() {
        let line: String = row.iter().map(|tile| glyph(tile.unit, tile.terrain)).collect();
        write!(stdout, "{line}\r\n").context("writing the board")?;
    }

    let hud = scene.hud();
    let status = if hud.alive { "alive" } else { "caught" };
    write!(
        stdout,
        "\r\nscore {:>5}  [{status}]  arrows or wasd to steer, q to quit\r\n",
        hud.score
    )
    .context("writing the heads-up display")?;
    stdout.flush().context("flushing the terminal")?;
    Ok(())
}

fn glyph(unit: Option<UnitVisual>, terrain: CellKind) -> char {
    match unit {
        Some(UnitVisual::PlayerAlive) => '@',
        Some(UnitVisual::PlayerDead) => 'x',
        Some(UnitVisual::Pursuer(PursuerKind::Direct)) => 'D',
        Some(UnitVisual::Pursuer(PursuerKind::Ambush)) => 'A',
        Some(UnitVisual::Pursuer(PursuerKind::Flank)) => 'F',
        Some(UnitVisual::Pursuer(PursuerKind::Erratic)) => 'E',
        Some(UnitVisual::Collectible) => '.',
        None => match terrain {
            CellKind::Wall => '#',
            CellKind::Ground => ' ',
        },
    }
}

/// Puts the terminal into raw alternate-screen mode and restores it on drop,
/// so panics and early returns never leave the shell unusable.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)
            .context("entering the alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}
