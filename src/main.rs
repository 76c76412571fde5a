use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor, execute,
    style::{Color, ResetColor},
    terminal::{self, EnableLineWrap, EndSynchronizedUpdate, LeaveAlternateScreen},
};
use log::{warn, LevelFilter};
use std::{
    fs::File,
    io::{self, Stdout, Write},
    path::{Path, PathBuf},
};
use termball::{
    run, Arena, Config, FramePacer, Preset, RenderOptions, RunLength, SideBounce, Simulation,
    TerminalInput, TerminalRenderer,
};

#[derive(Parser, Debug)]
#[command(name = "termball")]
#[command(about = "A ball bouncing around the terminal. WASD or arrows to push it, Q to quit.", long_about = None)]
struct Args {
    /// starting set of constants; the flags below override it
    #[arg(long, value_enum, default_value_t = Preset::Endless)]
    preset: Preset,

    /// frames (and physics steps) per second
    #[arg(long)]
    fps: Option<u32>,

    /// stop after this many seconds, 0 runs until Q
    #[arg(long)]
    seconds: Option<u32>,

    /// arena width in columns
    #[arg(long)]
    width: Option<u16>,

    /// arena height in rows
    #[arg(long)]
    height: Option<u16>,

    /// downward acceleration, rows per second squared
    #[arg(long)]
    gravity: Option<f64>,

    /// fraction of speed lost on each bounce
    #[arg(long)]
    damping: Option<f64>,

    /// side walls reverse the ball without slowing it
    #[arg(long, default_value_t = false)]
    elastic_walls: bool,

    /// ball radius in rows
    #[arg(long)]
    radius: Option<u16>,

    #[arg(long, value_enum, default_value_t = Palette::Magenta)]
    color: Palette,

    /// draw with the terminal's own colors
    #[arg(long, default_value_t = false)]
    no_color: bool,

    #[arg(long, default_value_t = false)]
    no_ground: bool,

    #[arg(long, default_value_t = false)]
    no_header: bool,

    /// write log records here instead of stderr (filter with RUST_LOG);
    /// records below warn are only written when this is set
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Palette {
    Magenta,
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
    White,
}

impl Palette {
    fn color(self) -> Color {
        match self {
            Palette::Magenta => Color::Magenta,
            Palette::Red => Color::Red,
            Palette::Green => Color::Green,
            Palette::Yellow => Color::Yellow,
            Palette::Blue => Color::Blue,
            Palette::Cyan => Color::Cyan,
            Palette::White => Color::White,
        }
    }
}

fn settings(args: &Args) -> (Config, RenderOptions) {
    let mut cfg = Config::preset(args.preset);

    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    let default_secs = match args.preset {
        Preset::Endless => 0,
        Preset::Timed => 30,
    };
    cfg.run_length = RunLength::seconds(args.seconds.unwrap_or(default_secs), cfg.fps);

    if args.width.is_some() || args.height.is_some() || args.radius.is_some() {
        cfg.arena = Arena::new(
            args.width.unwrap_or(cfg.arena.width),
            args.height.unwrap_or(cfg.arena.height),
        );
        cfg.radius = args.radius.unwrap_or(cfg.radius);
        cfg.initial_pos = cfg.default_start();
    }
    if let Some(g) = args.gravity {
        cfg.gravity = g;
    }
    if let Some(d) = args.damping {
        cfg.bounce_damping = d;
    }
    if args.elastic_walls {
        cfg.side_bounce = SideBounce::Elastic;
    }

    let decorated = args.preset == Preset::Endless;
    let opts = RenderOptions {
        color: (!args.no_color).then(|| args.color.color()),
        header: decorated && !args.no_header,
        ground: decorated && !args.no_ground,
    };
    (cfg, opts)
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(p) = path {
        let file =
            File::create(p).with_context(|| format!("could not create log file {}", p.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    log::set_max_level(console_level(log::max_level(), path.is_some()));
    Ok(())
}

/// stderr shares the screen with the animation, so chatty levels only go to a file.
fn console_level(requested: LevelFilter, to_file: bool) -> LevelFilter {
    if to_file {
        requested
    } else {
        requested.min(LevelFilter::Warn)
    }
}

/// Puts the terminal back on drop, including while unwinding from a panic.
struct TermGuard<W: Write> {
    out: W,
    raw: bool,
}

impl TermGuard<Stdout> {
    fn new() -> Result<Self> {
        terminal::enable_raw_mode().context("could not enable raw mode")?;
        Ok(Self {
            out: io::stdout(),
            raw: true,
        })
    }
}

impl<W: Write> Drop for TermGuard<W> {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            EndSynchronizedUpdate,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        if self.raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let (cfg, opts) = settings(&args);
    cfg.validate()?;

    let needed_rows = cfg
        .arena
        .height
        .saturating_add(u16::from(opts.header) + u16::from(opts.ground));
    if let Ok((cols, rows)) = terminal::size() {
        if cols < cfg.arena.width || rows < needed_rows {
            warn!(
                "terminal is {cols}x{rows}, arena needs {}x{needed_rows}; output will be cut off",
                cfg.arena.width
            );
        }
    }

    let mut sim = Simulation::new(&cfg);
    let mut input = TerminalInput;
    let mut renderer = TerminalRenderer::new(io::stdout(), opts);
    let mut pacer = FramePacer::new(cfg.fps);

    let guard = TermGuard::new()?;
    let res = run(&mut sim, cfg.run_length, &mut input, &mut renderer, &mut pacer);
    drop(guard);

    res?;
    Ok(())
}
