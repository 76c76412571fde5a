use crate::canvas::Canvas;
use crate::config::{Config, RunLength};
use crate::input::{Command, InputSource};
use crate::model::{Body, Vec2};
use crate::physics::{Contact, Physics};
use crate::raster::{rasterize, DiscShape};
use crate::render::Renderer;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Everything that changes from frame to frame.
pub struct Simulation {
    pub body: Body,
    pub canvas: Canvas,
    physics: Physics,
    shape: DiscShape,
    horizontal_impulse: f64,
    vertical_impulse: f64,
}

impl Simulation {
    pub fn new(cfg: &Config) -> Self {
        Self {
            body: Body::new(cfg.initial_pos, cfg.initial_vel),
            canvas: Canvas::new(cfg.arena.height, cfg.arena.width),
            physics: cfg.physics(),
            shape: DiscShape::new(cfg.collider(), cfg.radius_damper),
            horizontal_impulse: cfg.horizontal_impulse,
            vertical_impulse: cfg.vertical_impulse,
        }
    }

    /// Kick the ball. `Quit` is handled by the driver and does nothing here.
    pub fn apply(&mut self, cmd: Command) {
        let dv = match cmd {
            Command::Left => Vec2::new(0.0, -self.horizontal_impulse),
            Command::Right => Vec2::new(0.0, self.horizontal_impulse),
            Command::Up => Vec2::new(-self.vertical_impulse, 0.0),
            Command::Down => Vec2::new(self.vertical_impulse, 0.0),
            Command::Quit => return,
        };
        Physics::impulse(&mut self.body, dv);
    }

    /// One physics step, then redraw the canvas from scratch.
    pub fn advance(&mut self) -> Contact {
        let contact = self.physics.step(&mut self.body);
        self.canvas.clear();
        rasterize(self.body.pos, &mut self.canvas, &self.shape);
        contact
    }
}

/// Blocks until the next frame is due.
pub trait Pacer {
    fn wait_for_next_frame(&mut self);
}

/// Wall-clock pacer with absolute deadlines, so time spent on a frame is
/// taken out of the wait.
pub struct FramePacer {
    budget: Duration,
    next: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        let budget = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        Self {
            budget,
            next: Instant::now() + budget,
        }
    }
}

impl Pacer for FramePacer {
    fn wait_for_next_frame(&mut self) {
        let now = Instant::now();
        // more than a whole frame late: start over instead of rushing to catch up
        if now > self.next + self.budget {
            self.next = now + self.budget;
            return;
        }
        sleep_until(self.next);
        self.next += self.budget;
    }
}

fn sleep_until(end: Instant) {
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(left - Duration::from_millis(2));
        } else {
            std::hint::spin_loop();
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub quit_requested: bool,
    pub floor_bounces: u64,
    pub wall_bounces: u64,
}

/// Drive the frame loop until the run length is used up or a quit arrives.
///
/// `renderer.end()` is attempted even when a frame fails; the frame error
/// wins if both fail.
pub fn run<I, R, P>(
    sim: &mut Simulation,
    run_length: RunLength,
    input: &mut I,
    renderer: &mut R,
    pacer: &mut P,
) -> anyhow::Result<RunSummary>
where
    I: InputSource + ?Sized,
    R: Renderer + ?Sized,
    P: Pacer + ?Sized,
{
    info!("starting: {run_length:?}, ball at {:?}", sim.body.pos);
    renderer.begin()?;
    let res = frames(sim, run_length, input, renderer, pacer);
    let ended = renderer.end();
    let summary = res?;
    ended?;
    info!(
        "stopped after {} frames (quit={}, floor bounces={}, wall bounces={})",
        summary.frames, summary.quit_requested, summary.floor_bounces, summary.wall_bounces
    );
    Ok(summary)
}

fn frames<I, R, P>(
    sim: &mut Simulation,
    run_length: RunLength,
    input: &mut I,
    renderer: &mut R,
    pacer: &mut P,
) -> anyhow::Result<RunSummary>
where
    I: InputSource + ?Sized,
    R: Renderer + ?Sized,
    P: Pacer + ?Sized,
{
    let mut summary = RunSummary::default();

    while run_length.allows(summary.frames) {
        if let Some(cmd) = input.poll_command()? {
            debug!("frame {}: {cmd:?}", summary.frames);
            if cmd == Command::Quit {
                summary.quit_requested = true;
                break;
            }
            sim.apply(cmd);
        }

        let contact = sim.advance();
        if contact.floor {
            summary.floor_bounces += 1;
            debug!("frame {}: floor, vel now {:?}", summary.frames, sim.body.vel);
        }
        if contact.wall {
            summary.wall_bounces += 1;
            debug!("frame {}: wall, vel now {:?}", summary.frames, sim.body.vel);
        }

        renderer.present(&sim.canvas)?;
        summary.frames += 1;
        pacer.wait_for_next_frame();
    }

    Ok(summary)
}
