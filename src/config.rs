use crate::model::{Arena, Collider, Vec2};
use crate::physics::{Physics, SideBounce};
use anyhow::{bail, Result};
use clap::ValueEnum;

/// Tallest arena that still leaves room for a title and a ground row in
/// terminal coordinates.
pub const MAX_ARENA_HEIGHT: u16 = u16::MAX - 2;

/// How long the animation runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunLength {
    Frames(u64),
    Forever,
}

impl RunLength {
    pub fn seconds(secs: u32, fps: u32) -> Self {
        if secs == 0 {
            RunLength::Forever
        } else {
            RunLength::Frames(secs as u64 * fps as u64)
        }
    }

    pub fn allows(self, frame: u64) -> bool {
        match self {
            RunLength::Frames(n) => frame < n,
            RunLength::Forever => true,
        }
    }
}

/// Named bundles of tuning constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    /// Interactive, runs until quit, with title line and ground.
    #[default]
    Endless,
    /// Thirty seconds at 30 fps with lighter gravity, no decorations.
    Timed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub arena: Arena,
    pub fps: u32,
    pub run_length: RunLength,
    pub gravity: f64,
    pub bounce_damping: f64,
    pub side_bounce: SideBounce,
    /// Ball radius in rows.
    pub radius: u16,
    /// Visual-only ellipse scale, applied as `1 - radius_damper`.
    pub radius_damper: f64,
    pub initial_pos: Vec2,
    pub initial_vel: Vec2,
    pub horizontal_impulse: f64,
    pub vertical_impulse: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config::preset(Preset::Endless)
    }
}

impl Config {
    pub fn preset(p: Preset) -> Self {
        let arena = Arena::new(120, 30);
        let radius = 3;
        let (fps, run_length, gravity, bounce_damping) = match p {
            Preset::Endless => (60, RunLength::Forever, 170.0, 0.2),
            Preset::Timed => (30, RunLength::seconds(30, 30), 120.0, 0.08),
        };
        let mut cfg = Config {
            arena,
            fps,
            run_length,
            gravity,
            bounce_damping,
            side_bounce: SideBounce::Damped,
            radius,
            radius_damper: -0.07,
            initial_pos: Vec2::ZERO,
            initial_vel: Vec2::new(0.0, 90.0),
            horizontal_impulse: 10.0,
            vertical_impulse: 30.0,
        };
        cfg.initial_pos = cfg.default_start();
        cfg
    }

    /// Top edge of the ball two rows below the arena top, centered horizontally.
    pub fn default_start(&self) -> Vec2 {
        Vec2::new(
            self.collider().half_height() + 2.0,
            self.arena.width as f64 / 2.0,
        )
    }

    pub fn collider(&self) -> Collider {
        Collider::from_radius(self.radius)
    }

    pub fn dt(&self) -> f64 {
        1.0 / self.fps as f64
    }

    pub fn physics(&self) -> Physics {
        Physics {
            dt: self.dt(),
            gravity: self.gravity,
            bounce_damping: self.bounce_damping,
            side_bounce: self.side_bounce,
            arena: self.arena,
            collider: self.collider(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            bail!("fps must be at least 1");
        }
        if self.arena.width == 0 || self.arena.height == 0 {
            bail!(
                "arena must not be empty (got {}x{})",
                self.arena.width,
                self.arena.height
            );
        }
        if self.arena.height > MAX_ARENA_HEIGHT {
            bail!(
                "arena height must be at most {MAX_ARENA_HEIGHT} (got {})",
                self.arena.height
            );
        }
        let c = self.collider();
        if !c.fits_inside(self.arena) {
            bail!(
                "ball of radius {} ({}x{} cells) does not fit a {}x{} arena",
                self.radius,
                c.width,
                c.height,
                self.arena.width,
                self.arena.height
            );
        }
        let numbers = [
            ("gravity", self.gravity),
            ("bounce damping", self.bounce_damping),
            ("radius damper", self.radius_damper),
            ("horizontal impulse", self.horizontal_impulse),
            ("vertical impulse", self.vertical_impulse),
        ];
        for (name, v) in numbers {
            if !v.is_finite() {
                bail!("{name} must be a finite number");
            }
        }
        if !(0.0..=1.0).contains(&self.bounce_damping) {
            bail!(
                "bounce damping must be within 0..=1 (got {})",
                self.bounce_damping
            );
        }
        if self.radius_damper >= 1.0 {
            bail!("radius damper must be below 1 (got {})", self.radius_damper);
        }
        if !self.initial_pos.is_finite() || !self.initial_vel.is_finite() {
            bail!("initial position and velocity must be finite");
        }
        let p = self.initial_pos;
        if p.x >= self.arena.height as f64 || p.y < 0.0 || p.y >= self.arena.width as f64 {
            bail!(
                "initial position ({:.1}, {:.1}) is outside the {}x{} arena",
                p.x,
                p.y,
                self.arena.width,
                self.arena.height
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for p in [Preset::Endless, Preset::Timed] {
            Config::preset(p).validate().unwrap();
        }
    }

    #[test]
    fn timed_preset_runs_thirty_seconds() {
        let c = Config::preset(Preset::Timed);
        assert_eq!(c.run_length, RunLength::Frames(900));
        assert_eq!(c.fps, 30);
        assert_eq!(c.gravity, 120.0);
        assert_eq!(c.bounce_damping, 0.08);
    }

    #[test]
    fn endless_start_state() {
        let c = Config::default();
        assert_eq!(c.run_length, RunLength::Forever);
        assert_eq!(c.initial_pos, Vec2::new(5.5, 60.0));
        assert_eq!(c.initial_vel, Vec2::new(0.0, 90.0));
        assert_eq!(c.side_bounce, SideBounce::Damped);
    }

    #[test]
    fn zero_seconds_means_forever() {
        assert_eq!(RunLength::seconds(0, 60), RunLength::Forever);
        assert_eq!(RunLength::seconds(2, 60), RunLength::Frames(120));
        assert!(RunLength::Frames(2).allows(1));
        assert!(!RunLength::Frames(2).allows(2));
    }

    #[test]
    fn rejects_bad_values() {
        let mut c = Config::default();
        c.fps = 0;
        assert!(c.validate().is_err());

        let mut c = Config::default();
        c.radius = 20;
        let err = c.validate().unwrap_err().to_string();
        assert!(err.contains("does not fit"), "{err}");

        let mut c = Config::default();
        c.gravity = f64::NAN;
        assert!(c.validate().is_err());

        let mut c = Config::default();
        c.bounce_damping = 1.5;
        assert!(c.validate().is_err());

        let mut c = Config::default();
        c.initial_pos = Vec2::new(5.0, 500.0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn arena_height_leaves_room_for_decorations() {
        let mut c = Config::default();
        c.arena.height = u16::MAX;
        let err = c.validate().unwrap_err().to_string();
        assert!(err.contains("arena height"), "{err}");

        c.arena.height = MAX_ARENA_HEIGHT;
        c.validate().unwrap();
        assert!(c.arena.height.checked_add(2).is_some());
    }

    #[test]
    fn zero_radius_is_accepted() {
        let mut c = Config::default();
        c.radius = 0;
        c.initial_pos = c.default_start();
        c.validate().unwrap();
        assert_eq!(c.initial_pos.x, 2.5);
    }
}
