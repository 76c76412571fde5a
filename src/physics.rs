use crate::model::{Arena, Body, Collider, Vec2};

/// What happens to horizontal speed when the ball meets a side wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SideBounce {
    /// Reverse and lose `bounce_damping` of the speed, like the floor.
    #[default]
    Damped,
    /// Reverse only.
    Elastic,
}

#[derive(Clone, Copy, Debug)]
pub struct Physics {
    pub dt: f64,
    pub gravity: f64,        // units per second squared, pulls toward +x
    pub bounce_damping: f64, // fraction of speed lost per bounce
    pub side_bounce: SideBounce,
    pub arena: Arena,
    pub collider: Collider,
}

/// Walls touched during one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    pub floor: bool,
    pub wall: bool,
}

impl Physics {
    /// Advance `body` by one fixed timestep (semi-implicit Euler).
    ///
    /// Walls are tested against the tentative next position; the body is
    /// never clamped, so it can end a step slightly past a wall.
    pub fn step(&self, body: &mut Body) -> Contact {
        let mut contact = Contact::default();
        let gravity_dv = self.gravity * self.dt;

        body.vel.x += gravity_dv;

        let expected = body.pos + body.vel * self.dt;
        let (row, col) = (expected.x.round(), expected.y.round());

        // open at the top, only the floor is tested
        if row + self.collider.half_height() >= self.arena.height as f64 {
            // take back this frame's gravity so the bounce cannot add energy
            body.vel.x -= gravity_dv;
            body.vel.x *= -1.0 + self.bounce_damping;
            contact.floor = true;
        }

        let half_w = self.collider.half_width();
        if col - half_w < 0.0 || col + half_w >= self.arena.width as f64 {
            body.vel.y = -body.vel.y;
            if self.side_bounce == SideBounce::Damped {
                body.vel.y -= self.bounce_damping * body.vel.y;
            }
            contact.wall = true;
        }

        body.pos += body.vel * self.dt;
        contact
    }

    pub fn impulse(body: &mut Body, dv: Vec2) {
        body.vel += dv;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn physics(gravity: f64, fps: f64, damping: f64, side_bounce: SideBounce) -> Physics {
        Physics {
            dt: 1.0 / fps,
            gravity,
            bounce_damping: damping,
            side_bounce,
            arena: Arena::new(120, 30),
            collider: Collider::from_radius(3),
        }
    }

    #[test]
    fn free_flight_without_gravity_is_linear() {
        let p = physics(0.0, 60.0, 0.2, SideBounce::Damped);
        for vel in [Vec2::new(3.0, -4.0), Vec2::new(-12.5, 40.0), Vec2::ZERO] {
            let start = Vec2::new(12.0, 50.0);
            let mut b = Body::new(start, vel);
            let contact = p.step(&mut b);
            assert_eq!(contact, Contact::default());
            assert!(close(b.pos.x, start.x + vel.x * p.dt));
            assert!(close(b.pos.y, start.y + vel.y * p.dt));
            assert_eq!(b.vel, vel);
        }
    }

    #[test]
    fn one_step_from_near_the_top() {
        let p = physics(120.0, 60.0, 0.2, SideBounce::Damped);
        let mut b = Body::new(Vec2::new(2.5, 60.0), Vec2::new(0.0, 90.0));
        let contact = p.step(&mut b);
        assert_eq!(contact, Contact::default());
        assert!(close(b.vel.x, 2.0));
        assert!(close(b.pos.x, 2.5 + 2.0 / 60.0));
        assert!(close(b.pos.y, 61.5));
    }

    #[test]
    fn floor_bounce_reverses_and_damps() {
        let p = physics(170.0, 60.0, 0.2, SideBounce::Damped);
        for v in [10.0, 60.0, 240.0] {
            let mut b = Body::new(Vec2::new(27.0, 60.0), Vec2::new(v, 0.0));
            let contact = p.step(&mut b);
            assert!(contact.floor);
            assert!(close(b.vel.x, -v * 0.8), "v={v} got {}", b.vel.x);
            assert!(close(b.pos.x, 27.0 - v * 0.8 * p.dt));
        }
    }

    #[test]
    fn floor_bounce_happens_once_and_is_repeatable() {
        let p = physics(170.0, 60.0, 0.2, SideBounce::Damped);
        let mut b = Body::new(Vec2::new(20.0, 60.0), Vec2::new(20.0, 0.0));

        let mut before_hit = b;
        let mut hits = 0;
        for _ in 0..30 {
            let snapshot = b;
            if p.step(&mut b).floor {
                hits += 1;
                before_hit = snapshot;
                break;
            }
        }
        assert_eq!(hits, 1);

        let mut first = before_hit;
        let mut second = before_hit;
        assert!(p.step(&mut first).floor);
        assert!(p.step(&mut second).floor);
        assert_eq!(first.vel, second.vel);
        assert_eq!(first.vel, b.vel);
        assert!(b.vel.x < 0.0);

        // heading up again, next step must not bounce
        assert!(!p.step(&mut b).floor);
    }

    #[test]
    fn elastic_side_bounce_keeps_speed() {
        let p = physics(0.0, 60.0, 0.2, SideBounce::Elastic);
        let mut right = Body::new(Vec2::new(10.0, 114.0), Vec2::new(0.0, 90.0));
        assert!(p.step(&mut right).wall);
        assert!(close(right.vel.y, -90.0));

        let mut left = Body::new(Vec2::new(10.0, 6.5), Vec2::new(0.0, -90.0));
        assert!(p.step(&mut left).wall);
        assert!(close(left.vel.y, 90.0));
    }

    #[test]
    fn damped_side_bounce_loses_speed() {
        let p = physics(0.0, 60.0, 0.2, SideBounce::Damped);
        let mut right = Body::new(Vec2::new(10.0, 114.0), Vec2::new(0.0, 90.0));
        assert!(p.step(&mut right).wall);
        assert!(close(right.vel.y, -72.0));
        assert!(close(right.pos.y, 114.0 - 72.0 / 60.0));

        let mut left = Body::new(Vec2::new(10.0, 6.5), Vec2::new(0.0, -90.0));
        assert!(p.step(&mut left).wall);
        assert!(close(left.vel.y, 72.0));
    }

    #[test]
    fn no_ceiling() {
        let p = physics(0.0, 60.0, 0.2, SideBounce::Damped);
        let mut b = Body::new(Vec2::new(1.0, 60.0), Vec2::new(-300.0, 0.0));
        let contact = p.step(&mut b);
        assert!(!contact.floor);
        assert!(b.pos.x < 0.0);
        assert!(close(b.vel.x, -300.0));
    }

    #[test]
    fn impulse_adds_to_velocity() {
        let mut b = Body::new(Vec2::ZERO, Vec2::new(1.0, 2.0));
        Physics::impulse(&mut b, Vec2::new(-30.0, 10.0));
        assert_eq!(b.vel, Vec2::new(-29.0, 12.0));
    }
}
