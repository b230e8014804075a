use glam::Vec3;
use rand::Rng;

/// World-space radius shared by every bubble.
pub const BUBBLE_RADIUS: f32 = 0.5;

/// Vertical bound; bubbles drifting above this leave the play volume.
pub const DESPAWN_HEIGHT: f32 = 10.0;

/// Per-frame wobble applied to the horizontal velocity components.
const JITTER: f32 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Display color as RGB, picked at spawn time.
    pub color: (u8, u8, u8),
}

impl Bubble {
    pub fn new(position: Vec3, velocity: Vec3, color: (u8, u8, u8)) -> Self {
        Self {
            position,
            velocity,
            color,
        }
    }

    /// Creates a bubble at a random spot along the bottom of the play volume
    /// with a small upward-biased velocity and a random color.
    pub fn spawn() -> Self {
        let mut rng = rand::rng();
        Self {
            position: Vec3::new(
                rng.random_range(-10.0..10.0),
                -DESPAWN_HEIGHT,
                rng.random_range(-5.0..5.0),
            ),
            velocity: Vec3::new(
                rng.random_range(-0.05..0.05),
                rng.random_range(0.05..0.15),
                rng.random_range(-0.05..0.05),
            ),
            color: (rng.random(), rng.random(), rng.random()),
        }
    }

    /// Advances one frame: move by the current velocity, then wobble the
    /// horizontal velocity. The vertical component never changes, so a
    /// bubble always keeps rising at its spawn speed.
    ///
    /// `max_speed` caps the velocity length when set; with `None` the wobble
    /// accumulates without bound.
    pub fn update(&mut self, max_speed: Option<f32>) {
        self.position += self.velocity;

        let mut rng = rand::rng();
        self.velocity.x += rng.random_range(-JITTER..JITTER);
        self.velocity.z += rng.random_range(-JITTER..JITTER);

        if let Some(cap) = max_speed {
            self.velocity = self.velocity.clamp_length_max(cap);
        }
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.position.y > DESPAWN_HEIGHT
    }
}
