// Library exports for testing
pub use camera::{Camera, Ray, ScreenPoint};
pub use entities::{BUBBLE_RADIUS, Bubble, DESPAWN_HEIGHT};
pub use game::{Game, GameConfig, MAX_BUBBLES};
pub use timer::SpawnTimer;

pub mod app;
pub mod audio;
pub mod camera;
pub mod entities;
pub mod game;
pub mod input;
pub mod renderer;
pub mod timer;
