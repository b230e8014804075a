mod bubble;

// Re-export all public types
pub use bubble::{BUBBLE_RADIUS, Bubble, DESPAWN_HEIGHT};
