use std::time::Instant;

use crate::camera::Camera;
use crate::entities::{BUBBLE_RADIUS, Bubble};
use crate::timer::SpawnTimer;

/// Live-bubble count that ends the game when reached.
pub const MAX_BUBBLES: usize = 20;

/// Tuning knobs for a round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    /// Number of simultaneous bubbles that triggers game over.
    pub max_bubbles: usize,
    /// Optional cap on bubble speed. `None` leaves the drift jitter free to
    /// accumulate into the velocity over a bubble's lifetime.
    pub max_speed: Option<f32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_bubbles: MAX_BUBBLES,
            max_speed: None,
        }
    }
}

/// Round state: the live bubbles, the score, and the spawn schedule.
///
/// The scoreboard and bubble field redraw from these fields on the next
/// frame; no operation here touches the terminal.
pub struct Game {
    pub bubbles: Vec<Bubble>,
    pub score: u32,
    pub game_over: bool,
    pub spawn_timer: SpawnTimer,
    pub camera: Camera,
    pub config: GameConfig,
}

impl Game {
    pub fn new(width: u16, height: u16, now: Instant) -> Self {
        Self::with_config(width, height, now, GameConfig::default())
    }

    pub fn with_config(width: u16, height: u16, now: Instant, config: GameConfig) -> Self {
        Self {
            bubbles: Vec::new(),
            score: 0,
            game_over: false,
            spawn_timer: SpawnTimer::armed(now),
            camera: Camera::new(width, height),
            config,
        }
    }

    /// Adds one randomized bubble and schedules the next spawn. Once the
    /// game is over this stops the spawn cycle instead.
    pub fn spawn(&mut self, now: Instant) {
        if self.game_over {
            self.spawn_timer.disarm();
            return;
        }

        self.bubbles.push(Bubble::spawn());
        self.spawn_timer.schedule(now);
    }

    /// Fires [`Game::spawn`] when the spawn timer has come due.
    pub fn poll_spawn(&mut self, now: Instant) {
        if self.spawn_timer.due(now) {
            self.spawn(now);
        }
    }

    /// Advances every bubble one step, removes the ones that floated out the
    /// top, and ends the game when too many remain. No-op once the game is
    /// over.
    pub fn update(&mut self) {
        if self.game_over {
            return;
        }

        let max_speed = self.config.max_speed;
        for bubble in &mut self.bubbles {
            bubble.update(max_speed);
        }
        self.bubbles.retain(|bubble| !bubble.is_out_of_bounds());

        if self.bubbles.len() >= self.config.max_bubbles {
            self.end_game();
        }
    }

    /// Pops the bubble nearest to the camera under the clicked cell, if any.
    /// Returns whether a bubble was hit. Clicks are ignored once the game is
    /// over.
    pub fn handle_pointer_down(&mut self, column: u16, row: u16, width: u16, height: u16) -> bool {
        if self.game_over {
            return false;
        }

        self.camera.set_viewport(width, height);
        let ray = self
            .camera
            .screen_ray(column as f32 + 0.5, row as f32 + 0.5);

        // Nearest intersection wins; on an exact tie the earliest-spawned
        // bubble keeps the hit
        let mut hit: Option<(usize, f32)> = None;
        for (index, bubble) in self.bubbles.iter().enumerate() {
            if let Some(t) = ray.intersect_sphere(bubble.position, BUBBLE_RADIUS)
                && hit.is_none_or(|(_, nearest)| t < nearest)
            {
                hit = Some((index, t));
            }
        }

        match hit {
            Some((index, _)) => {
                self.bubbles.remove(index);
                self.update_score(1);
                true
            }
            None => false,
        }
    }

    /// Adds points to the running score.
    pub fn update_score(&mut self, points: u32) {
        self.score += points;
        tracing::debug!(score = self.score, "score updated");
    }

    /// Freezes the round. Safe to call more than once.
    pub fn end_game(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        tracing::info!(score = self.score, "game over");
    }

    /// Returns to the initial state: no bubbles, zero score, spawn timer
    /// armed. The first bubble of the new round arrives on the next poll.
    pub fn restart(&mut self, now: Instant) {
        self.bubbles.clear();
        self.score = 0;
        self.game_over = false;
        self.spawn_timer.arm(now);
        tracing::info!("game restarted");
    }

    /// Keeps the camera aspect in step with the terminal size.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.camera.set_viewport(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const WHITE: (u8, u8, u8) = (255, 255, 255);

    fn game() -> Game {
        Game::new(80, 40, Instant::now())
    }

    fn resting_bubble(position: Vec3) -> Bubble {
        Bubble::new(position, Vec3::ZERO, WHITE)
    }

    #[test]
    fn test_new_game_is_pristine() {
        let now = Instant::now();
        let game = Game::new(80, 40, now);
        assert!(game.bubbles.is_empty());
        assert_eq!(game.score, 0);
        assert!(!game.game_over);
        assert!(game.spawn_timer.due(now));
    }

    #[test]
    fn test_spawn_appends_and_reschedules() {
        let now = Instant::now();
        let mut game = game();
        game.spawn(now);
        assert_eq!(game.bubbles.len(), 1);
        assert!(game.spawn_timer.is_armed());
        // The follow-up spawn sits at least a second out
        assert!(!game.spawn_timer.due(now));
    }

    #[test]
    fn test_spawn_after_game_over_stops_the_cycle() {
        let now = Instant::now();
        let mut game = game();
        game.end_game();
        game.spawn(now);
        assert!(game.bubbles.is_empty());
        assert!(!game.spawn_timer.is_armed());
    }

    #[test]
    fn test_poll_spawn_fires_only_when_due() {
        // Built and polled with one instant; the timer arms due at creation
        let now = Instant::now();
        let mut game = Game::new(80, 40, now);
        game.poll_spawn(now);
        assert_eq!(game.bubbles.len(), 1);
        // Just rescheduled, so polling again does nothing
        game.poll_spawn(now);
        assert_eq!(game.bubbles.len(), 1);
    }

    #[test]
    fn test_update_steps_and_culls_bubbles() {
        let mut game = game();
        game.bubbles
            .push(Bubble::new(Vec3::ZERO, Vec3::new(0.0, 0.1, 0.0), WHITE));
        game.bubbles
            .push(Bubble::new(Vec3::new(0.0, 9.99, 0.0), Vec3::new(0.0, 0.2, 0.0), WHITE));

        game.update();

        assert_eq!(game.bubbles.len(), 1);
        assert!((game.bubbles[0].position.y - 0.1).abs() < 1e-6);
        assert!(!game.game_over);
    }

    #[test]
    fn test_filling_the_field_ends_the_game() {
        let mut game = game();
        for _ in 0..MAX_BUBBLES {
            game.bubbles.push(resting_bubble(Vec3::ZERO));
        }
        game.update();
        assert!(game.game_over);
    }

    #[test]
    fn test_one_below_the_limit_keeps_playing() {
        let now = Instant::now();
        let mut game = game();
        for _ in 0..MAX_BUBBLES - 1 {
            game.bubbles.push(resting_bubble(Vec3::ZERO));
        }
        game.update();
        assert!(!game.game_over);

        // The twentieth bubble tips it over on the following update
        game.spawn(now);
        game.update();
        assert!(game.game_over);
    }

    #[test]
    fn test_update_is_a_no_op_after_game_over() {
        let mut game = game();
        game.bubbles
            .push(Bubble::new(Vec3::ZERO, Vec3::new(0.0, 0.1, 0.0), WHITE));
        game.end_game();

        game.update();

        assert_eq!(game.bubbles[0].position, Vec3::ZERO);
    }

    #[test]
    fn test_pointer_down_pops_a_centered_bubble() {
        let mut game = game();
        game.bubbles.push(resting_bubble(Vec3::ZERO));

        let hit = game.handle_pointer_down(40, 20, 80, 40);

        assert!(hit);
        assert!(game.bubbles.is_empty());
        assert_eq!(game.score, 1);
    }

    #[test]
    fn test_pointer_down_misses_empty_space() {
        let mut game = game();
        game.bubbles.push(resting_bubble(Vec3::ZERO));

        let hit = game.handle_pointer_down(0, 0, 80, 40);

        assert!(!hit);
        assert_eq!(game.bubbles.len(), 1);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_pointer_down_ignored_after_game_over() {
        let mut game = game();
        game.bubbles.push(resting_bubble(Vec3::ZERO));
        game.end_game();

        assert!(!game.handle_pointer_down(40, 20, 80, 40));
        assert_eq!(game.bubbles.len(), 1);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_nearest_bubble_takes_the_hit() {
        let mut game = game();
        game.bubbles.push(resting_bubble(Vec3::ZERO));
        // Same line of sight, five units closer to the camera
        game.bubbles.push(resting_bubble(Vec3::new(0.0, 0.0, 5.0)));

        assert!(game.handle_pointer_down(40, 20, 80, 40));

        assert_eq!(game.bubbles.len(), 1);
        assert_eq!(game.bubbles[0].position.z, 0.0);
    }

    #[test]
    fn test_exact_tie_pops_the_earlier_bubble() {
        let mut game = game();
        game.bubbles.push(Bubble::new(Vec3::ZERO, Vec3::ZERO, (255, 0, 0)));
        game.bubbles.push(Bubble::new(Vec3::ZERO, Vec3::ZERO, (0, 255, 0)));

        assert!(game.handle_pointer_down(40, 20, 80, 40));

        assert_eq!(game.bubbles.len(), 1);
        assert_eq!(game.bubbles[0].color, (0, 255, 0));
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let mut game = game();
        game.score = 7;
        game.end_game();
        game.end_game();
        assert!(game.game_over);
        assert_eq!(game.score, 7);
    }

    #[test]
    fn test_restart_returns_to_initial_state() {
        let now = Instant::now();
        let mut game = game();
        game.spawn(now);
        game.update_score(3);
        game.end_game();

        game.restart(now);

        assert!(game.bubbles.is_empty());
        assert_eq!(game.score, 0);
        assert!(!game.game_over);
        assert!(game.spawn_timer.due(now));
    }

    #[test]
    fn test_resize_updates_the_camera() {
        let mut game = game();
        game.handle_resize(120, 50);
        assert_eq!(game.camera.viewport(), (120.0, 50.0));
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_update_never_changes_the_score(count in 0usize..30) {
                let mut game = game();
                for _ in 0..count {
                    game.bubbles.push(Bubble::spawn());
                }
                game.update();
                prop_assert_eq!(game.score, 0);
            }

            #[test]
            fn test_game_over_tracks_the_bubble_limit(count in 0usize..40) {
                let mut game = game();
                for _ in 0..count {
                    game.bubbles.push(resting_bubble(Vec3::ZERO));
                }
                game.update();
                prop_assert_eq!(game.game_over, count >= game.config.max_bubbles);
            }

            #[test]
            fn test_restart_always_yields_a_pristine_round(
                count in 0usize..25,
                score in 0u32..1000,
                game_over in proptest::bool::ANY
            ) {
                let now = Instant::now();
                let mut game = game();
                for _ in 0..count {
                    game.bubbles.push(Bubble::spawn());
                }
                game.score = score;
                game.game_over = game_over;

                game.restart(now);

                prop_assert!(game.bubbles.is_empty());
                prop_assert_eq!(game.score, 0);
                prop_assert!(!game.game_over);
                prop_assert!(game.spawn_timer.due(now));
            }

            #[test]
            fn test_pointer_sequences_never_lower_the_score(
                field in proptest::collection::vec(
                    (-8.0f32..8.0, -8.0f32..8.0, -4.0f32..4.0),
                    0..15,
                ),
                clicks in proptest::collection::vec((0u16..80, 0u16..40), 0..25)
            ) {
                let mut game = game();
                for &(x, y, z) in &field {
                    game.bubbles.push(resting_bubble(Vec3::new(x, y, z)));
                }

                let mut last = game.score;
                for (column, row) in clicks {
                    let popped = game.handle_pointer_down(column, row, 80, 40);
                    prop_assert!(game.score >= last);
                    // Each click pays out exactly one point, and only on a hit
                    prop_assert_eq!(game.score - last, u32::from(popped));
                    last = game.score;
                }
            }
        }
    }
}
