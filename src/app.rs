use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};

use crate::audio::AudioManager;
use crate::game::Game;
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    game: Game,
    /// screen dimensions
    screen_width: u16,
    screen_height: u16,
    /// Frames info
    frame_count: u64,
    last_frame_time: Instant,
    fps: u32,
    /// Game timers
    game_start_time: Instant,
    final_time_secs: Option<u64>,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new() -> Self {
        // Start with reasonable defaults, will be updated on first render
        let screen_width: u16 = 80;
        let screen_height: u16 = 40;

        let now = Instant::now();
        Self {
            running: true,
            game: Game::new(screen_width, screen_height, now),
            screen_width,
            screen_height,
            frame_count: 0,
            last_frame_time: now,
            fps: 0,
            game_start_time: now,
            final_time_secs: None,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
            audio_manager: AudioManager::default(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while self.running {
            // Calculate FPS
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            // Update screen dimensions before rendering
            let size = terminal.size()?;
            if (size.width, size.height) != (self.screen_width, self.screen_height) {
                self.screen_width = size.width;
                self.screen_height = size.height;
                self.game.handle_resize(size.width, size.height);
            }

            // Render the frame
            terminal.draw(|frame| {
                // Use final time if game is over, otherwise calculate current elapsed time
                let elapsed_time_secs = self
                    .final_time_secs
                    .unwrap_or_else(|| self.game_start_time.elapsed().as_secs());
                let view = RenderView {
                    bubbles: &self.game.bubbles,
                    camera: &self.game.camera,
                    score: self.game.score,
                    max_bubbles: self.game.config.max_bubbles,
                    game_over: self.game.game_over,
                    frame_count: self.frame_count,
                    area: frame.area(),
                    fps: self.fps,
                    elapsed_time_secs,
                };
                self.renderer.render(frame, &view);
            })?;

            // Poll input events and get actions
            self.input_manager.poll_events(self.game.game_over)?;
            let actions = self.input_manager.get_actions();
            self.process_actions(&actions, now);

            // Advance the round
            if !self.game.game_over {
                self.frame_count += 1;
                self.game.poll_spawn(now);
                self.game.update();

                // Capture final time when transitioning to game over
                if self.game.game_over {
                    self.final_time_secs = Some(self.game_start_time.elapsed().as_secs());
                    self.audio_manager.play_game_over();
                }
            }

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(8));
        }
        Ok(())
    }

    /// Process input actions and update game state accordingly
    fn process_actions(&mut self, actions: &[InputAction], now: Instant) {
        for action in actions {
            match *action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Restart => {
                    self.game.restart(now);
                    self.game_start_time = now;
                    self.final_time_secs = None;
                    self.frame_count = 0;
                }
                InputAction::PointerDown { column, row } => {
                    let popped = self.game.handle_pointer_down(
                        column,
                        row,
                        self.screen_width,
                        self.screen_height,
                    );
                    if popped {
                        self.audio_manager.play_pop();
                    }
                }
                InputAction::Resize { width, height } => {
                    self.screen_width = width;
                    self.screen_height = height;
                    self.game.handle_resize(width, height);
                }
            }
        }
    }
}
