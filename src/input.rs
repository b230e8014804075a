use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Left mouse button pressed on a terminal cell.
    PointerDown { column: u16, row: u16 },
    Restart,
    Resize { width: u16, height: u16 },
    Quit,
}

/// Manages input polling and translates raw terminal events into game actions
pub struct InputManager {
    oneshot_actions: Vec<InputAction>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            oneshot_actions: Vec::new(),
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self, game_over: bool) -> color_eyre::Result<()> {
        // Clear previous one-shot actions
        self.oneshot_actions.clear();

        // Poll for all available events without blocking
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key_event) => {
                    self.handle_key_event(key_event, game_over);
                }
                Event::Mouse(mouse_event) => {
                    self.handle_mouse_event(mouse_event);
                }
                Event::Resize(width, height) => {
                    self.oneshot_actions.push(InputAction::Resize { width, height });
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent, game_over: bool) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        // Quit keys work in any state
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        // Restart is only offered on the game-over screen
        if game_over && matches!(key_event.code, KeyCode::Char('r') | KeyCode::Char('R')) {
            self.oneshot_actions.push(InputAction::Restart);
        }
    }

    /// Left clicks become pointer actions; the game decides whether they pop
    /// anything.
    fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        if mouse_event.kind == MouseEventKind::Down(MouseButton::Left) {
            self.oneshot_actions.push(InputAction::PointerDown {
                column: mouse_event.column,
                row: mouse_event.row,
            });
        }
    }

    /// Returns all actions for this frame
    /// Must be called after poll_events()
    pub fn get_actions(&self) -> Vec<InputAction> {
        self.oneshot_actions.clone()
    }
}
