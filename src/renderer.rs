use crate::camera::{CELL_ASPECT, Camera, ScreenPoint};
use crate::entities::{BUBBLE_RADIUS, Bubble};
use glam::Vec3;
use rand::Rng;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub bubbles: &'a [Bubble],
    pub camera: &'a Camera,
    pub score: u32,
    pub max_bubbles: usize,
    pub game_over: bool,
    pub frame_count: u64,
    pub area: Rect,
    pub fps: u32,
    pub elapsed_time_secs: u64,
}

/// Handles all rendering responsibilities for the game
pub struct GameRenderer {}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        if view.game_over {
            self.render_game_over(frame, view);
        } else {
            self.render_game(frame, view);
        }
    }

    /// Renders the active gameplay screen
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;

        // Render caustic sparkles (simple background)
        if view.frame_count % 10 < 5 {
            let sparkle_text = (0..area.height)
                .map(|_| {
                    let mut rng = rand::rng();
                    if rng.random_bool(0.05) { "." } else { " " }
                })
                .collect::<Vec<_>>()
                .join("\n");
            frame.render_widget(
                Paragraph::new(sparkle_text).style(Style::default().fg(Color::DarkGray)),
                area,
            );
        }

        // Project every bubble onto the cell grid, then paint far to near so
        // closer bubbles overdraw the ones behind them
        let mut projected: Vec<(&Bubble, ScreenPoint)> = view
            .bubbles
            .iter()
            .filter_map(|bubble| {
                view.camera
                    .project(bubble.position)
                    .map(|point| (bubble, point))
            })
            .collect();
        projected.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

        let buffer = frame.buffer_mut();
        for &(bubble, center) in &projected {
            // On-screen radius comes from projecting a point on the rim
            let radius_cols = view
                .camera
                .project(bubble.position + Vec3::X * BUBBLE_RADIUS)
                .map(|edge| (edge.x - center.x).abs())
                .unwrap_or(1.0)
                .max(0.5);
            self.draw_bubble(buffer, area, bubble, center, radius_cols);
        }

        // Stats overlay at the top - left side
        let count = view.bubbles.len();
        let count_style = if count + 3 >= view.max_bubbles {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if count >= view.max_bubbles / 2 {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        };

        let stats_left = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Bubbles: ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{}/{}", count, view.max_bubbles), count_style),
            Span::styled("  FPS: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.fps),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };

        frame.render_widget(Paragraph::new(stats_left), stats_area);

        // Timer in center of header
        let minutes = view.elapsed_time_secs / 60;
        let seconds = view.elapsed_time_secs % 60;
        let timer_text = Line::from(vec![
            Span::styled("Time: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:02}:{:02}", minutes, seconds),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let timer_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        };

        frame.render_widget(Paragraph::new(timer_text).centered(), timer_area);

        // Controls hint at bottom
        let controls = Line::from(vec![Span::styled(
            "[Click: Pop Bubbles] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);

        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };

        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    /// Fills the elliptical disc a sphere covers on the cell grid. Cells are
    /// taller than wide, so the row radius is the column radius squashed by
    /// the cell aspect.
    fn draw_bubble(
        &self,
        buffer: &mut Buffer,
        area: Rect,
        bubble: &Bubble,
        center: ScreenPoint,
        radius_cols: f32,
    ) {
        let radius_rows = (radius_cols / CELL_ASPECT).max(0.5);

        // Distant bubbles fade toward the background
        let brightness = (1.0 - (center.depth - 10.0) / 25.0).clamp(0.4, 1.0);
        let (r, g, b) = bubble.color;
        let color = Color::Rgb(
            (r as f32 * brightness) as u8,
            (g as f32 * brightness) as u8,
            (b as f32 * brightness) as u8,
        );
        let style = Style::default().fg(color);

        // The cell under the center always draws, so even the most distant
        // bubble stays visible and clickable
        self.put_cell(
            buffer,
            area,
            center.x.floor() as i32,
            center.y.floor() as i32,
            "●",
            style,
        );

        let min_col = (center.x - radius_cols).floor() as i32;
        let max_col = (center.x + radius_cols).ceil() as i32;
        let min_row = (center.y - radius_rows).floor() as i32;
        let max_row = (center.y + radius_rows).ceil() as i32;

        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let dx = (col as f32 + 0.5 - center.x) / radius_cols;
                let dy = (row as f32 + 0.5 - center.y) / radius_rows;
                if dx * dx + dy * dy <= 1.0 {
                    self.put_cell(buffer, area, col, row, "●", style);
                }
            }
        }

        // Specular glint on bubbles big enough to carry one
        if radius_cols >= 1.5 {
            self.put_cell(
                buffer,
                area,
                (center.x - radius_cols * 0.4).floor() as i32,
                (center.y - radius_rows * 0.4).floor() as i32,
                "•",
                Style::default().fg(Color::White),
            );
        }
    }

    /// Writes a single glyph, skipping anything outside the viewport.
    fn put_cell(
        &self,
        buffer: &mut Buffer,
        area: Rect,
        col: i32,
        row: i32,
        symbol: &str,
        style: Style,
    ) {
        if col < 0 || row < 0 {
            return;
        }
        let (col, row) = (col as u16, row as u16);
        if col >= area.width || row >= area.height {
            return;
        }
        buffer.set_string(area.x + col, area.y + row, symbol, style);
    }

    /// Renders the game over screen
    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let minutes = view.elapsed_time_secs / 60;
        let seconds = view.elapsed_time_secs % 60;

        let game_over_text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().red(),
            Line::from("║        GAME OVER!         ║")
                .centered()
                .red()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().red(),
            Line::from(""),
            Line::from("The tank filled up with bubbles!")
                .centered()
                .white(),
            Line::from(""),
            Line::from(format!("Bubbles Popped: {}", view.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!("Time Survived: {:02}:{:02}", minutes, seconds))
                .centered()
                .cyan()
                .bold(),
            Line::from(""),
            Line::from("Press R to restart").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            area,
        );
    }
}
