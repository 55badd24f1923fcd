use std::fs::File;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, KeyboardEnhancementFlags,
        MouseButton, MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use glam::Vec2;

use stickrun::geom::Rect;
use stickrun::monster::MonsterKind;
use stickrun::particles::ParticleKind;
use stickrun::{levels_from, Action, Config, Game, GameState, Input};

/// Rows reserved under the playfield for the HUD.
const HUD_ROWS: u16 = 3;

#[derive(Debug, Clone, PartialEq)]
struct Args {
    config: String,
    levels: Option<String>,
    start_level: Option<usize>,
    log_file: String,
}

fn parse_args(args: &[String]) -> Args {
    let mut parsed = Args {
        config: stickrun::config::CONFIG_PATH.to_string(),
        levels: None,
        start_level: None,
        log_file: "stickrun.log".to_string(),
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                if let Some(v) = iter.next() { parsed.config = v.clone(); }
            }
            "--levels" => parsed.levels = iter.next().cloned(),
            "--log" => {
                if let Some(v) = iter.next() { parsed.log_file = v.clone(); }
            }
            "--level" => parsed.start_level = iter.next().and_then(|v| v.parse().ok()),
            other => {
                if let Ok(n) = other.parse::<usize>() {
                    parsed.start_level = Some(n);
                }
            }
        }
    }
    parsed
}

/// The terminal belongs to the game, so log records go to a file.
fn init_logging(path: &str) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {path}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// A character grid the world is projected onto before printing.
struct Canvas {
    cols: usize,
    rows: usize,
    cells: Vec<(char, &'static str)>,
    /// World pixels per cell.
    scale: Vec2,
}

const GRAY: &str = "\x1b[90m";
const WHITE: &str = "\x1b[37m";
const YELLOW: &str = "\x1b[33m";
const SKIN: &str = "\x1b[93m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const GREEN: &str = "\x1b[32m";
const LIME: &str = "\x1b[92m";
const MAGENTA: &str = "\x1b[35m";

impl Canvas {
    fn new(cols: usize, rows: usize, view: Vec2) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Canvas {
            cols,
            rows,
            cells: vec![(' ', ""); cols * rows],
            scale: Vec2::new(view.x / cols as f32, view.y / rows as f32),
        }
    }

    fn cell_of(&self, screen: Vec2) -> (i32, i32) {
        ((screen.x / self.scale.x).floor() as i32, (screen.y / self.scale.y).floor() as i32)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, color: &'static str) {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return;
        }
        self.cells[row as usize * self.cols + col as usize] = (ch, color);
    }

    fn put_at(&mut self, screen: Vec2, ch: char, color: &'static str) {
        let (col, row) = self.cell_of(screen);
        self.put(col, row, ch, color);
    }

    fn fill_rect(&mut self, r: Rect, ch: char, color: &'static str) {
        let (c0, r0) = self.cell_of(Vec2::new(r.left(), r.top()));
        let (c1, r1) = self.cell_of(Vec2::new(r.right() - 0.01, r.bottom() - 0.01));
        for row in r0.max(0)..=r1.min(self.rows as i32 - 1) {
            for col in c0.max(0)..=c1.min(self.cols as i32 - 1) {
                self.put(col, row, ch, color);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, ch: char, color: &'static str) {
        let bounds = Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0);
        let (c0, r0) = self.cell_of(Vec2::new(bounds.left(), bounds.top()));
        let (c1, r1) = self.cell_of(Vec2::new(bounds.right(), bounds.bottom()));
        for row in r0..=r1 {
            for col in c0..=c1 {
                let mid = Vec2::new((col as f32 + 0.5) * self.scale.x, (row as f32 + 0.5) * self.scale.y);
                if mid.distance(center) < radius {
                    self.put(col, row, ch, color);
                }
            }
        }
        // Small shapes still get one cell.
        self.put_at(center, ch, color);
    }

    fn text_centered(&mut self, row: i32, text: &str, color: &'static str) {
        let start = (self.cols as i32 - text.chars().count() as i32) / 2;
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i as i32, row, ch, color);
        }
    }

    fn render(&self) -> String {
        let mut buffer = String::with_capacity(self.cols * self.rows * 6);
        for row in self.cells.chunks(self.cols) {
            for &(ch, color) in row {
                if color.is_empty() {
                    buffer.push(ch);
                } else {
                    buffer.push_str(color);
                    buffer.push(ch);
                    buffer.push_str("\x1b[0m");
                }
            }
            buffer.push_str("\r\n");
        }
        buffer
    }
}

fn paint_world(canvas: &mut Canvas, game: &Game) {
    let world = &game.world;
    let config = &game.config;
    let cam = &world.camera;
    let to_screen = |r: Rect| r.translate(-cam.offset);

    if world.level.solid_ground {
        let ground = Rect::new(0.0, world.level.ground_y, world.level.world_width, 100.0);
        canvas.fill_rect(to_screen(ground), '=', GRAY);
    }
    for plat in &world.level.platforms {
        canvas.fill_rect(to_screen(*plat), '#', WHITE);
    }
    canvas.fill_rect(to_screen(world.level.goal), 'D', YELLOW);

    for m in &world.monsters {
        let (ch, color) = match m.kind {
            MonsterKind::Basic => ('m', RED),
            MonsterKind::Flyer => ('v', BLUE),
            MonsterKind::Tank => ('M', GREEN),
        };
        canvas.fill_circle(cam.world_to_screen(m.pos), m.radius(&config.monsters), ch, color);
    }
    for p in &world.projectiles {
        canvas.put_at(cam.world_to_screen(p.pos), '-', LIME);
    }
    for p in world.particles.particles() {
        let (ch, color) = match p.kind {
            ParticleKind::Spark => ('*', YELLOW),
            ParticleKind::Hurt => ('+', RED),
            ParticleKind::Dust => ('.', GRAY),
        };
        canvas.put_at(cam.world_to_screen(p.pos), ch, color);
    }

    let player = &world.player;
    if player.visible() {
        let head = cam.world_to_screen(player.pos);
        let dims = &config.player;
        let (col, head_row) = canvas.cell_of(head);
        let (_, feet_row) = canvas.cell_of(head + Vec2::new(0.0, dims.feet_offset() - 0.01));
        for row in head_row + 1..feet_row {
            canvas.put(col, row, '|', WHITE);
        }
        let legs = if player.walk_cycle.sin() > 0.0 { 'A' } else { '^' };
        if feet_row > head_row {
            canvas.put(col, feet_row, legs, WHITE);
        }
        canvas.put(col, head_row, 'O', SKIN);
    }
}

fn paint_overlay(canvas: &mut Canvas, game: &Game) {
    let mid = canvas.rows as i32 / 2;
    match game.state {
        GameState::Menu => {
            canvas.text_centered(mid - 2, "S T I C K R U N", MAGENTA);
            canvas.text_centered(mid, "Run, jump, shoot monsters, reach the door", WHITE);
            canvas.text_centered(mid + 2, "ENTER start   F shoot   S dash   P pause   ESC quit", GRAY);
        }
        GameState::Paused => canvas.text_centered(mid, "PAUSED", YELLOW),
        GameState::LevelComplete => canvas.text_centered(mid, "LEVEL COMPLETE", GREEN),
        GameState::Victory => canvas.text_centered(mid, "VICTORY!", YELLOW),
        GameState::GameOver => canvas.text_centered(mid, "GAME OVER", RED),
        GameState::Playing => {}
    }
}

fn stamina_bar(stamina: f32, max: f32) -> String {
    const WIDTH: usize = 10;
    let filled = if max > 0.0 { ((stamina / max) * WIDTH as f32).round() as usize } else { 0 };
    let filled = filled.min(WIDTH);
    format!("[{}{}]", "#".repeat(filled), " ".repeat(WIDTH - filled))
}

/// Renders the current game state to the terminal.
fn draw(game: &Game, stdout: &mut io::Stdout) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let field_rows = rows.saturating_sub(HUD_ROWS) as usize;
    let view = game.world.camera.viewport;
    let mut canvas = Canvas::new(cols as usize, field_rows, view);
    if game.state != GameState::Menu {
        paint_world(&mut canvas, game);
    }
    paint_overlay(&mut canvas, game);

    queue!(stdout, cursor::MoveTo(0, 0), Print(canvas.render()))?;

    let world = &game.world;
    let hud_row = canvas.rows as u16;
    queue!(
        stdout,
        cursor::MoveTo(0, hud_row),
        Clear(ClearType::CurrentLine),
        Print(format!(
            "Score: {} | Lives: {} | Stamina {} | Level {}/{}: {}",
            world.score,
            world.lives,
            stamina_bar(world.player.stamina, game.config.player.stamina_max),
            game.level_index + 1,
            game.levels().len(),
            world.level.name,
        )),
        cursor::MoveTo(0, hud_row + 1),
        Clear(ClearType::CurrentLine),
    )?;

    let color = match game.state {
        GameState::GameOver => Some(Color::Red),
        GameState::LevelComplete | GameState::Victory => Some(Color::Green),
        _ if world.player.is_invulnerable() => Some(Color::Yellow),
        _ => None,
    };
    if let Some(color) = color {
        queue!(stdout, SetForegroundColor(color))?;
    }
    let message = if world.player.is_invulnerable() && game.state == GameState::Playing {
        format!("{} (invulnerable)", game.message)
    } else {
        game.message.clone()
    };
    queue!(stdout, Print(message), ResetColor)?;

    stdout.flush()
}

fn apply_event(event: Event, game: &mut Game, input: &mut Input) {
    match event {
        Event::Key(key_event) => {
            let actions = game.config.keys.actions_for(key_event.code);
            for action in actions {
                match key_event.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => input.press(action),
                    KeyEventKind::Release => input.release(action),
                }
            }
        }
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            input.tap(Action::Shoot);
        }
        Event::FocusLost => input.clear(),
        _ => {}
    }
}

fn run(game: &mut Game, stdout: &mut io::Stdout, reports_release: bool) -> anyhow::Result<()> {
    let tick = game.config.tick();
    let frame_budget = Duration::from_secs_f32(tick);
    let mut input = Input::new();
    let mut last_frame = Instant::now();
    let mut accumulator = 0.0_f32;

    while game.running {
        let now = Instant::now();
        accumulator += now.duration_since(last_frame).as_secs_f32().min(0.25);
        last_frame = now;

        while event::poll(Duration::from_millis(0))? {
            apply_event(event::read()?, game, &mut input);
        }

        while accumulator >= tick && game.running {
            game.update(&input, tick);
            input.end_tick();
            if !reports_release {
                input.expire(tick, game.config.game.key_hold);
            }
            accumulator -= tick;
        }

        draw(game, stdout)?;

        let elapsed = now.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }
    Ok(())
}

/// Entry point for the Stickrun game.
/// Sets up the terminal, runs the game loop, and cleans up on exit.
fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args);
    init_logging(&args.log_file)?;

    let config = Config::load(&args.config);
    let level_path = args.levels.clone().or_else(|| config.game.levels.clone());
    let levels = levels_from(level_path.as_deref()).context("loading levels")?;
    for level in &levels {
        for issue in level.validate(&config) {
            log::warn!("level '{}': {}", level.name, issue);
        }
    }

    let mut game = Game::new(config, levels)?;
    if let Some(n) = args.start_level {
        let index = n.clamp(1, game.levels().len()) - 1;
        game.start(index);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide, EnableMouseCapture, Clear(ClearType::All))?;

    // Release events need the keyboard enhancement protocol; legacy terminals only repeat presses.
    let reports_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if reports_release {
        let _ = execute!(stdout, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES));
    }
    log::info!("keyboard release events: {reports_release}");

    let result = run(&mut game, &mut stdout, reports_release);

    if reports_release {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    execute!(stdout, DisableMouseCapture, cursor::Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result?;

    if game.state == GameState::Victory {
        println!("VICTORY! You finished the course with {} points.", game.world.score);
    } else {
        println!("Bye! Score: {}", game.world.score);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = parse_args(&args(&["exe"]));
        assert_eq!(parsed.config, "config.toml");
        assert_eq!(parsed.levels, None);
        assert_eq!(parsed.start_level, None);
    }

    #[test]
    fn test_parse_flags() {
        let parsed = parse_args(&args(&["exe", "--config", "c.toml", "--levels", "l.json", "--level", "2"]));
        assert_eq!(parsed.config, "c.toml");
        assert_eq!(parsed.levels.as_deref(), Some("l.json"));
        assert_eq!(parsed.start_level, Some(2));
        assert_eq!(parse_args(&args(&["exe", "3"])).start_level, Some(3));
        assert_eq!(parse_args(&args(&["exe", "abc"])).start_level, None);
    }

    #[test]
    fn test_stamina_bar() {
        assert_eq!(stamina_bar(100.0, 100.0), "[##########]");
        assert_eq!(stamina_bar(0.0, 100.0), "[          ]");
        assert_eq!(stamina_bar(50.0, 100.0), "[#####     ]");
    }

    #[test]
    fn test_canvas_projection() {
        let mut canvas = Canvas::new(68, 19, Vec2::new(1366.0, 769.0));
        canvas.fill_rect(Rect::new(0.0, 680.0, 3000.0, 100.0), '=', GRAY);
        let rendered = canvas.render();
        let lines: Vec<&str> = rendered.split("\r\n").collect();
        assert!(!lines[0].contains('='));
        assert!(lines[18].contains('='));
        canvas.put(-1, 0, 'x', "");
        canvas.put(68, 0, 'x', "");
        assert!(!canvas.render().contains('x'));
    }
}
