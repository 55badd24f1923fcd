use std::env;
use std::io::stdout;

use crossterm::execute;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use stickrun::levels_from;

/// World pixels per printed column and row.
const CELL_W: f32 = 25.0;
const CELL_H: f32 = 40.0;

#[derive(Clone, Copy, PartialEq)]
enum Cell {
    Empty,
    Ground,
    Platform,
    Goal,
    Spawn,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut level_num = None;
    let mut use_ascii = false;
    let mut levels_path = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--ascii" {
            use_ascii = true;
        } else if arg == "--levels" {
            levels_path = iter.next().cloned();
        } else if let Ok(n) = arg.parse::<usize>() {
            level_num = Some(n);
        }
    }

    let level_num = match level_num {
        Some(n) => n,
        None => {
            println!("Usage: {} <level_number> [--levels PATH] [--ascii]", args[0]);
            return Ok(());
        }
    };

    let levels = levels_from(levels_path.as_deref())?;
    let Some(level) = level_num.checked_sub(1).and_then(|i| levels.get(i)) else {
        anyhow::bail!("level {} does not exist ({} available)", level_num, levels.len());
    };

    let cols = (level.world_width / CELL_W).ceil() as usize;
    let bottom = if level.solid_ground { level.ground_y + CELL_H } else { level.kill_y(0.0) };
    let rows = (bottom / CELL_H).ceil().max(1.0) as usize;
    let mut grid = vec![vec![Cell::Empty; cols]; rows];

    let mut mark = |x0: f32, y0: f32, x1: f32, y1: f32, cell: Cell| {
        let c0 = (x0 / CELL_W).floor().max(0.0) as usize;
        let r0 = (y0 / CELL_H).floor().max(0.0) as usize;
        let c1 = ((x1 / CELL_W).ceil() as usize).min(cols);
        let r1 = ((y1 / CELL_H).ceil() as usize).min(rows);
        for row in grid.iter_mut().take(r1).skip(r0) {
            for slot in row.iter_mut().take(c1).skip(c0) {
                *slot = cell;
            }
        }
    };

    if level.solid_ground {
        mark(0.0, level.ground_y, level.world_width, bottom, Cell::Ground);
    }
    for p in &level.platforms {
        mark(p.left(), p.top(), p.right(), p.bottom(), Cell::Platform);
    }
    let g = level.goal;
    mark(g.left(), g.top(), g.right(), g.bottom(), Cell::Goal);
    mark(level.spawn.x, level.spawn.y, level.spawn.x + 1.0, level.spawn.y + 1.0, Cell::Spawn);

    let mut out = stdout();
    execute!(out, SetForegroundColor(Color::Magenta), Print(format!("--- Level {}: {} ---\n", level_num, level.name)), ResetColor)?;

    for row in &grid {
        let mut line = String::new();
        for cell in row {
            let (color, sym) = match cell {
                Cell::Empty => {
                    line.push_str(if use_ascii { "  " } else { " " });
                    continue;
                }
                Cell::Ground => (Color::DarkGrey, if use_ascii { "▓▓" } else { "=" }),
                Cell::Platform => (Color::White, if use_ascii { "██" } else { "#" }),
                Cell::Goal => (Color::Yellow, if use_ascii { "][" } else { "D" }),
                Cell::Spawn => (Color::Cyan, if use_ascii { "☺ " } else { "@" }),
            };
            print!("{}", line);
            line.clear();
            execute!(out, SetForegroundColor(color), Print(sym), ResetColor)?;
        }
        println!("{}", line);
    }

    println!(
        "monsters: up to {} of {:?} | platforms: {} | ground: {}",
        level.max_monsters,
        level.monster_kinds,
        level.platforms.len(),
        if level.solid_ground { "solid" } else { "pit" },
    );
    Ok(())
}
