use stickrun::{levels_from, Config, Input, World};

/// Seconds of idle simulation used to check the spawn is safe to stand on.
const SETTLE_TIME: f32 = 2.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Vec<String> = std::env::args().collect();
    let mut levels_path = None;
    let mut config_path = stickrun::config::CONFIG_PATH.to_string();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--levels" => levels_path = iter.next().cloned(),
            "--config" => {
                if let Some(v) = iter.next() { config_path = v.clone(); }
            }
            _ => {}
        }
    }

    let config = Config::load(&config_path);
    let levels = levels_from(levels_path.as_deref())?;
    let mut failures = 0;

    for (i, level) in levels.iter().enumerate() {
        let mut issues = level.validate(&config);

        // Let the player settle at the spawn with monsters disabled.
        let mut quiet = level.clone();
        quiet.max_monsters = 0;
        let mut world = World::new(quiet, &config, config.game.seed, 0, config.player.lives);
        let idle = Input::new();
        let tick = config.tick();
        for _ in 0..(SETTLE_TIME / tick) as usize {
            world.update(&idle, &config, tick);
        }
        if !world.player.on_ground {
            issues.push("player does not come to rest after spawning".to_string());
        }

        for issue in &issues {
            println!("Level {} ({}): {}", i + 1, level.name, issue);
        }
        if !issues.is_empty() {
            failures += 1;
        }
    }

    if failures == 0 {
        println!("All {} levels validated successfully!", levels.len());
    } else {
        println!("Found {} levels with validation failures.", failures);
        std::process::exit(1);
    }
    Ok(())
}
