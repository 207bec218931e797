use amber_moon::cloud::CloudEvent;
use amber_moon::config::GameConfig;
use amber_moon::input::{InputState, Key};
use amber_moon::level::{LevelData, LevelError};
use amber_moon::scene::{GameContext, LootGameScene, OverworldScene, Scene, SceneManager, SceneTransition};
use std::env;
use std::path::Path;
use std::process::ExitCode;

/// Frames `play` runs when no count is given (ten seconds)
const DEFAULT_PLAY_FRAMES: usize = 600;
/// Frames the idle overworld run lasts
const IDLE_FRAMES: usize = 300;
const SYNC_NOT_CONFIGURED: &str = "cloud sync is not configured (set cloud_url and username in the config file)";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();

    // Validation doesn't need the save or the registries
    if let Some("validate") = args.first().map(String::as_str) {
        let path = args.get(1).ok_or_else(usage)?;
        return validate(Path::new(path));
    }

    let config = GameConfig::load_or_default(GameConfig::default_path());
    let mut ctx = GameContext::new(config);

    match args.first().map(String::as_str) {
        None => idle(&mut ctx),
        Some("play") => {
            let target = args.get(1).ok_or_else(usage)?;
            let frames = match args.get(2) {
                Some(value) => value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid frame count '{}'", value))?,
                None => DEFAULT_PLAY_FRAMES,
            };
            play(&mut ctx, target, frames)
        }
        Some("sync") => match args.get(1).map(String::as_str) {
            Some("pull") => sync(&mut ctx, true),
            Some("push") => sync(&mut ctx, false),
            _ => Err(usage()),
        },
        Some("-h") | Some("--help") => {
            println!("{}", usage());
            Ok(())
        }
        Some(other) => Err(format!("unknown command '{}'\n{}", other, usage())),
    }
}

fn usage() -> String {
    [
        "usage: amber_moon [command]",
        "  play <level-id|path> [frames]   smoke-run a level holding Right",
        "  validate <path>                 check a level file",
        "  sync pull|push                  cloud sync for the configured username",
        "  (no command)                    idle the overworld for a few seconds",
    ]
    .join("\n")
}

fn validate(path: &Path) -> Result<(), String> {
    let level = LevelData::load_from_file(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    match level.validate() {
        Ok(()) => {
            println!("{}: '{}' ({}x{}) is valid", path.display(), level.id, level.width, level.height);
            Ok(())
        }
        Err(LevelError::Invalid(problems)) => {
            for problem in &problems {
                println!("  {}", problem);
            }
            Err(format!("{}: {} problems", path.display(), problems.len()))
        }
        Err(e) => Err(e.to_string()),
    }
}

/// Finds a level by id in the library, falling back to reading it as a file
fn resolve_level(ctx: &GameContext, target: &str) -> Result<LevelData, LevelError> {
    if let Some(level) = ctx.levels.get(target) {
        return Ok(level.clone());
    }
    let path = Path::new(target);
    if path.is_file() {
        return LevelData::load_from_file(path);
    }
    Err(LevelError::Unknown(target.to_string()))
}

fn play(ctx: &mut GameContext, target: &str, frames: usize) -> Result<(), String> {
    let level = resolve_level(ctx, target).map_err(|e| e.to_string())?;
    level.validate().map_err(|e| e.to_string())?;

    let mut scene = LootGameScene::new(&level, ctx);
    let mut input = InputState::new();
    input.press(Key::Right);

    let dt = ctx.config.fixed_timestep;
    let mut finished_at = None;
    for frame in 0..frames {
        ctx.tick(dt);
        let transition = scene.update(&input, dt, ctx);
        input.end_frame();
        if matches!(transition, SceneTransition::Pop) {
            finished_at = Some(frame + 1);
            break;
        }
    }

    let (x, y) = scene.world().player.position();
    match finished_at {
        Some(frame) => log::info!(
            "'{}' finished after {} frames ({} deaths)",
            level.id,
            frame,
            scene.deaths()
        ),
        None => log::info!(
            "'{}' still running after {} frames: player at ({:.0}, {:.0}), {} deaths",
            level.id,
            frames,
            x,
            y,
            scene.deaths()
        ),
    }
    for message in ctx.toasts.messages() {
        println!("{}", message);
    }

    if ctx.persist() {
        Ok(())
    } else {
        Err("could not write the save file".to_string())
    }
}

fn sync(ctx: &mut GameContext, pull: bool) -> Result<(), String> {
    let started = if pull { ctx.sync_pull() } else { ctx.sync_push() };
    if !started {
        return Err(SYNC_NOT_CONFIGURED.to_string());
    }

    for event in ctx.wait_for_cloud() {
        match event {
            CloudEvent::Fetched(Some(_)) => println!("Pulled cloud save"),
            CloudEvent::Fetched(None) => println!("No cloud save for this username"),
            CloudEvent::Uploaded => println!("Uploaded save"),
            CloudEvent::Failed(reason) => return Err(format!("cloud sync failed: {}", reason)),
        }
    }
    Ok(())
}

fn idle(ctx: &mut GameContext) -> Result<(), String> {
    let mut manager = SceneManager::new(Box::new(OverworldScene::new(ctx)));
    let input = InputState::new();
    let dt = ctx.config.fixed_timestep;

    for _ in 0..IDLE_FRAMES {
        if !manager.is_running() {
            break;
        }
        manager.update(&input, dt, ctx);
    }

    log::info!(
        "Idled in {} with {} levels, {} items collected",
        manager.current_name().unwrap_or("nothing"),
        ctx.levels.len(),
        ctx.save.data().total_items_collected
    );
    ctx.persist();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_hint_names_real_config_keys() {
        let json = serde_json::to_value(GameConfig::default()).unwrap();
        for key in ["cloud_url", "username"] {
            assert!(json.get(key).is_some(), "config has no '{}' key", key);
            assert!(SYNC_NOT_CONFIGURED.contains(key));
        }
    }
}
