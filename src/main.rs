//! knobwire - Drive scene fields live from MIDI controller knobs and sliders

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use clap::Parser;
use knobwire::config::{self, KnobwireConfig};
use knobwire::controls::{list_input_ports, ControlInput, ManualInput, MidiControlInput};
use knobwire::fields::{FieldStore, SceneStore};
use knobwire::viz::{Panel, PanelCommand};
use knobwire::Session;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config: config_path,
            dry_run,
            ticks,
            panel,
        } => {
            println!("Loading configuration from {:?}...", config_path);
            let mut cfg = config::load_config(&config_path)?;
            let scene_path = cfg.scene_path(&config_path);
            let mut scene = SceneStore::load(&scene_path)?;
            let mut session = Session::from_config(&cfg, &scene)?;

            let running = Arc::new(AtomicBool::new(true));
            let handler_flag = Arc::clone(&running);
            ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))?;

            let manual;
            let midi;
            let input: &dyn ControlInput = if dry_run {
                println!("Dry run: no MIDI input, all controls read 0");
                manual = ManualInput::new();
                &manual
            } else {
                midi = MidiControlInput::connect(&cfg.midi.client_name, cfg.midi.port.as_deref())?;
                println!("Listening on {}", midi.port_name());
                &midi
            };

            let interval = Duration::from_secs_f64(1.0 / cfg.live.tick_rate_hz as f64);
            println!(
                "Live with {} binding(s) at {} Hz. Press Ctrl-C to stop.",
                session.registry().binding_count(),
                cfg.live.tick_rate_hz
            );

            {
                let mut live = session.enter_live(input, &mut scene)?;
                let mut panel = if panel { Some(Panel::open()?) } else { None };

                while running.load(Ordering::SeqCst) {
                    if ticks.is_some_and(|limit| live.ticks() >= limit) {
                        break;
                    }

                    let started = Instant::now();
                    live.tick();
                    let remaining = interval.saturating_sub(started.elapsed());

                    match panel.as_mut() {
                        Some(panel) => {
                            panel.draw(live.session(), live.input(), live.ticks())?;
                            match panel.poll_command(remaining)? {
                                Some(PanelCommand::Quit) => break,
                                Some(PanelCommand::ToggleTheme) => {
                                    live.session_mut().toggle_theme();
                                }
                                Some(PanelCommand::ClearAll) => live.session_mut().clear_all(),
                                None => {}
                            }
                        }
                        None => std::thread::sleep(remaining),
                    }
                }

                drop(panel);
                let written = live.finish();
                println!("Stopped. {} field(s) written back.", written);
            }

            scene.save(&scene_path)?;
            println!("Saved scene to {:?}", scene_path);

            cfg.bindings = session.binding_configs();
            cfg.display.theme = session.theme();
            config::save_config(&config_path, &cfg)?;
            println!("Saved bindings to {:?}", config_path);
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match check(&config_path) {
                Ok((cfg, session)) => {
                    println!("Configuration is valid!");
                    println!("  MIDI port: {}", cfg.midi.port.as_deref().unwrap_or("(first available)"));
                    println!("  Tick rate: {} Hz", cfg.live.tick_rate_hz);
                    println!("  Restore on enter: {}", cfg.live.restore_on_enter);
                    println!("  Seed history on enter: {}", cfg.live.seed_history_on_enter);
                    println!("  Scene: {:?}", cfg.scene_path(&config_path));
                    println!("  Bindings: {}", session.registry().binding_count());
                    for (channel, binding) in session.registry().iter() {
                        println!(
                            "    - {} -> {}.{} (scale {}, value {:.3})",
                            channel,
                            binding.target().unwrap_or("?"),
                            binding.field_path().unwrap_or("?"),
                            binding.scale(),
                            binding.value()
                        );
                    }
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Ports => {
            println!("Available MIDI input ports:\n");
            match list_input_ports() {
                Ok(ports) if ports.is_empty() => println!("  (none)"),
                Ok(ports) => {
                    for port in ports {
                        println!("  - {}", port);
                    }
                }
                Err(e) => println!("  Error listing ports: {}", e),
            }
        }

        Commands::Fields {
            config: config_path,
            object,
        } => {
            let cfg = config::load_config(&config_path)?;
            let scene = SceneStore::load(&cfg.scene_path(&config_path))?;

            let names: Vec<String> = match object {
                Some(name) if scene.contains(&name) => vec![name],
                Some(name) => return Err(anyhow!("Scene has no object '{}'", name)),
                None => scene.objects().iter().map(|o| o.name.clone()).collect(),
            };

            for name in names {
                println!("{}:", name);
                let fields = scene.list_numeric_fields(&name)?;
                if fields.is_empty() {
                    println!("  (no numeric fields)");
                }
                for (i, field) in fields.iter().enumerate() {
                    let value = scene.read_field(&name, &field.path)?;
                    println!("  [{}] {} ({}) = {}", i, field.path, field.kind, value);
                }
            }
        }

        Commands::Bind {
            config: config_path,
            control,
            object,
            field,
            scale,
        } => {
            let (mut cfg, mut session, scene) = open(&config_path)?;

            let id = session.create_binding(control);
            session.rebind_target(id, Some(object.as_str()), &scene)?;
            session.select_field(id, &field)?;
            if let Some(binding) = session.registry_mut().binding_mut(id) {
                binding.set_scale(scale);
            }

            cfg.bindings = session.binding_configs();
            config::save_config(&config_path, &cfg)?;
            println!("Bound {} to {}.{} (scale {})", control, object, field, scale);
        }

        Commands::Unbind {
            config: config_path,
            control,
            index,
        } => {
            let (mut cfg, mut session, _) = open(&config_path)?;

            let id = index
                .checked_sub(1)
                .and_then(|i| session.registry().bindings(control).get(i))
                .map(|b| b.id())
                .ok_or_else(|| anyhow!("{} has no binding #{}", control, index))?;
            session.remove_binding(control, id);

            cfg.bindings = session.binding_configs();
            config::save_config(&config_path, &cfg)?;
            println!("Removed binding #{} from {}", index, control);
        }

        Commands::Clear { config: config_path } => {
            let (mut cfg, mut session, _) = open(&config_path)?;
            let count = session.registry().binding_count();
            session.clear_all();

            cfg.bindings = session.binding_configs();
            config::save_config(&config_path, &cfg)?;
            println!("Cleared {} binding(s)", count);
        }

        Commands::Init => {
            write_example("knobwire.yaml", include_str!("../knobwire.example.yaml"))?;
            write_example("scene.yaml", include_str!("../scene.example.yaml"))?;
        }
    }

    Ok(())
}

/// Load config, scene and session
fn open(config_path: &Path) -> Result<(KnobwireConfig, Session, SceneStore)> {
    let cfg = config::load_config(config_path)?;
    let scene = SceneStore::load(&cfg.scene_path(config_path))?;
    let session = Session::from_config(&cfg, &scene)?;
    Ok((cfg, session, scene))
}

fn check(config_path: &Path) -> Result<(KnobwireConfig, Session)> {
    let (cfg, session, _) = open(config_path)?;
    Ok((cfg, session))
}

fn write_example(path: &str, contents: &str) -> Result<()> {
    if Path::new(path).exists() {
        println!("{} already exists. Not overwriting.", path);
    } else {
        std::fs::write(path, contents)?;
        println!("Created {} with example contents.", path);
    }
    Ok(())
}
