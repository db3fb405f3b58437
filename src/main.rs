//! MX Arena entry point
//!
//! Runs the arena headless: the autopilot plays, the recorder stands in for a
//! canvas, and a summary of the session is printed at the end.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;
    use env_logger::Env;
    use glam::Vec2;

    use mx_arena::game::{Game, GameplayView};
    use mx_arena::renderer::Recorder;
    use mx_arena::sim::GameLoop;
    use mx_arena::{ConfigError, GameConfig, Seed};

    #[derive(Parser)]
    #[command(name = "mx-arena")]
    #[command(about = "Run the arena headless with the autopilot playing")]
    struct Args {
        /// JSON configuration file (defaults are used when omitted)
        config: Option<PathBuf>,

        /// Seed overriding the configuration (numbers and text both work)
        #[arg(long)]
        seed: Option<String>,

        /// Number of ticks to simulate
        #[arg(long, default_value_t = 3600)]
        ticks: u64,

        /// Pace ticks in real time instead of running flat out
        #[arg(long)]
        realtime: bool,

        /// Print the resolved configuration as JSON and exit
        #[arg(long)]
        dump_config: bool,
    }

    fn load_config(args: &Args) -> Result<GameConfig, ConfigError> {
        let mut config = match &args.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(seed) = &args.seed {
            config.seed = Some(Seed::from(seed.as_str()));
        }
        Ok(config)
    }

    fn run(args: &Args) -> Result<(), ConfigError> {
        let config = load_config(args)?;
        if args.dump_config {
            println!("{}", config.to_json()?);
            return Ok(());
        }

        let view = GameplayView::new(&config)?.with_autopilot();
        let canvas = config.view_size.max(Vec2::ONE);
        let mut game = Game::new(Recorder::new(canvas), Box::new(view));
        let mut game_loop = GameLoop::new(config.ticks_per_second);

        if args.realtime {
            game_loop.run(&mut game, Some(args.ticks));
        } else {
            game_loop.run_unpaced(&mut game, args.ticks);
        }

        if let Some(view) = game.view::<GameplayView>() {
            let stats = view.stats();
            log::info!(
                "Session over: {} spawned, {} hits, {} kills, {} culled",
                stats.spawned,
                stats.hits,
                stats.kills,
                stats.culled
            );
            println!("{}", serde_json::to_string(&stats)?);
        }
        Ok(())
    }

    pub fn main() -> ExitCode {
        let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();
        log::info!("MX Arena (headless) starting...");

        let args = Args::parse();
        match run(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("{e}");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm; there is no headless runner
}
