//! Celestial Guardian entry point
//!
//! Native builds run a headless round with the autopilot at a nominal 60 Hz
//! and log the outcome. The browser build enters through
//! `platform::web::start` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use celestial_guardian::audio::{AudioManager, LogBackend};
    use celestial_guardian::consts::NOMINAL_FRAME_MS;
    use celestial_guardian::persistence::FileStore;
    use celestial_guardian::sim::{Autopilot, Simulation};
    use celestial_guardian::{HighScores, QualityPreset, Settings, Tuning};

    /// Ten minutes of play at 60 Hz
    const DEFAULT_MAX_FRAMES: u64 = 36_000;

    /// Command line options
    #[derive(Debug)]
    pub struct Options {
        pub seed: Option<u64>,
        pub quality: Option<QualityPreset>,
        pub max_frames: u64,
        pub data_dir: PathBuf,
        pub width: f64,
        pub height: f64,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                seed: None,
                quality: None,
                max_frames: DEFAULT_MAX_FRAMES,
                data_dir: PathBuf::from(".celestial-guardian"),
                width: 1280.0,
                height: 750.0,
            }
        }
    }

    impl Options {
        /// `[SEED] [--quality low|medium|high] [--frames N] [--data-dir DIR] [--size WxH]`
        pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
            let mut opts = Self::default();
            let mut args = args.into_iter();

            while let Some(arg) = args.next() {
                let mut value = |name: &str| {
                    args.next()
                        .ok_or_else(|| format!("{name} needs a value"))
                };
                match arg.as_str() {
                    "--quality" => opts.quality = Some(value("--quality")?.parse()?),
                    "--frames" => {
                        opts.max_frames = value("--frames")?
                            .parse()
                            .map_err(|e| format!("bad --frames: {e}"))?
                    }
                    "--data-dir" => opts.data_dir = PathBuf::from(value("--data-dir")?),
                    "--size" => {
                        let size = value("--size")?;
                        let (w, h) = size
                            .split_once('x')
                            .ok_or_else(|| format!("bad --size '{size}', expected WxH"))?;
                        opts.width = w.parse().map_err(|e| format!("bad width: {e}"))?;
                        opts.height = h.parse().map_err(|e| format!("bad height: {e}"))?;
                    }
                    seed => {
                        opts.seed = Some(seed.parse().map_err(|e| format!("bad seed '{seed}': {e}"))?)
                    }
                }
            }
            Ok(opts)
        }
    }

    pub fn run(opts: Options) -> Result<(), Box<dyn std::error::Error>> {
        let mut store = FileStore::open(&opts.data_dir)?;
        let tuning = Tuning::load(&store);
        let mut settings = Settings::load(&store);
        if let Some(quality) = opts.quality {
            settings.quality = quality;
        }
        let mut high_scores = HighScores::load(&store);

        let seed = opts.seed.unwrap_or_else(rand::random);
        log::info!("Seed {seed}, quality {}", settings.quality.as_str());

        let mut sim = Simulation::new(tuning, seed).with_max_particles(settings.max_particles());
        let mut state = sim.new_round(opts.width, opts.height);
        state.high_score = high_scores.top_score().unwrap_or(0);

        let mut audio = AudioManager::from_settings(LogBackend, &settings);
        let mut pilot = Autopilot::default();
        let mut level = state.level;
        let mut frames = 0;

        while !state.is_game_over && frames < opts.max_frames {
            pilot.update(&mut state, sim.tuning(), NOMINAL_FRAME_MS);
            sim.advance(&mut state, NOMINAL_FRAME_MS);
            audio.flush(state.drain_sounds());

            if state.level != level {
                level = state.level;
                log::debug!("Frame {frames}: level {level}, score {}", state.score);
            }
            frames += 1;
        }

        let seconds = frames as f64 * NOMINAL_FRAME_MS / 1000.0;
        if state.is_game_over {
            log::info!("All cities lost after {seconds:.1}s");
        } else {
            log::info!(
                "Stopped after {seconds:.1}s with {} cities standing",
                state.living_cities().count()
            );
        }

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        if high_scores.record(&state, timestamp).is_some() {
            high_scores.save(&mut store)?;
        }

        println!(
            "score {} | level {} | best {} | {:.1}s | seed {}",
            state.score,
            state.level,
            high_scores.top_score().unwrap_or(0),
            seconds,
            seed
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Celestial Guardian (headless) starting...");

    let opts = match headless::Options::parse(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = headless::run(opts) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
