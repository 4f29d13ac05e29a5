//! Block Barrage headless runner
//!
//! Plays a seeded run with a simple autopilot and prints the final state.
//!
//! Usage: `block-barrage [seed] [seconds] [tuning.json]`

mod headless {
    use block_barrage::sim::{GameEvent, GameState};
    use block_barrage::{SimError, Tuning};
    use glam::Vec2;

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Horizontal distance the autopilot treats as "lined up"
    const DEADZONE: f32 = 4.0;

    /// Run options from the command line
    pub struct Options {
        pub seed: u64,
        pub seconds: f32,
        pub tuning_path: Option<String>,
    }

    impl Options {
        pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
            let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
            let seconds = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);
            let tuning_path = args.next();
            Self {
                seed,
                seconds,
                tuning_path,
            }
        }
    }

    pub fn load_tuning(path: Option<&str>) -> Result<Tuning, SimError> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path).map_err(|source| SimError::TuningRead {
            path: path.to_string(),
            source,
        })?;
        Tuning::from_json(&json)
    }

    /// Steer under the lowest block, the one closest to ending the run
    fn autopilot(state: &GameState) -> Vec2 {
        let target = state
            .blocks()
            .iter()
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()));
        match target {
            Some(block) => {
                let dx = block.center().x - state.player.pos.x;
                if dx.abs() < DEADZONE {
                    Vec2::ZERO
                } else {
                    Vec2::new(dx, 0.0)
                }
            }
            None => Vec2::ZERO,
        }
    }

    pub fn run(options: &Options, tuning: Tuning) -> Result<(), SimError> {
        let mut state = GameState::with_tuning(
            options.seed,
            block_barrage::consts::DEFAULT_WIDTH,
            block_barrage::consts::DEFAULT_HEIGHT,
            tuning,
        )?;

        let frames = (options.seconds / FRAME_DT).ceil() as u64;
        let mut kills = 0u32;
        for _ in 0..frames {
            let dir = autopilot(&state);
            state.steer_player(dir, FRAME_DT);
            state.step(FRAME_DT);

            // Always take the first option
            if let Some(offer) = state.upgrade_offer().copied() {
                if let Err(e) = state.apply_upgrade(offer.options[0]) {
                    log::error!("Upgrade rejected: {}", e);
                }
            }

            for event in state.drain_events() {
                if let GameEvent::BlockDestroyed { .. } = event {
                    kills += 1;
                }
            }

            if state.is_game_over() {
                break;
            }
        }

        log::info!(
            "Run finished after {:.1}s: score {}, level {}, wave {}, {} blocks destroyed",
            state.time_secs,
            state.score(),
            state.level(),
            state.wave(),
            kills
        );

        match serde_json::to_string_pretty(&state.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize snapshot: {}", e),
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_no_path_uses_defaults() {
            assert_eq!(load_tuning(None).unwrap(), Tuning::default());
        }

        #[test]
        fn test_missing_tuning_file_is_an_error() {
            let path = "does/not/exist/tuning.json";
            match load_tuning(Some(path)) {
                Err(SimError::TuningRead { path: p, .. }) => assert_eq!(p, path),
                other => panic!("expected TuningRead, got {:?}", other),
            }
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Block Barrage (headless) starting...");

    let options = headless::Options::from_args(std::env::args().skip(1));
    let result = headless::load_tuning(options.tuning_path.as_deref())
        .and_then(|tuning| headless::run(&options, tuning));
    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
