//! Headless streaming simulation — drives observers along scripted paths
//! and reports the chunk requirement list at each recompute.
//!
//! Usage: cargo run --release --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>     Streaming config JSON (default: built-in defaults)
//!   --observers <N>     Number of simulated observers (default: 2)
//!   --seconds <S>       Simulated duration in seconds (default: 5.0)
//!   --fps <F>           Frame rate of the simulated game loop (default: 60)
//!   --speed <U>         Observer speed in world units/second (default: 12.0)
//!   --top <K>           Requirements to print per recompute (default: 5)
//!   --json              Dump the final requirement list as JSON to stdout

use std::time::Instant;

use glam::Vec3;

use terrastream::core::logging;
use terrastream::streaming::{ChunkRequirement, ObserverId, ObserverTracker, StreamingConfig};

/// Scripted motion for one simulated observer
struct Walker {
    id: ObserverId,
    origin: Vec3,
    heading: f32,
    turn_rate: f32,
}

impl Walker {
    fn new(index: u64, count: u64) -> Self {
        let angle = index as f32 / count.max(1) as f32 * std::f32::consts::TAU;
        Self {
            id: ObserverId(index),
            origin: Vec3::new(angle.cos() * 160.0, 0.0, angle.sin() * 160.0),
            heading: angle,
            // Every other walker wanders in a wide arc, the rest go straight
            turn_rate: if index % 2 == 0 { 0.0 } else { 0.3 },
        }
    }

    /// Position and velocity at simulated time `t`
    fn sample(&self, t: f32, speed: f32) -> (Vec3, Vec3) {
        let heading = self.heading + self.turn_rate * t;
        let velocity = Vec3::new(heading.cos(), 0.0, heading.sin()) * speed;
        let position = if self.turn_rate == 0.0 {
            self.origin + velocity * t
        } else {
            // Integrated arc: radius = speed / turn_rate
            let r = speed / self.turn_rate;
            self.origin
                + Vec3::new(
                    r * (heading.sin() - self.heading.sin()),
                    0.0,
                    r * (self.heading.cos() - heading.cos()),
                )
        };
        (position, velocity)
    }
}

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let observer_count = parse_u64_arg(&args, "--observers").unwrap_or(2);
    let seconds = parse_f32_arg(&args, "--seconds").unwrap_or(5.0);
    let fps = parse_f32_arg(&args, "--fps").unwrap_or(60.0).max(1.0);
    let speed = parse_f32_arg(&args, "--speed").unwrap_or(12.0);
    let top = parse_usize_arg(&args, "--top").unwrap_or(5);
    let dump_json = args.iter().any(|a| a == "--json");

    let config = match parse_str_arg(&args, "--config") {
        Some(path) => match StreamingConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => StreamingConfig::default(),
    };

    if let Err(e) = config.validate() {
        log::warn!("{}", e);
    }

    log::info!(
        "Simulating {} observers for {:.1}s at {} fps (recompute every {}s)",
        observer_count, seconds, fps, config.recompute_interval_secs
    );

    let walkers: Vec<Walker> = (0..observer_count)
        .map(|i| Walker::new(i, observer_count))
        .collect();
    let mut tracker = ObserverTracker::new(config);

    let dt = 1.0 / fps;
    let frames = (seconds * fps).ceil() as u64;
    let mut recompute_time = 0.0f64;

    for frame in 0..frames {
        let t = frame as f32 * dt;
        for walker in &walkers {
            let (position, velocity) = walker.sample(t, speed);
            tracker.update_position(walker.id, position, velocity);
        }

        let start = Instant::now();
        if tracker.tick(dt) {
            recompute_time += start.elapsed().as_secs_f64();
            let list = tracker.required_chunks();
            log::info!(
                "t={:.2}s: {} chunks required, top: {}",
                t,
                list.len(),
                summarize(&list[..list.len().min(top)])
            );
        }
    }

    let stats = tracker.stats();
    log::info!(
        "Done: {} recomputes, avg {:.3}ms each, final list {} chunks ({} predictive samples)",
        stats.recomputes,
        if stats.recomputes > 0 { recompute_time * 1000.0 / stats.recomputes as f64 } else { 0.0 },
        stats.last_requirement_count,
        stats.last_predictive_samples,
    );

    if dump_json {
        let list = tracker.required_chunks();
        match serde_json::to_string_pretty(&*list) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize requirements: {}", e),
        }
    }
}

fn summarize(requirements: &[ChunkRequirement]) -> String {
    requirements
        .iter()
        .map(|r| format!("({},{}) {:?} {:.1}", r.coord.x, r.coord.z, r.level, r.priority))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
