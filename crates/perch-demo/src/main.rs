#![forbid(unsafe_code)]

//! Scripted Perch session, printed as JSONL.
//!
//! Runs the full coordinator against harness fixtures: the character
//! breathes, speaks, and the window gets dragged to the monitor edge so
//! the bubble flips sides. Every emitted snapshot goes to stdout as one
//! JSON line; set `RUST_LOG=perch_runtime=debug` to watch the internals.

use std::time::Duration;

use perch_geometry::{ContainerRect, ModelRect, Side};
use perch_harness::{FrameClock, MotionPattern, RecordingHost, ScriptConfig, ScriptedCharacter};
use perch_placement::TextSurface;
use perch_runtime::{Coordinator, DebugOptions, EngineConfig};

const FRAMES: u64 = 180;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = EngineConfig::from_env();
    let mut coordinator = Coordinator::new(
        config,
        DebugOptions {
            log_placement: true,
            ..DebugOptions::default()
        },
    );

    let container = ContainerRect::new(500.0, 180.0, 1000.0, 800.0);
    let mut character = ScriptedCharacter::new(
        ScriptConfig::default()
            .with_pattern(MotionPattern::Breathing {
                amplitude: 0.4,
                period: 48,
            })
            .with_ready_after(6),
    );
    let mut host = RecordingHost::new();
    host.set_work_area(Some(ModelRect::new(0.0, 0.0, 1920.0, 1040.0)));
    host.set_window(Some(ModelRect::new(500.0, 180.0, 1000.0, 800.0)));
    let mut surface = TextSurface::default();
    let mut clock = FrameClock::default();

    let mut emitted = 0usize;
    for frame in 0..FRAMES {
        match frame {
            20 => coordinator.say(
                "Hello! I live on your desktop now. Drag me around and \
                 watch where this bubble goes.",
                Some(Duration::from_millis(1500)),
                clock.now(),
            ),
            // The user drags the window flush against the right monitor
            // edge; the bubble must flip inward.
            90 => {
                host.set_window(Some(ModelRect::new(920.0, 180.0, 1000.0, 800.0)));
                coordinator.note_window_bounds(ModelRect::new(920.0, 180.0, 1000.0, 800.0));
                coordinator.say("Cozy corner, this one.", None, clock.now());
            }
            160 => coordinator.hide(),
            _ => {}
        }

        if let Some(snapshot) = coordinator.tick(
            clock.now(),
            &character,
            &mut host,
            &mut surface,
            container,
            false,
        ) {
            emitted += 1;
            if let Some(placement) = snapshot.bubble.placed() {
                let side = match placement.side {
                    Side::Left => "left",
                    Side::Right => "right",
                };
                tracing::info!(frame, side, width = placement.width, "bubble");
            }
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{line}"),
                Err(error) => tracing::warn!(%error, "snapshot not serializable"),
            }
        }

        character.advance();
        let _ = clock.tick();
    }

    coordinator.teardown();
    tracing::info!(
        frames = FRAMES,
        emitted,
        resizes = host.resize_count(),
        passthrough = ?host.passthrough_pushes(),
        "session complete"
    );
    eprintln!("--- host journal ---");
    eprint!("{}", host.journal());
}
