//! Runs the pitch engine on a simulated source playing a slightly out of tune
//! melody, printing a tuning meter for every analyzed window.
//!
//! `cargo run --example simulated_tuner`

use std::thread;
use std::time::Duration;

use micro_tuner::{Config, Note, Pitch, PitchEngine, PitchError, SimulatedSource};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

const SAMPLE_RATE: f32 = 44100.0;

fn meter(cents: f64) -> String {
    let position = ((cents + 50.0) / 5.0).round().clamp(0.0, 20.0) as usize;
    (0..=20)
        .map(|i| match i {
            _ if i == position => '|',
            10 => '+',
            _ => '-',
        })
        .collect()
}

fn print_result(result: micro_tuner::Result<Pitch>) {
    match result {
        Ok(pitch) => println!(
            "{:>4} {:>8.2} Hz {:+6.1} cents [{}] {:6.1} dB",
            pitch.note,
            pitch.frequency,
            pitch.cents,
            meter(pitch.cents),
            pitch.level_db
        ),
        Err(error) => println!("   - {}", error),
    }
}

fn main() -> Result<(), PitchError> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_thread_names(true)
        .with_level(true);
    tracing_subscriber::registry().with(console_layer).init();

    // Twinkle twinkle, detuned by a few cents, with a rest at the end.
    let melody = ["C4", "C4", "G4", "G4", "A4", "A4", "G4"];
    let mut frequencies = Vec::new();
    for (index, name) in melody.iter().enumerate() {
        let note: Note = name.parse()?;
        let detune_cents = (index as f64 * 7.0) - 20.0;
        frequencies.push((note.frequency() * 2f64.powf(detune_cents / 1200.0)) as f32);
    }
    frequencies.push(0.0);

    let config = Config::default().with_buffer_size(4096).with_hop_size(2048);
    let source = SimulatedSource::new(SAMPLE_RATE, config.buffer_size, frequencies)
        .with_interval(Duration::from_millis(250));
    let mut engine = PitchEngine::new(config, Box::new(source), print_result)?;

    engine.start()?;
    thread::sleep(Duration::from_secs(3));
    engine.stop();
    Ok(())
}
