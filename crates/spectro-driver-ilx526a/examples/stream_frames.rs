//! Continuous spectrometer readout example.
//!
//! Streams frames from a real ILX526A Teensy device and prints per-frame
//! statistics until interrupted.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p spectro-driver-ilx526a --example stream_frames -- /dev/ttyACM0
//! ```

use std::env;
use std::time::Instant;

use spectro_driver_ilx526a::{Ilx526aConfig, Ilx526aSpectrometer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();

    let port = env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyACM0".to_string());

    println!("=== ILX526A Streaming Example ===\n");
    println!("Port: {}", port);

    let config = Ilx526aConfig::new(&port);
    println!("Pixels per frame: {}", config.pixel_count);

    let driver = Ilx526aSpectrometer::connect(config).await?;
    let task = driver.start();
    let mut frames = task.subscribe();

    let started = Instant::now();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopping...");
                task.stop();
                break;
            }
            frame = frames.recv() => {
                let frame = frame?;
                let (peak_pixel, peak) = frame.peak().unwrap_or((0, 0));
                println!(
                    "frame {:>6}  mean {:>8.1}  peak {:>5} @ pixel {:>4}  timing {}",
                    task.frames_acquired(),
                    frame.mean(),
                    peak,
                    peak_pixel,
                    frame.timing,
                );
            }
        }
    }

    task.join().await?;
    println!(
        "Acquired for {:.1} s",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
