//! End-to-end acquisition tests over an in-memory serial stream.
//!
//! The device side of a `tokio::io::duplex` pair stands in for the real
//! Teensy, letting the tests drive the full connect/synchronize/read/decode
//! path byte-for-byte.

use std::time::Duration;

use spectro_driver_ilx526a::{
    Ilx526aConfig, Ilx526aSpectrometer, SpectroError, START_MARKER,
};
use tokio::io::{AsyncWriteExt, DuplexStream};

const PIXELS: usize = 4;

fn config() -> Ilx526aConfig {
    let mut cfg = Ilx526aConfig::new("in-memory");
    cfg.pixel_count = PIXELS;
    cfg.read_timeout_ms = 1000;
    cfg
}

/// Serialize one frame exactly as the firmware transmits it.
fn frame_bytes(samples: &[u16], timing: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(START_MARKER);
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out.push(0xAA); // delimiter 1, content arbitrary
    out.extend_from_slice(&timing.to_le_bytes());
    out.push(0xBB); // delimiter 2
    out
}

async fn write_all(host: &mut DuplexStream, bytes: &[u8]) {
    host.write_all(bytes).await.expect("duplex write");
}

#[tokio::test]
async fn emits_two_back_to_back_frames_in_order() {
    let (mut host, device) = tokio::io::duplex(4096);
    let driver = Ilx526aSpectrometer::from_port(Box::new(device), config()).unwrap();

    let task = driver.start();
    let mut frames = task.subscribe();

    // Second marker immediately follows the first frame's trailing delimiter.
    write_all(&mut host, &frame_bytes(&[8, 16, 24, 32], 1)).await;
    write_all(&mut host, &frame_bytes(&[1, 2, 3, 4], 2)).await;

    let first = frames.recv().await.unwrap();
    assert_eq!(first.samples, vec![8, 16, 24, 32]);
    assert_eq!(first.timing, 1);

    let second = frames.recv().await.unwrap();
    assert_eq!(second.samples, vec![1, 2, 3, 4]);
    assert_eq!(second.timing, 2);

    assert_eq!(task.frames_acquired(), 2);

    task.stop();
    task.join().await.unwrap();
}

#[tokio::test]
async fn preamble_noise_never_leaks_into_frames() {
    let (mut host, device) = tokio::io::duplex(4096);
    let driver = Ilx526aSpectrometer::from_port(Box::new(device), config()).unwrap();

    let task = driver.start();
    let mut frames = task.subscribe();

    // Device boot chatter, then a near-miss marker, then a real frame.
    write_all(&mut host, b"ILX526A boot\n\x00\xFF\x17junk\n").await;
    let mut near_miss = *START_MARKER;
    near_miss[10] = b'X';
    write_all(&mut host, &near_miss).await;
    write_all(&mut host, &frame_bytes(&[100, 200, 300, 400], 77)).await;

    let frame = frames.recv().await.unwrap();
    assert_eq!(frame.samples, vec![100, 200, 300, 400]);
    assert_eq!(frame.timing, 77);

    task.stop();
    task.join().await.unwrap();
}

#[tokio::test]
async fn stream_ending_after_marker_terminates_with_error() {
    let (mut host, device) = tokio::io::duplex(4096);
    let driver = Ilx526aSpectrometer::from_port(Box::new(device), config()).unwrap();

    let task = driver.start();

    write_all(&mut host, START_MARKER).await;
    drop(host); // device unplugged mid-frame

    let err = task.join().await.unwrap_err();
    assert!(matches!(err, SpectroError::UnexpectedEof));
}

#[tokio::test]
async fn silent_device_terminates_with_timeout() {
    let (_host, device) = tokio::io::duplex(4096);
    let mut cfg = config();
    cfg.read_timeout_ms = 50;
    let driver = Ilx526aSpectrometer::from_port(Box::new(device), cfg).unwrap();

    let task = driver.start();
    let err = task.join().await.unwrap_err();
    assert!(matches!(err, SpectroError::Timeout { .. }));
}

#[tokio::test]
async fn stop_request_resolves_ok_while_waiting_for_marker() {
    let (_host, device) = tokio::io::duplex(4096);
    let driver = Ilx526aSpectrometer::from_port(Box::new(device), config()).unwrap();

    let task = driver.start();

    // Let the loop reach the synchronization wait, then stop it.
    tokio::time::sleep(Duration::from_millis(20)).await;
    task.stop();

    task.join().await.unwrap();
}

#[tokio::test]
async fn short_payload_yields_no_frame() {
    let (mut host, device) = tokio::io::duplex(4096);
    let driver = Ilx526aSpectrometer::from_port(Box::new(device), config()).unwrap();

    let task = driver.start();
    let mut frames = task.subscribe();

    write_all(&mut host, START_MARKER).await;
    write_all(&mut host, &[0x08, 0x00, 0x10]).await; // 3 of 8 payload bytes
    drop(host);

    let err = task.join().await.unwrap_err();
    assert!(matches!(err, SpectroError::UnexpectedEof));
    assert!(frames.try_recv().is_err(), "no frame may be emitted");
}
