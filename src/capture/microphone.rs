use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use super::backend::{AudioFrame, AudioInput, InputConfig};
use crate::error::CaptureError;

/// Capture from the system's default input device.
///
/// cpal streams are not `Send`, so the stream lives on a dedicated thread
/// that forwards fixed-duration frames over a bounded channel. The callback
/// runs on the OS audio thread and must never block: full-channel frames are
/// dropped rather than waited on.
pub struct MicrophoneInput {
    config: InputConfig,
    running: Arc<AtomicBool>,
}

impl MicrophoneInput {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait::async_trait]
impl AudioInput for MicrophoneInput {
    async fn acquire(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(CaptureError::Device("microphone already open".to_string()));
        }

        let (frame_tx, frame_rx) = mpsc::channel::<AudioFrame>(64);
        let (ready_tx, ready_rx) = oneshot::channel::<Result<(), String>>();

        let running = Arc::clone(&self.running);
        let target_channels = self.config.channels;
        let buffer_duration_ms = self.config.buffer_duration_ms;

        thread::spawn(move || {
            let host = cpal::default_host();

            let device = match host.default_input_device() {
                Some(d) => d,
                None => {
                    let _ = ready_tx.send(Err("no input device available".to_string()));
                    return;
                }
            };

            let device_config = match device.default_input_config() {
                Ok(c) => c,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };

            let sample_rate = device_config.sample_rate().0;
            let device_channels = device_config.channels() as usize;
            let fold_to_mono = target_channels == 1 && device_channels > 1;
            let out_channels = if fold_to_mono { 1 } else { device_channels as u16 };

            // Samples per delivered frame, after any mono fold-down.
            let frame_len =
                (sample_rate as u64 * out_channels as u64 * buffer_duration_ms / 1000) as usize;

            let mut pending: Vec<i16> = Vec::with_capacity(frame_len);
            let mut samples_sent: u64 = 0;
            let tx = frame_tx;

            let stream = device.build_input_stream(
                &device_config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if fold_to_mono {
                        for chunk in data.chunks(device_channels) {
                            let sum: f32 = chunk.iter().sum();
                            pending.push(to_i16(sum / device_channels as f32));
                        }
                    } else {
                        pending.extend(data.iter().map(|&s| to_i16(s)));
                    }

                    while pending.len() >= frame_len {
                        let rest = pending.split_off(frame_len);
                        let samples = std::mem::replace(&mut pending, rest);

                        let timestamp_ms =
                            samples_sent * 1000 / (sample_rate as u64 * out_channels as u64);
                        samples_sent += samples.len() as u64;

                        let frame = AudioFrame {
                            samples,
                            sample_rate,
                            channels: out_channels,
                            timestamp_ms,
                        };

                        // Audio callback must not block; drop on backpressure.
                        if tx.try_send(frame).is_err() {
                            debug!("Dropping audio frame: channel full or closed");
                        }
                    }
                },
                |err| error!("Microphone stream error: {}", err),
                None,
            );

            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };

            if let Err(e) = stream.play() {
                let _ = ready_tx.send(Err(e.to_string()));
                return;
            }

            running.store(true, Ordering::SeqCst);
            let _ = ready_tx.send(Ok(()));
            info!(
                "Microphone open: {} Hz, {} channel(s)",
                sample_rate, out_channels
            );

            while running.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(50));
            }

            // Dropping the stream stops capture; the frame sender goes with
            // this thread, closing the channel.
            drop(stream);
            info!("Microphone released");
        });

        match ready_rx.await {
            Ok(Ok(())) => Ok(frame_rx),
            Ok(Err(msg)) => Err(CaptureError::PermissionDenied(msg)),
            Err(_) => Err(CaptureError::Device(
                "audio input thread exited unexpectedly".to_string(),
            )),
        }
    }

    async fn release(&mut self) -> Result<(), CaptureError> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
