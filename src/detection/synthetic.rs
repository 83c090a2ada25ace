// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Synthetic detector for running the service without model weights
//!
//! Output follows the same contract as the model-backed detector but is
//! random. Responses built from it are flagged by the handler.

use async_trait::async_trait;
use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use super::detector::ObjectDetector;
use super::error::DetectionError;
use super::types::Detection;
use crate::vision::decode_image_bytes;

/// Labels the synthetic detector draws from
pub const SYNTHETIC_LABELS: [&str; 10] = [
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
];

pub const MIN_DETECTIONS: usize = 1;
pub const MAX_DETECTIONS: usize = 5;
pub const MIN_CONFIDENCE: f32 = 0.70;
pub const MAX_CONFIDENCE: f32 = 0.99;

/// Default simulated inference latency bounds
pub const DEFAULT_DELAY_MIN: Duration = Duration::from_millis(1000);
pub const DEFAULT_DELAY_MAX: Duration = Duration::from_millis(2000);

pub struct SyntheticDetector {
    rng: Mutex<StdRng>,
    delay_min: Duration,
    delay_max: Duration,
}

impl std::fmt::Debug for SyntheticDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntheticDetector")
            .field("delay_min", &self.delay_min)
            .field("delay_max", &self.delay_max)
            .finish_non_exhaustive()
    }
}

impl Default for SyntheticDetector {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_MIN, DEFAULT_DELAY_MAX)
    }
}

impl SyntheticDetector {
    /// Create a detector seeded from OS entropy
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn new(delay_min: Duration, delay_max: Duration) -> Self {
        Self::with_rng(StdRng::from_entropy(), delay_min, delay_max)
    }

    /// Create a reproducible detector
    pub fn with_seed(seed: u64, delay_min: Duration, delay_max: Duration) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), delay_min, delay_max)
    }

    fn with_rng(rng: StdRng, delay_min: Duration, delay_max: Duration) -> Self {
        let (delay_min, delay_max) = if delay_min <= delay_max {
            (delay_min, delay_max)
        } else {
            (delay_max, delay_min)
        };
        Self {
            rng: Mutex::new(rng),
            delay_min,
            delay_max,
        }
    }

    pub fn delay_bounds(&self) -> (Duration, Duration) {
        (self.delay_min, self.delay_max)
    }

    /// Draw detections and a delay for an image of the given size
    fn generate(&self, width: u32, height: u32) -> Result<(Vec<Detection>, Duration), DetectionError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| DetectionError::Inference("Synthetic RNG lock poisoned".to_string()))?;

        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        let count = rng.gen_range(MIN_DETECTIONS..=MAX_DETECTIONS);

        let mut detections = Vec::with_capacity(count);
        for _ in 0..count {
            let label = SYNTHETIC_LABELS[rng.gen_range(0..SYNTHETIC_LABELS.len())];
            let confidence = rng.gen_range(MIN_CONFIDENCE..=MAX_CONFIDENCE);

            let x = rng.gen_range(0.0..0.8 * w);
            let y = rng.gen_range(0.0..0.8 * h);
            let bw = rng.gen_range(0.05 * w..=(w - x).max(0.05 * w));
            let bh = rng.gen_range(0.05 * h..=(h - y).max(0.05 * h));

            detections.push(Detection::from_corners(
                label,
                confidence,
                [x, y, (x + bw).min(w), (y + bh).min(h)],
            )?);
        }

        let delay = if self.delay_max > self.delay_min {
            rng.gen_range(self.delay_min..=self.delay_max)
        } else {
            self.delay_min
        };

        Ok((detections, delay))
    }
}

#[async_trait]
impl ObjectDetector for SyntheticDetector {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn is_model_backed(&self) -> bool {
        false
    }

    async fn detect(&self, image: Bytes) -> Result<Vec<Detection>, DetectionError> {
        // Corrupt uploads must fail the same way they would with a real model
        let info = tokio::task::spawn_blocking(move || decode_image_bytes(&image).map(|(_, info)| info))
            .await
            .map_err(|e| DetectionError::Inference(format!("Decode task failed: {}", e)))??;

        let (detections, delay) = self.generate(info.width, info.height)?;

        debug!(
            "Synthetic detector produced {} detections, simulating {}ms of inference",
            detections.len(),
            delay.as_millis()
        );

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        Ok(detections)
    }
}
