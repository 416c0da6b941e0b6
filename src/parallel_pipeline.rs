// THEORY:
// The `parallel_pipeline` wraps the synchronous `ClassificationPipeline` in a
// tokio worker pool so a request-handling layer can classify many uploads
// concurrently without blocking its own runtime threads on CPU-bound pixel
// arithmetic.
//
// Because the core pipeline is a pure function of its buffer, parallelism
// here is embarrassingly simple: there is no temporal state to hand between
// workers, no frame ordering to restore, no shared mutable anything. Each
// worker owns its own pipeline instance (built from the same injected
// threshold configuration), a dispatcher round-robins tasks across the
// workers, and every result travels back on its own oneshot channel. Two
// classifications of the same buffer yield identical diagnoses regardless of
// which worker ran them.

use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
use crate::core_modules::thresholds::ThresholdConfig;
use crate::pipeline::{ClassificationPipeline, Diagnosis};
use tokio::sync::{mpsc, oneshot};

/// One classification request in flight.
struct ClassificationTask {
    buffer: PixelBuffer,
    result_sender: oneshot::Sender<Diagnosis>,
}

/// Errors surfaced by the pool wrapper; the classification itself is total,
/// so these only occur when the pool is shutting down.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("worker pool is no longer accepting tasks")]
    PoolClosed,
    #[error("worker dropped the task before producing a diagnosis")]
    WorkerGone,
}

/// A pool of classification workers behind a dispatcher.
pub struct ParallelClassifier {
    task_sender: mpsc::UnboundedSender<ClassificationTask>,
    worker_count: usize,
}

impl ParallelClassifier {
    /// Spawns one worker per available CPU, each owning its own pipeline
    /// built from `thresholds`.
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self::with_workers(thresholds, num_cpus::get().max(1))
    }

    pub fn with_workers(thresholds: ThresholdConfig, worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<ClassificationTask>();

        // Per-worker channels fed by a single round-robin dispatcher, so a
        // slow worker never reorders another worker's queue.
        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..worker_count)
            .map(|_| mpsc::unbounded_channel::<ClassificationTask>())
            .unzip();

        tokio::spawn(async move {
            let mut worker_idx = 0;
            while let Some(task) = task_receiver.recv().await {
                let _ = worker_senders[worker_idx].send(task);
                worker_idx = (worker_idx + 1) % worker_senders.len();
            }
        });

        for mut worker_receiver in worker_receivers {
            let pipeline = ClassificationPipeline::new(thresholds.clone());
            tokio::spawn(async move {
                while let Some(task) = worker_receiver.recv().await {
                    let diagnosis = pipeline.classify(&task.buffer);
                    let _ = task.result_sender.send(diagnosis);
                }
            });
        }

        Self {
            task_sender,
            worker_count,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Classifies one buffer on the pool.
    pub async fn classify(&self, buffer: PixelBuffer) -> Result<Diagnosis, PoolError> {
        let (result_sender, result_receiver) = oneshot::channel();
        self.task_sender
            .send(ClassificationTask {
                buffer,
                result_sender,
            })
            .map_err(|_| PoolError::PoolClosed)?;
        result_receiver.await.map_err(|_| PoolError::WorkerGone)
    }

    /// Classifies a batch of buffers concurrently, preserving input order in
    /// the output.
    pub async fn classify_batch(
        &self,
        buffers: Vec<PixelBuffer>,
    ) -> Vec<Result<Diagnosis, PoolError>> {
        let pending: Vec<_> = buffers
            .into_iter()
            .map(|buffer| self.classify(buffer))
            .collect();
        futures::future::join_all(pending).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::disease_classifier::DiseaseId;
    use crate::core_modules::pixel::pixel::Pixel;

    /// Noisy leaf-green buffer the gate accepts; per-channel noise is an
    /// index hash so the color cardinality of a real photo is reproduced.
    fn leafy_buffer(seed: usize) -> PixelBuffer {
        let noise = move |i: usize, channel: u64| {
            let mut state = (i as u64 ^ (seed as u64) << 48)
                .wrapping_mul(6364136223846793005)
                .wrapping_add(0x9E3779B97F4A7C15_u64.wrapping_mul(channel + 1));
            state ^= state >> 33;
            (state % 61) as i32 - 30
        };
        let clamp = |v: i32| v.clamp(0, 255) as u8;
        PixelBuffer::from_fn(move |i| {
            Pixel::new(
                clamp(30 + noise(i, 0)),
                clamp(160 + noise(i, 1)),
                clamp(60 + noise(i, 2)),
            )
        })
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn pool_matches_the_serial_pipeline() {
        let pool = ParallelClassifier::with_workers(ThresholdConfig::default(), 4);
        let serial = ClassificationPipeline::default();

        let buffer = leafy_buffer(7);
        let expected = serial.classify(&buffer);
        let got = pool.classify(buffer).await.unwrap();
        assert_eq!(got, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn batch_preserves_input_order() {
        let pool = ParallelClassifier::with_workers(ThresholdConfig::default(), 2);
        let serial = ClassificationPipeline::default();

        let buffers: Vec<_> = (0..8).map(leafy_buffer).collect();
        let expected: Vec<_> = buffers.iter().map(|b| serial.classify(b)).collect();

        let results = pool.classify_batch(buffers).await;
        assert_eq!(results.len(), expected.len());
        for (result, expected) in results.into_iter().zip(expected) {
            assert_eq!(result.unwrap(), expected);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn rejections_survive_the_pool_boundary() {
        let pool = ParallelClassifier::with_workers(ThresholdConfig::default(), 2);
        let flat = PixelBuffer::from_fn(|_| Pixel::new(254, 254, 254));
        let diagnosis = pool.classify(flat).await.unwrap();
        assert_eq!(diagnosis.disease, DiseaseId::NotACrop);
        assert_eq!(diagnosis.confidence, 0.0);
    }
}
