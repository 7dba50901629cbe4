// src/batch.rs
//! Decoding many independent inputs on worker threads
//!
//! Every input is decoded by its own single-threaded pass; the pool only
//! spreads passes across threads. Results come back in input order.

use crate::config::DecodeOptions;
use crate::error::Result;
use crate::report::{decode_buffer, decode_source, TelemetryReport};
use crate::source::MetadataSource;
use crossbeam_channel::{bounded, unbounded};
use std::num::NonZeroUsize;
use std::thread;
use tracing::debug;

/// Worker count used when the caller passes 0
pub fn default_workers() -> usize {
    thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
}

/// Load and decode every source; one failing source does not affect others
pub fn decode_all<S>(sources: &[S], options: &DecodeOptions, workers: usize) -> Vec<Result<TelemetryReport>>
where
    S: MetadataSource + Sync,
{
    run_pool(sources, workers, |source| decode_source(source, options))
}

/// Decode in-memory buffers
pub fn decode_buffers<B>(buffers: &[B], options: &DecodeOptions, workers: usize) -> Vec<TelemetryReport>
where
    B: AsRef<[u8]> + Sync,
{
    run_pool(buffers, workers, |buffer| decode_buffer(buffer.as_ref(), options))
}

fn run_pool<T, R, F>(items: &[T], workers: usize, job: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let workers = match workers {
        0 => default_workers(),
        n => n,
    }
    .min(items.len().max(1));

    let (job_tx, job_rx) = bounded::<usize>(workers * 2);
    let (result_tx, result_rx) = unbounded::<(usize, R)>();

    thread::scope(|scope| {
        for worker in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let job = &job;
            scope.spawn(move || {
                for index in job_rx.iter() {
                    debug!(worker, index, "decoding input");
                    if result_tx.send((index, job(&items[index]))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(result_tx);

        for index in 0..items.len() {
            if job_tx.send(index).is_err() {
                break;
            }
        }
        drop(job_tx);
    });

    let mut results: Vec<(usize, R)> = result_rx.iter().collect();
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::klv::TokenWriter;
    use crate::source::{DumpFile, RawMetadata};

    fn buffer_with_samples(n: u16) -> Vec<u8> {
        let mut writer = TokenWriter::new();
        for i in 0..n {
            writer.write_u64(b"VPTS", &[1001 * i as u64]).unwrap();
            writer.write_samples::<i16>(b"ACCL", 3, &[1, 1, 1]).unwrap();
        }
        writer.into_bytes().to_vec()
    }

    #[test]
    fn test_order_preserved() {
        let buffers: Vec<Vec<u8>> = (1..=12).map(buffer_with_samples).collect();
        let reports = decode_buffers(&buffers, &DecodeOptions::default(), 4);
        let counts: Vec<usize> = reports.iter().map(|r| r.streams.samples.len()).collect();
        assert_eq!(counts, (1..=12).collect::<Vec<usize>>());
    }

    #[test]
    fn test_failures_stay_per_source() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.bin");
        std::fs::write(&good, buffer_with_samples(2)).unwrap();

        let sources = vec![DumpFile::new(&good), DumpFile::new(dir.path().join("missing.bin"))];
        let results = decode_all(&sources, &DecodeOptions::default(), 0);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().streams.samples.len(), 2);
        assert!(results[1].is_err());
    }

    #[test]
    fn test_empty_input() {
        let sources: Vec<RawMetadata> = Vec::new();
        assert!(decode_all(&sources, &DecodeOptions::default(), 3).is_empty());
    }
}
