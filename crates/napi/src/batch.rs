//! Batch processing types and utilities for parallel compilation.

use crate::compiler::InternalCompilerConfig;
use crate::types::{CompileResult, CompilerConfig};
use napi_derive::napi;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// Input for batch processing - represents a single page to compile.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// Page identifier (typically the file path).
    pub id: String,
    /// Page source.
    pub source: String,
    /// Optional filepath override for error messages.
    pub filepath: Option<String>,
}

/// Result for a single page in a batch.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Page identifier matching the input.
    pub id: String,
    /// Compilation result (present on success).
    pub result: Option<CompileResult>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for batch processing.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchStats {
    /// Total number of pages submitted.
    pub total: u32,
    /// Number of successfully compiled pages.
    pub succeeded: u32,
    /// Number of failed compilations.
    pub failed: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to number of CPU cores.
    pub max_threads: Option<u32>,
    /// Whether to continue processing after an error. Defaults to true.
    pub continue_on_error: Option<bool>,
    /// Compiler configuration to use for all pages.
    pub config: Option<CompilerConfig>,
}

/// Result of batch processing containing all results and statistics.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchProcessingResult {
    /// Individual results for each input page.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Compiles `inputs` with `config`, in parallel unless stopping on the first error.
pub(crate) fn run_batch(
    config: &InternalCompilerConfig,
    inputs: Vec<BatchInput>,
    opts: &BatchOptions,
) -> BatchProcessingResult {
    let start = Instant::now();
    let continue_on_error = opts.continue_on_error.unwrap_or(true);

    // Configure thread pool if max_threads is specified
    let pool = opts.max_threads.and_then(|max_threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(max_threads as usize)
            .build()
            .ok()
    });

    let total = inputs.len() as u32;
    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        let filepath = input.filepath.clone().unwrap_or_else(|| input.id.clone());
        match config.compile(&input.source, Some(filepath)) {
            Ok(result) => {
                succeeded.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    result: Some(result),
                    error: None,
                }
            }
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    result: None,
                    error: Some(e.reason.clone()),
                }
            }
        }
    };

    let results: Vec<BatchResult> = if continue_on_error {
        // Process all pages regardless of errors
        match pool {
            Some(pool) => pool.install(|| inputs.into_par_iter().map(process_input).collect()),
            None => inputs.into_par_iter().map(process_input).collect(),
        }
    } else {
        // Stop on first error, in input order
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let result = process_input(input);
            let had_error = result.error.is_some();
            results.push(result);
            if had_error {
                break;
            }
        }
        results
    };

    let elapsed = start.elapsed();
    log::debug!(
        "Batch compiled {} pages in {:.1}ms",
        results.len(),
        elapsed.as_secs_f64() * 1000.0
    );

    BatchProcessingResult {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    }
}
