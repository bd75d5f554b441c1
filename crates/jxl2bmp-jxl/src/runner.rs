/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The session's parallel execution context
use std::num::NonZeroUsize;

use jxl2bmp_core::log::{trace, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Pixels handled by one worker, roughly one codec group
const PIXELS_PER_THREAD: u64 = 256 * 256;

/// A resizable worker pool owned by a decode session
///
/// It starts out running everything on the calling thread, the session
/// resizes it once the image dimensions are known. The pool is torn down
/// when the runner is dropped.
pub struct ParallelRunner {
    pool:        Option<ThreadPool>,
    threads:     usize,
    max_threads: Option<usize>
}

impl ParallelRunner {
    /// Create a runner that runs work on the calling thread until resized
    ///
    /// # Arguments
    /// - max_threads: Upper bound for [`set_threads`](Self::set_threads),
    ///   `None` for no bound
    pub fn new(max_threads: Option<usize>) -> ParallelRunner {
        ParallelRunner {
            pool: None,
            threads: 0,
            max_threads
        }
    }

    /// Suggested worker count for an image, about one worker per
    /// 256x256 pixels, capped at the machine's available parallelism
    pub fn suggest_threads(width: u32, height: u32) -> usize {
        let available = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1) as u64;
        let area = u64::from(width) * u64::from(height);

        available.min(area / PIXELS_PER_THREAD) as usize
    }

    /// Resize the pool to `threads` workers
    ///
    /// 0 or 1 workers run everything on the calling thread.
    /// If the pool cannot be created the runner falls back to that mode.
    pub fn set_threads(&mut self, threads: usize) {
        let threads = match self.max_threads {
            Some(max) => threads.min(max),
            None => threads
        };
        if threads == self.threads {
            return;
        }
        self.pool = None;
        self.threads = 0;

        if threads <= 1 {
            trace!("Running on the calling thread");
            return;
        }
        match ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("jxl2bmp-worker-{i}"))
            .build()
        {
            Ok(pool) => {
                trace!("Created parallel runner with {} threads", threads);
                self.pool = Some(pool);
                self.threads = threads;
            }
            Err(err) => {
                warn!("Could not create thread pool, running single threaded: {}", err);
            }
        }
    }

    /// Number of workers, 0 when running on the calling thread
    pub const fn threads(&self) -> usize {
        self.threads
    }

    pub const fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Run `op` inside the pool, or on the calling thread when there is none
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op()
        }
    }
}

impl Drop for ParallelRunner {
    fn drop(&mut self) {
        if self.pool.is_some() {
            trace!("Releasing parallel runner with {} threads", self.threads);
        }
    }
}
