/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoder options
//!
//! Options shared by every decode session, all setters
//! consume and return the options so they can be chained.

/// Which color profile to capture from the image
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ProfileTarget {
    /// The profile of the pixels handed out by the decoder
    #[default]
    Data,
    /// The profile originally embedded in the file
    Original
}

/// Decoder options
#[derive(Debug, Copy, Clone)]
pub struct DecodeOptions {
    /// Maximum width for which the decoder will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    max_width:      usize,
    /// Maximum height for which the decoder will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    max_height:     usize,
    /// Upper bound on the worker threads a session may use
    ///
    /// - Default value: `None`, the machine's available parallelism
    max_threads:    Option<usize>,
    /// Which color profile to capture
    ///
    /// - Default value: `ProfileTarget::Data`
    profile_target: ProfileTarget
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_width:      1 << 14,
            max_height:     1 << 14,
            max_threads:    None,
            profile_target: ProfileTarget::Data
        }
    }
}

impl DecodeOptions {
    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn max_width(&self) -> usize {
        self.max_width
    }

    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn max_height(&self) -> usize {
        self.max_height
    }

    /// Get the configured thread cap, if any
    pub const fn max_threads(&self) -> Option<usize> {
        self.max_threads
    }

    pub const fn profile_target(&self) -> ProfileTarget {
        self.profile_target
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    /// Cap the number of worker threads a session may use
    ///
    /// A value of 0 or 1 decodes on the calling thread
    pub fn set_max_threads(mut self, threads: usize) -> Self {
        self.max_threads = Some(threads);
        self
    }

    pub fn set_profile_target(mut self, target: ProfileTarget) -> Self {
        self.profile_target = target;
        self
    }
}
