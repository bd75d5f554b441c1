/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The seam between a decode session and the codec doing the work
use jxl2bmp_core::options::ProfileTarget;

use crate::errors::JxlDecodeErrors;
use crate::events::{BasicInfo, DecoderEvents, DecoderStatus, PixelFormat};
use crate::runner::ParallelRunner;

/// A codec that reports decoding progress as a stream of events
///
/// The session subscribes to the events it cares about, hands over the
/// whole input and then keeps calling [`process_input`](Self::process_input)
/// reacting to each status until the codec reports
/// [`Success`](DecoderStatus::Success) or an error.
///
/// The codec never owns the output pixels, after it asks for an output
/// buffer through [`NeedImageOutBuffer`](DecoderStatus::NeedImageOutBuffer)
/// the session lends one to every subsequent `process_input` call.
pub trait CodecEventSource<'a> {
    /// Name of the codec, used in logs
    fn name(&self) -> &'static str;

    /// Subscribe to a set of events
    ///
    /// Events outside the set are never reported.
    fn subscribe_events(&mut self, events: DecoderEvents) -> Result<(), JxlDecodeErrors>;

    /// Hand over the complete encoded stream
    fn set_input(&mut self, data: &'a [u8]) -> Result<(), JxlDecodeErrors>;

    /// Advance decoding until the next subscribed event
    ///
    /// # Arguments
    /// - runner: Parallel context work may be scheduled on
    /// - image_out: Output buffer, present once one was registered
    ///   through [`set_image_out_buffer`](Self::set_image_out_buffer)
    fn process_input(
        &mut self, runner: &ParallelRunner, image_out: Option<&mut [u8]>
    ) -> DecoderStatus;

    /// Message describing the last [`Error`](DecoderStatus::Error) status, if any
    fn last_error(&self) -> Option<&str> {
        None
    }

    /// Image properties, available after [`BasicInfo`](DecoderStatus::BasicInfo)
    fn basic_info(&self) -> Result<BasicInfo, JxlDecodeErrors>;

    /// Size in bytes of an output buffer holding the image in `format`
    fn image_out_buffer_size(&self, format: &PixelFormat) -> Result<usize, JxlDecodeErrors>;

    /// Register the output buffer layout
    ///
    /// # Arguments
    /// - format: Layout samples are written in
    /// - size: Length of the buffer lent to subsequent
    ///   [`process_input`](Self::process_input) calls
    fn set_image_out_buffer(
        &mut self, format: &PixelFormat, size: usize
    ) -> Result<(), JxlDecodeErrors>;

    /// Size of the ICC profile for `target` in bytes, may be zero
    fn icc_profile_size(
        &self, format: &PixelFormat, target: ProfileTarget
    ) -> Result<usize, JxlDecodeErrors>;

    /// Copy the ICC profile for `target` into `out`
    ///
    /// `out` must be exactly [`icc_profile_size`](Self::icc_profile_size) bytes
    fn copy_icc_profile(
        &self, format: &PixelFormat, target: ProfileTarget, out: &mut [u8]
    ) -> Result<(), JxlDecodeErrors>;

    /// Number of workers the codec would like for an image of this size
    fn suggest_threads(&self, width: u32, height: u32) -> usize {
        ParallelRunner::suggest_threads(width, height)
    }
}
