/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! An event source backed by [`jxl-oxide`](jxl_oxide)
//!
//! jxl-oxide decodes the whole image in one call, this adapter replays
//! that as the event sequence a streaming decoder would produce.
use jxl2bmp_core::log::{trace, warn};
use jxl2bmp_core::options::ProfileTarget;
use jxl_oxide::{JxlImage, JxlThreadPool, PixelFormat as OxidePixelFormat};
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

use crate::errors::JxlDecodeErrors;
use crate::events::{BasicInfo, DataType, DecoderEvents, DecoderStatus, PixelFormat};
use crate::runner::ParallelRunner;
use crate::source::CodecEventSource;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Stage {
    Headers,
    ColorEncoding,
    OutputBuffer,
    Render,
    Finished,
    Failed
}

pub struct OxideEventSource<'a> {
    events:         DecoderEvents,
    input:          Option<&'a [u8]>,
    image:          Option<JxlImage>,
    stage:          Stage,
    out_size:       Option<usize>,
    error:          Option<String>,
    /// Workers available to the last render
    render_threads: usize
}

impl<'a> OxideEventSource<'a> {
    pub fn new() -> OxideEventSource<'a> {
        OxideEventSource {
            events:         DecoderEvents::empty(),
            input:          None,
            image:          None,
            stage:          Stage::Headers,
            out_size:       None,
            error:          None,
            render_threads: 0
        }
    }

    fn fail(&mut self, message: String) -> DecoderStatus {
        warn!("{}", message);
        self.error = Some(message);
        self.stage = Stage::Failed;
        DecoderStatus::Error
    }

    fn image(&self) -> Result<&JxlImage, JxlDecodeErrors> {
        self.image
            .as_ref()
            .ok_or(JxlDecodeErrors::MissingBasicInfo("the image header was queried"))
    }

    /// Render the frame into `out` on the session's workers
    ///
    /// The image is read again so jxl-oxide gets a pool matching the
    /// runner, which is only sized once the headers are known.
    fn render_into(&mut self, runner: &ParallelRunner, out: &mut [u8]) -> Result<(), String> {
        let data = self
            .input
            .ok_or_else(|| "No input was provided".to_string())?;
        let parallel = runner.is_parallel();

        let image = JxlImage::builder()
            .pool(render_pool(parallel))
            .read(data)
            .map_err(|e| format!("Could not read image: {e}"))?;

        let (threads, result) = runner.install(move || {
            let threads = if image.pool().is_multithreaded() {
                rayon::current_num_threads()
            } else {
                1
            };
            (threads, render_rgb8(&image, out, parallel))
        });
        self.render_threads = threads;

        trace!("Rendered on {} threads", self.render_threads);
        result
    }
}

fn render_rgb8(image: &JxlImage, out: &mut [u8], parallel: bool) -> Result<(), String> {
    let (width, height) = (image.width() as usize, image.height() as usize);

    let gray = match image.pixel_format() {
        OxidePixelFormat::Gray | OxidePixelFormat::Graya => true,
        OxidePixelFormat::Rgb | OxidePixelFormat::Rgba => false,
        format => return Err(format!("Unsupported pixel format {format:?}"))
    };
    let render = image.render_frame(0).map_err(|e| format!("{e}"))?;
    let planes = render.image_planar();

    let needed = if gray { 1 } else { 3 };
    if planes.len() < needed {
        return Err(format!(
            "Expected {needed} color planes, decoder produced {}",
            planes.len()
        ));
    }
    for plane in &planes[..needed] {
        if (plane.width(), plane.height()) != (width, height) {
            return Err(format!(
                "Rendered plane is {}x{}, expected {width}x{height}",
                plane.width(),
                plane.height()
            ));
        }
    }
    let (r, g, b) = if gray {
        (&planes[0], &planes[0], &planes[0])
    } else {
        (&planes[0], &planes[1], &planes[2])
    };
    if planes.len() > needed {
        trace!("Dropping {} extra channels", planes.len() - needed);
    }
    interleave_rgb8([r.buf(), g.buf(), b.buf()], width, out, parallel);
    Ok(())
}

impl<'a> Default for OxideEventSource<'a> {
    fn default() -> Self {
        OxideEventSource::new()
    }
}

/// Pool handed to jxl-oxide for rendering
///
/// The global variant runs on whichever rayon pool is current, inside
/// [`ParallelRunner::install`] that is the session's pool.
#[cfg(feature = "threads")]
fn render_pool(parallel: bool) -> JxlThreadPool {
    if parallel {
        JxlThreadPool::rayon_global()
    } else {
        JxlThreadPool::none()
    }
}

#[cfg(not(feature = "threads"))]
fn render_pool(_parallel: bool) -> JxlThreadPool {
    JxlThreadPool::none()
}

/// Map a sample in nominal `[0, 1]` range to 8 bits
#[inline(always)]
fn to_u8(sample: f32) -> u8 {
    // NaN ends up as zero
    (sample.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn interleave_row(planes: &[&[f32]; 3], width: usize, y: usize, row: &mut [u8]) {
    let start = y * width;
    let (r, g, b) = (
        &planes[0][start..start + width],
        &planes[1][start..start + width],
        &planes[2][start..start + width]
    );
    for (((pixel, r), g), b) in row.chunks_exact_mut(3).zip(r).zip(g).zip(b) {
        pixel[0] = to_u8(*r);
        pixel[1] = to_u8(*g);
        pixel[2] = to_u8(*b);
    }
}

/// Interleave three planes into tightly packed RGB rows
///
/// With `parallel` rows are spread over the current rayon pool.
fn interleave_rgb8(planes: [&[f32]; 3], width: usize, out: &mut [u8], parallel: bool) {
    let stride = width * 3;

    if stride == 0 {
        return;
    }
    if parallel {
        out.par_chunks_exact_mut(stride)
            .enumerate()
            .for_each(|(y, row)| interleave_row(&planes, width, y, row));
    } else {
        out.chunks_exact_mut(stride)
            .enumerate()
            .for_each(|(y, row)| interleave_row(&planes, width, y, row));
    }
}

impl<'a> CodecEventSource<'a> for OxideEventSource<'a> {
    fn name(&self) -> &'static str {
        "jxl-oxide"
    }

    fn subscribe_events(&mut self, events: DecoderEvents) -> Result<(), JxlDecodeErrors> {
        if self.stage != Stage::Headers {
            return Err(JxlDecodeErrors::from("Cannot subscribe after decoding started"));
        }
        self.events = events;
        Ok(())
    }

    fn set_input(&mut self, data: &'a [u8]) -> Result<(), JxlDecodeErrors> {
        if self.input.is_some() {
            return Err(JxlDecodeErrors::from("Input was already set"));
        }
        self.input = Some(data);
        Ok(())
    }

    fn process_input(
        &mut self, runner: &ParallelRunner, mut image_out: Option<&mut [u8]>
    ) -> DecoderStatus {
        loop {
            match self.stage {
                Stage::Headers => {
                    let data = match self.input {
                        Some(data) if !data.is_empty() => data,
                        _ => return DecoderStatus::NeedMoreInput
                    };
                    match JxlImage::builder().pool(JxlThreadPool::none()).read(data) {
                        Ok(image) => self.image = Some(image),
                        Err(e) => return self.fail(format!("Could not read image header: {e}"))
                    }
                    self.stage = Stage::ColorEncoding;

                    if self.events.contains(DecoderEvents::BASIC_INFO) {
                        return DecoderStatus::BasicInfo;
                    }
                }
                Stage::ColorEncoding => {
                    self.stage = Stage::OutputBuffer;

                    if self.events.contains(DecoderEvents::COLOR_ENCODING) {
                        return DecoderStatus::ColorEncoding;
                    }
                }
                Stage::OutputBuffer => {
                    if !self.events.contains(DecoderEvents::FULL_IMAGE) {
                        self.stage = Stage::Finished;
                        continue;
                    }
                    self.stage = Stage::Render;
                    return DecoderStatus::NeedImageOutBuffer;
                }
                Stage::Render => {
                    let (out, size) = match (image_out.take(), self.out_size) {
                        (Some(out), Some(size)) => (out, size),
                        _ => return self.fail("No output buffer was provided".to_string())
                    };
                    if out.len() < size {
                        return self.fail(format!(
                            "Output buffer has {} bytes, expected {size}",
                            out.len()
                        ));
                    }
                    if let Err(message) = self.render_into(runner, &mut out[..size]) {
                        return self.fail(message);
                    }
                    self.stage = Stage::Finished;
                    return DecoderStatus::FullImage;
                }
                Stage::Finished => return DecoderStatus::Success,
                Stage::Failed => return DecoderStatus::Error
            }
        }
    }

    fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn basic_info(&self) -> Result<BasicInfo, JxlDecodeErrors> {
        let image = self.image()?;

        let (num_color_channels, has_alpha) = match image.pixel_format() {
            OxidePixelFormat::Gray => (1, false),
            OxidePixelFormat::Graya => (1, true),
            OxidePixelFormat::Rgb | OxidePixelFormat::Cmyk => (3, false),
            OxidePixelFormat::Rgba | OxidePixelFormat::Cmyka => (3, true)
        };
        Ok(BasicInfo {
            xsize: image.width(),
            ysize: image.height(),
            num_color_channels,
            has_alpha
        })
    }

    fn image_out_buffer_size(&self, format: &PixelFormat) -> Result<usize, JxlDecodeErrors> {
        let image = self.image()?;

        format
            .buffer_size(image.width() as usize, image.height() as usize)
            .ok_or(JxlDecodeErrors::from("Output buffer size overflows"))
    }

    fn set_image_out_buffer(
        &mut self, format: &PixelFormat, size: usize
    ) -> Result<(), JxlDecodeErrors> {
        if format.num_channels != 3 || format.data_type != DataType::Uint8 {
            return Err(JxlDecodeErrors::from(
                "Only 8 bit RGB output is supported by this decoder"
            ));
        }
        let expected = self.image_out_buffer_size(format)?;

        if size < expected {
            return Err(JxlDecodeErrors::BufferSizeMismatch(expected, size));
        }
        // CMYK shows up here rather than at render time
        if let OxidePixelFormat::Cmyk | OxidePixelFormat::Cmyka = self.image()?.pixel_format() {
            return Err(JxlDecodeErrors::from("CMYK images are not supported"));
        }
        self.out_size = Some(expected);
        Ok(())
    }

    fn icc_profile_size(
        &self, _format: &PixelFormat, target: ProfileTarget
    ) -> Result<usize, JxlDecodeErrors> {
        let image = self.image()?;

        Ok(match target {
            ProfileTarget::Data => image.rendered_icc().len(),
            ProfileTarget::Original => image.original_icc().map_or(0, <[u8]>::len)
        })
    }

    fn copy_icc_profile(
        &self, _format: &PixelFormat, target: ProfileTarget, out: &mut [u8]
    ) -> Result<(), JxlDecodeErrors> {
        let image = self.image()?;

        let rendered;
        let icc = match target {
            ProfileTarget::Data => {
                rendered = image.rendered_icc();
                rendered.as_slice()
            }
            ProfileTarget::Original => image.original_icc().unwrap_or(&[])
        };
        if icc.len() != out.len() {
            return Err(JxlDecodeErrors::from("ICC buffer does not match profile size"));
        }
        out.copy_from_slice(icc);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use zune_core::bit_depth::BitDepth;
    use zune_core::colorspace::ColorSpace;
    use zune_core::options::EncoderOptions;
    use zune_jpegxl::JxlSimpleEncoder;

    use crate::events::{DecoderEvents, DecoderStatus, PixelFormat};
    use crate::oxide::{to_u8, OxideEventSource};
    use crate::runner::ParallelRunner;
    use crate::source::CodecEventSource;

    fn render_with(runner: &ParallelRunner) -> OxideEventSource<'static> {
        let (width, height) = (24, 16);
        let pixels = (0..width * height * 3).map(|x| x as u8).collect::<Vec<u8>>();
        let options = EncoderOptions::new(width, height, ColorSpace::RGB, BitDepth::Eight);
        let file = JxlSimpleEncoder::new(&pixels, options).encode().unwrap();

        let mut source = OxideEventSource::new();
        source
            .subscribe_events(DecoderEvents::BASIC_INFO | DecoderEvents::FULL_IMAGE)
            .unwrap();
        source.set_input(Vec::leak(file)).unwrap();

        assert_eq!(source.process_input(runner, None), DecoderStatus::BasicInfo);
        assert_eq!(
            source.process_input(runner, None),
            DecoderStatus::NeedImageOutBuffer
        );
        let size = source.image_out_buffer_size(&PixelFormat::RGB8).unwrap();
        source.set_image_out_buffer(&PixelFormat::RGB8, size).unwrap();

        let mut out = vec![0; size];
        assert_eq!(
            source.process_input(runner, Some(&mut out)),
            DecoderStatus::FullImage
        );
        assert_eq!(out, pixels);
        source
    }

    #[test]
    fn frame_is_rendered_on_the_session_pool() {
        let mut runner = ParallelRunner::new(None);
        runner.set_threads(3);

        if runner.is_parallel() {
            let source = render_with(&runner);
            assert_eq!(source.render_threads, runner.threads());
        }
    }

    #[test]
    fn inline_runner_renders_on_the_calling_thread() {
        let runner = ParallelRunner::new(None);
        let source = render_with(&runner);

        assert_eq!(source.render_threads, 1);
    }

    #[test]
    fn samples_are_clamped_and_rounded() {
        assert_eq!(to_u8(-0.5), 0);
        assert_eq!(to_u8(0.0), 0);
        assert_eq!(to_u8(0.5), 128);
        assert_eq!(to_u8(1.0), 255);
        assert_eq!(to_u8(3.0), 255);
        assert_eq!(to_u8(f32::NAN), 0);
    }
}
