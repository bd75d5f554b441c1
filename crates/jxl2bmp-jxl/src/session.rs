/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The event loop that turns codec events into decoded pixels
use std::marker::PhantomData;
use std::time::Instant;

use jxl2bmp_core::image::{ColorProfile, ImageDimensions, PixelBuffer};
use jxl2bmp_core::log::{debug, info, trace};
use jxl2bmp_core::options::DecodeOptions;

use crate::errors::JxlDecodeErrors;
use crate::events::{BasicInfo, DecoderEvents, DecoderStatus, PixelFormat};
use crate::oxide::OxideEventSource;
use crate::runner::ParallelRunner;
use crate::source::CodecEventSource;

/// A fully decoded image
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub dimensions:    ImageDimensions,
    /// Interleaved RGB, rows top to bottom
    pub pixels:        PixelBuffer,
    /// Empty if the image carried no profile
    pub color_profile: ColorProfile
}

/// Image properties gathered without decoding pixels
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub dimensions:         ImageDimensions,
    pub num_color_channels: u32,
    pub has_alpha:          bool,
    pub color_profile:      ColorProfile
}

/// A single decode of a single image
///
/// The session owns the codec and the parallel runner, both are
/// released when the session ends, however it ends.
pub struct CodecSession<'a, S: CodecEventSource<'a>> {
    source:     S,
    runner:     ParallelRunner,
    options:    DecodeOptions,
    format:     PixelFormat,
    info:       Option<BasicInfo>,
    pixels:     Option<PixelBuffer>,
    profile:    ColorProfile,
    full_image: bool,
    _input:     PhantomData<&'a [u8]>
}

impl<'a, S: CodecEventSource<'a>> CodecSession<'a, S> {
    pub fn new(source: S, options: DecodeOptions) -> CodecSession<'a, S> {
        CodecSession {
            source,
            runner: ParallelRunner::new(options.max_threads()),
            options,
            format: PixelFormat::RGB8,
            info: None,
            pixels: None,
            profile: ColorProfile::empty(),
            full_image: false,
            _input: PhantomData
        }
    }

    /// Decode `data` into interleaved 8 bit RGB
    pub fn decode(mut self, data: &'a [u8]) -> Result<DecodedImage, JxlDecodeErrors> {
        let start = Instant::now();

        self.run(
            data,
            DecoderEvents::BASIC_INFO | DecoderEvents::COLOR_ENCODING | DecoderEvents::FULL_IMAGE
        )?;

        let pixels = self.pixels.take().ok_or(JxlDecodeErrors::IncompleteImage)?;

        debug!(
            "Decoded {}x{} image with {} in {:?}",
            pixels.dimensions().width,
            pixels.dimensions().height,
            self.source.name(),
            start.elapsed()
        );
        Ok(DecodedImage {
            dimensions: pixels.dimensions(),
            pixels,
            color_profile: core::mem::take(&mut self.profile)
        })
    }

    /// Read the image properties and color profile without decoding pixels
    pub fn probe(mut self, data: &'a [u8]) -> Result<ImageInfo, JxlDecodeErrors> {
        self.run(
            data,
            DecoderEvents::BASIC_INFO | DecoderEvents::COLOR_ENCODING
        )?;

        let info = self
            .info
            .ok_or(JxlDecodeErrors::MissingBasicInfo("decoding finished"))?;

        Ok(ImageInfo {
            dimensions:         ImageDimensions::new(info.xsize, info.ysize),
            num_color_channels: info.num_color_channels,
            has_alpha:          info.has_alpha,
            color_profile:      core::mem::take(&mut self.profile)
        })
    }

    fn run(&mut self, data: &'a [u8], events: DecoderEvents) -> Result<(), JxlDecodeErrors> {
        self.source.subscribe_events(events)?;
        self.source.set_input(data)?;

        trace!("Starting {} with {} input bytes", self.source.name(), data.len());

        loop {
            let image_out = self.pixels.as_mut().map(PixelBuffer::as_mut_slice);
            let status = self.source.process_input(&self.runner, image_out);

            trace!("Decoder status: {:?}", status);

            match status {
                DecoderStatus::Success => {
                    if events.contains(DecoderEvents::FULL_IMAGE)
                        && (self.pixels.is_none() || !self.full_image)
                    {
                        return Err(JxlDecodeErrors::IncompleteImage);
                    }
                    return Ok(());
                }
                DecoderStatus::Error => {
                    let message = self.source.last_error().unwrap_or("Decoder error");
                    return Err(JxlDecodeErrors::CodecError(message.to_string()));
                }
                DecoderStatus::NeedMoreInput => {
                    return Err(JxlDecodeErrors::NeedMoreInput);
                }
                DecoderStatus::BasicInfo => self.on_basic_info()?,
                DecoderStatus::NeedImageOutBuffer => self.on_output_buffer()?,
                DecoderStatus::ColorEncoding => self.on_color_encoding()?,
                DecoderStatus::FullImage => {
                    self.full_image = true;
                }
                DecoderStatus::Other(status) => {
                    return Err(JxlDecodeErrors::UnknownStatus(status));
                }
            }
        }
    }

    fn on_basic_info(&mut self) -> Result<(), JxlDecodeErrors> {
        if self.info.is_some() {
            return Err(JxlDecodeErrors::RepeatedBasicInfo);
        }
        let info = self.source.basic_info()?;
        let (width, height) = (info.xsize, info.ysize);

        if !ImageDimensions::new(width, height).is_valid() {
            return Err(JxlDecodeErrors::ZeroDimensions(width, height));
        }
        if width as usize > self.options.max_width() {
            return Err(JxlDecodeErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                width as usize
            ));
        }
        if height as usize > self.options.max_height() {
            return Err(JxlDecodeErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                height as usize
            ));
        }
        info!("Image dimensions: {}x{}", width, height);
        trace!(
            "Color channels: {}, alpha: {}",
            info.num_color_channels,
            info.has_alpha
        );

        let threads = self.source.suggest_threads(width, height);
        self.runner.set_threads(threads);
        debug!("Decoding with {} worker threads", self.runner.threads());

        self.info = Some(info);
        Ok(())
    }

    fn on_output_buffer(&mut self) -> Result<(), JxlDecodeErrors> {
        let info = self.info.ok_or(JxlDecodeErrors::MissingBasicInfo(
            "the output buffer was requested"
        ))?;
        if self.pixels.is_some() {
            return Err(JxlDecodeErrors::RepeatedOutputBuffer);
        }
        let dimensions = ImageDimensions::new(info.xsize, info.ysize);

        let expected = dimensions
            .rgb_buffer_size()
            .ok_or(JxlDecodeErrors::from("Output buffer size overflows"))?;
        let reported = self.source.image_out_buffer_size(&self.format)?;

        if expected != reported {
            return Err(JxlDecodeErrors::BufferSizeMismatch(expected, reported));
        }
        let pixels = PixelBuffer::allocate(dimensions)
            .ok_or(JxlDecodeErrors::from("Could not allocate output buffer"))?;

        self.source.set_image_out_buffer(&self.format, expected)?;
        trace!("Registered output buffer of {} bytes", expected);

        self.pixels = Some(pixels);
        Ok(())
    }

    fn on_color_encoding(&mut self) -> Result<(), JxlDecodeErrors> {
        let target = self.options.profile_target();
        let size = self.source.icc_profile_size(&self.format, target)?;

        let mut icc = vec![0; size];
        if size > 0 {
            self.source.copy_icc_profile(&self.format, target, &mut icc)?;
        }
        trace!("Color profile: {} bytes", size);

        self.profile = ColorProfile::new(icc);
        Ok(())
    }
}

/// Decode a JPEG XL image with default options
///
/// # Example
/// ```no_run
/// let data = std::fs::read("image.jxl").unwrap();
/// let image = jxl2bmp_jxl::decode(&data).unwrap();
///
/// assert_eq!(image.pixels.len(), image.dimensions.rgb_buffer_size().unwrap());
/// ```
pub fn decode(data: &[u8]) -> Result<DecodedImage, JxlDecodeErrors> {
    decode_with_options(data, DecodeOptions::default())
}

pub fn decode_with_options(
    data: &[u8], options: DecodeOptions
) -> Result<DecodedImage, JxlDecodeErrors> {
    CodecSession::new(OxideEventSource::new(), options).decode(data)
}

/// Read dimensions, channel layout and color profile without decoding pixels
pub fn probe(data: &[u8]) -> Result<ImageInfo, JxlDecodeErrors> {
    probe_with_options(data, DecodeOptions::default())
}

pub fn probe_with_options(data: &[u8], options: DecodeOptions) -> Result<ImageInfo, JxlDecodeErrors> {
    CodecSession::new(OxideEventSource::new(), options).probe(data)
}
