use std::fs;
use std::path::Path;

use tracing::{debug, info};
use visioncortex::PathSimplifyMode;
use vtracer::{ColorImage, Config, SvgFile, convert};

use crate::config::{ColorMode, Hierarchy, PathMode, VectorizerOptions};
use crate::outcome::Outcome;
use crate::{BridgeError, BridgeResult};

use super::{Vectorizer, write_atomically};

impl From<ColorMode> for vtracer::ColorMode {
    fn from(value: ColorMode) -> Self {
        match value {
            ColorMode::Color => vtracer::ColorMode::Color,
            ColorMode::Binary => vtracer::ColorMode::Binary,
        }
    }
}

impl From<Hierarchy> for vtracer::Hierarchical {
    fn from(value: Hierarchy) -> Self {
        match value {
            Hierarchy::Stacked => vtracer::Hierarchical::Stacked,
            Hierarchy::Cutout => vtracer::Hierarchical::Cutout,
        }
    }
}

impl From<PathMode> for PathSimplifyMode {
    fn from(value: PathMode) -> Self {
        match value {
            PathMode::None => PathSimplifyMode::None,
            PathMode::Polygon => PathSimplifyMode::Polygon,
            PathMode::Spline => PathSimplifyMode::Spline,
        }
    }
}

/// Calls VTracer in-process and writes the SVG once tracing has succeeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct VtracerVectorizer;

impl VtracerVectorizer {
    /// Read, decode and trace `input`, then replace `output` with the SVG.
    pub fn run(&self, options: &VectorizerOptions, input: &Path, output: &Path) -> BridgeResult<()> {
        let bytes = fs::read(input)?;
        let svg = trace_to_svg_string(&bytes, options)?;
        write_atomically(output, svg.as_bytes())?;
        debug!(bytes = svg.len(), "svg written");
        Ok(())
    }
}

impl Vectorizer for VtracerVectorizer {
    fn name(&self) -> &'static str {
        "library"
    }

    fn convert(&self, options: &VectorizerOptions, input: &Path, output: &Path) -> Outcome {
        info!(input = %input.display(), output = %output.display(), "running vtracer in-process");
        Outcome::from_result(self.run(options, input, output))
    }
}

/// Decode encoded image bytes (format sniffed from content) into an RGBA `ColorImage`.
pub fn decode_color_image(bytes: &[u8]) -> BridgeResult<ColorImage> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ColorImage {
        pixels: rgba.into_raw(),
        width: width as usize,
        height: height as usize,
    })
}

/// Decode and trace encoded image bytes into SVG text.
pub fn trace_to_svg_string(bytes: &[u8], options: &VectorizerOptions) -> BridgeResult<String> {
    let img = decode_color_image(bytes)?;
    let svg_file = trace(img, options)?;
    Ok(svg_file.to_string())
}

/// Trace a ColorImage into an SVG using VTracer with the given options.
pub fn trace(img: ColorImage, options: &VectorizerOptions) -> BridgeResult<SvgFile> {
    let cfg = engine_config(options)?;
    let svg_file = convert(img, cfg).map_err(BridgeError::Trace)?;
    Ok(svg_file)
}

/// Map resolved options onto VTracer's config, checking each value fits the engine's types.
pub fn engine_config(options: &VectorizerOptions) -> BridgeResult<Config> {
    // VTracer shifts channels by `8 - precision`; anything outside 1..=8 cannot be honoured.
    if !(1..=8).contains(&options.color_precision) {
        return Err(out_of_range("colorPrecision", options.color_precision));
    }
    // The speckle size is squared into an area, and path precision feeds a format width.
    let filter_speckle: usize = integer("filterSpeckle", options.filter_speckle)?;
    if filter_speckle.checked_mul(filter_speckle).is_none() {
        return Err(out_of_range("filterSpeckle", filter_speckle));
    }
    let path_precision: u16 = integer("pathPrecision", options.path_precision)?;

    Ok(Config {
        color_mode: options.color_mode.into(),
        hierarchical: options.hierarchical.into(),
        mode: options.mode.into(),
        filter_speckle,
        color_precision: integer("colorPrecision", options.color_precision)?,
        layer_difference: rounded("layerDifference", options.layer_difference)?,
        corner_threshold: rounded("cornerThreshold", options.corner_threshold)?,
        length_threshold: options.length_threshold,
        max_iterations: integer("maxIterations", options.max_iterations)?,
        splice_threshold: rounded("spliceThreshold", options.splice_threshold)?,
        path_precision: Some(u32::from(path_precision)),
    })
}

fn out_of_range(field: &'static str, value: impl ToString) -> BridgeError {
    BridgeError::OutOfRange {
        field,
        value: value.to_string(),
    }
}

fn integer<T: TryFrom<i64>>(field: &'static str, value: i64) -> BridgeResult<T> {
    T::try_from(value).map_err(|_| out_of_range(field, value))
}

fn rounded(field: &'static str, value: f64) -> BridgeResult<i32> {
    let value = value.round();
    if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(out_of_range(field, value));
    }
    Ok(value as i32)
}
