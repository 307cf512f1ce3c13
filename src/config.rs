use serde::Serialize;

/// Whether the engine traces a single foreground colour or every colour cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Binary,
    #[default]
    Color,
}

impl ColorMode {
    /// Spelling used by the engine's `--color-mode` flag.
    pub fn as_flag_value(self) -> &'static str {
        match self {
            ColorMode::Binary => "binary",
            ColorMode::Color => "color",
        }
    }
}

/// How traced colour layers relate to each other in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hierarchy {
    #[default]
    Stacked,
    Cutout,
}

impl Hierarchy {
    /// Spelling used by the engine's `--hierarchical` flag.
    pub fn as_flag_value(self) -> &'static str {
        match self {
            Hierarchy::Stacked => "stacked",
            Hierarchy::Cutout => "cutout",
        }
    }
}

/// Path simplification mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMode {
    #[default]
    Spline,
    Polygon,
    None,
}

impl PathMode {
    /// Spelling used by the engine's `--mode` flag.
    pub fn as_flag_value(self) -> &'static str {
        match self {
            PathMode::Spline => "spline",
            PathMode::Polygon => "polygon",
            PathMode::None => "none",
        }
    }
}

/// Fully resolved parameters handed to the vectorization engine.
///
/// Integer fields are signed on purpose: the resolver passes caller values
/// through untouched and each strategy converts them at the engine boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorizerOptions {
    pub color_mode: ColorMode,
    /// Significant bits kept per RGB channel.
    pub color_precision: i64,
    /// Patches smaller than this many pixels are discarded.
    pub filter_speckle: i64,
    /// Minimum angle in degrees to splice a spline.
    pub splice_threshold: f64,
    /// Minimum angle in degrees for a corner.
    pub corner_threshold: f64,
    pub hierarchical: Hierarchy,
    pub mode: PathMode,
    /// Colour difference between gradient layers.
    pub layer_difference: f64,
    /// Maximum segment length used when smoothing.
    pub length_threshold: f64,
    pub max_iterations: i64,
    /// Decimal places written in path data.
    pub path_precision: i64,
}

impl Default for VectorizerOptions {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Color,
            color_precision: 8,
            filter_speckle: 4,
            splice_threshold: 45.0,
            corner_threshold: 60.0,
            hierarchical: Hierarchy::Stacked,
            mode: PathMode::Spline,
            layer_difference: 6.0,
            length_threshold: 4.0,
            max_iterations: 2,
            path_precision: 5,
        }
    }
}
