//! Conversion configuration.

use crate::float_types::{ImportReal, MAX_UV_CHANNELS};

/// The two conversion pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionVariant {
    /// Up to three UV channels; material colors are synthesized from mesh order.
    #[default]
    MultiChannel,
    /// Channel 0 only, V shifted by [`SINGLE_CHANNEL_V_OFFSET`]; material colors
    /// come from the diffuse color when the source has one.
    SingleChannel,
}

/// V offset applied to imported coordinates by [`ConversionVariant::SingleChannel`].
pub const SINGLE_CHANNEL_V_OFFSET: ImportReal = -1.0;

impl ConversionVariant {
    pub const fn uv_channels(self) -> usize {
        match self {
            ConversionVariant::MultiChannel => MAX_UV_CHANNELS,
            ConversionVariant::SingleChannel => 1,
        }
    }

    pub const fn v_offset(self) -> ImportReal {
        match self {
            ConversionVariant::MultiChannel => 0.0,
            ConversionVariant::SingleChannel => SINGLE_CHANNEL_V_OFFSET,
        }
    }

    pub const fn uses_diffuse_color(self) -> bool {
        matches!(self, ConversionVariant::SingleChannel)
    }
}

/// How vertices are laid out in the produced sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Vertices shared across the whole object
    #[default]
    Normal,
    /// Every material group gets its own vertex block
    Opened,
    /// Like `Opened`, but vertex positions are the UV coordinates `(u, -v, 0)`
    Unwrapped,
}

/// What to do with a triangle whose planar projection is collinear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegenerateMappingPolicy {
    /// Abort the conversion with [`ConversionError::DegenerateMapping`](crate::errors::ConversionError::DegenerateMapping)
    #[default]
    Reject,
    /// Give the polygon the identity mapping and log a warning
    Identity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionOptions {
    pub variant: ConversionVariant,
    pub mode: ExportMode,
    pub degenerate_mappings: DegenerateMappingPolicy,
}

impl ConversionOptions {
    pub const fn with_variant(mut self, variant: ConversionVariant) -> Self {
        self.variant = variant;
        self
    }

    pub const fn with_mode(mut self, mode: ExportMode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn with_degenerate_mappings(mut self, policy: DegenerateMappingPolicy) -> Self {
        self.degenerate_mappings = policy;
        self
    }
}
