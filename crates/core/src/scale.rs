//! Natural-to-displayed coordinate scaling.

use linch_ocr::BBox;
use serde::{Deserialize, Serialize};

use crate::{CoreError, Result};

/// Per-axis scale factors from natural image pixels to displayed pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    /// `displayed / natural` on each axis.
    pub fn between(natural: (u32, u32), displayed: (f32, f32)) -> Result<Self> {
        let (natural_w, natural_h) = natural;
        let (display_w, display_h) = displayed;

        if natural_w == 0 || natural_h == 0 {
            return Err(CoreError::InvalidDimensions(format!(
                "natural size {}x{}",
                natural_w, natural_h
            )));
        }
        if !(display_w.is_finite() && display_h.is_finite()) || display_w <= 0.0 || display_h <= 0.0
        {
            return Err(CoreError::InvalidDimensions(format!(
                "displayed size {}x{}",
                display_w, display_h
            )));
        }

        Ok(Self {
            x: display_w / natural_w as f32,
            y: display_h / natural_h as f32,
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn apply(&self, bbox: &BBox) -> BBox {
        BBox {
            x0: bbox.x0 * self.x,
            y0: bbox.y0 * self.y,
            x1: bbox.x1 * self.x,
            y1: bbox.y1 * self.y,
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}
