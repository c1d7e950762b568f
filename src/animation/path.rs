use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathSeg, Point};

use crate::foundation::error::{PixoraError, PixoraResult};

const ARCLEN_ACCURACY: f64 = 1e-3;

/// Length used for stroke drawing when a path has no measurable geometry.
pub const FALLBACK_PATH_LENGTH: f64 = 600.0;

/// Arc-length parameterised path used for stroke drawing and motion along a path.
#[derive(Clone, Debug)]
pub struct MotionPath {
    segs: Vec<PathSeg>,
    lengths: Vec<f64>,
    total: f64,
}

impl MotionPath {
    /// Measure every segment of `path`.
    pub fn new(path: &BezPath) -> Self {
        let segs: Vec<PathSeg> = path.segments().collect();
        let lengths: Vec<f64> = segs.iter().map(|s| s.arclen(ARCLEN_ACCURACY)).collect();
        let total = lengths.iter().sum();
        Self {
            segs,
            lengths,
            total,
        }
    }

    /// Parse SVG path data (`d` attribute).
    pub fn from_svg(d: &str) -> PixoraResult<Self> {
        let path =
            BezPath::from_svg(d).map_err(|e| PixoraError::parse(format!("svg path '{d}': {e}")))?;
        Ok(Self::new(&path))
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.total
    }

    /// Length to use for a dash array; falls back for degenerate paths.
    pub fn dash_length(&self) -> f64 {
        if self.total > 0.0 {
            self.total
        } else {
            FALLBACK_PATH_LENGTH
        }
    }

    /// Point at normalized arc-length `progress`.
    pub fn point_at(&self, progress: f64) -> Option<Point> {
        let last = self.segs.len().checked_sub(1)?;
        let mut remaining = progress.clamp(0.0, 1.0) * self.total;
        for (i, (seg, &len)) in self.segs.iter().zip(&self.lengths).enumerate() {
            if remaining <= len || i == last {
                let t = if len > 0.0 {
                    seg.inv_arclen(remaining.min(len), ARCLEN_ACCURACY)
                } else {
                    0.0
                };
                return Some(seg.eval(t));
            }
            remaining -= len;
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/path.rs"]
mod tests;
