use crate::foundation::core::Canvas;

/// Emoji byte ceiling (64 KiB).
pub const EMOJI_MAX_BYTES: u64 = 64 * 1024;
/// Message byte ceiling (2 MiB).
pub const MESSAGE_MAX_BYTES: u64 = 2048 * 1024;
/// Emoji side length in pixels.
pub const EMOJI_SIDE: u32 = 128;
/// Colour cap applied to emoji artifacts.
pub const EMOJI_MAX_COLORS: u16 = 48;
/// Soft frame cap applied to emoji artifacts.
pub const EMOJI_MAX_FRAMES: usize = 12;

/// Upload target an artifact is optimized for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Small square custom emoji.
    Emoji,
    /// Inline message attachment.
    #[default]
    Message,
}

impl Profile {
    /// Lower-case display name.
    pub fn name(self) -> &'static str {
        match self {
            Profile::Emoji => "emoji",
            Profile::Message => "message",
        }
    }
}

/// Constraints the optimizer enforces for one [`Profile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OptimizationProfile {
    /// Which target this describes.
    pub profile: Profile,
    /// Byte budget; exceeding it is reported, not fatal.
    pub max_bytes: u64,
    /// Frames larger than this are resampled down to it.
    pub target: Option<Canvas>,
    /// Colour count cap.
    pub max_colors: u16,
    /// Frame count cap enforced by uniform subsampling.
    pub max_frames: Option<usize>,
}

impl OptimizationProfile {
    /// 128x128, at most 48 colours and 12 frames, 64 KiB.
    pub fn emoji() -> Self {
        Self {
            profile: Profile::Emoji,
            max_bytes: EMOJI_MAX_BYTES,
            target: Some(Canvas {
                width: EMOJI_SIDE,
                height: EMOJI_SIDE,
            }),
            max_colors: EMOJI_MAX_COLORS,
            max_frames: Some(EMOJI_MAX_FRAMES),
        }
    }

    /// Caller-chosen dimensions, up to 256 colours, 2 MiB.
    pub fn message() -> Self {
        Self {
            profile: Profile::Message,
            max_bytes: MESSAGE_MAX_BYTES,
            target: None,
            max_colors: 256,
            max_frames: None,
        }
    }

    /// Whether the profile is the emoji target.
    pub fn is_emoji(&self) -> bool {
        self.profile == Profile::Emoji
    }

    /// Size a canvas should be fitted to: the target when `canvas` exceeds it on either axis.
    pub fn fitted_canvas(&self, canvas: Canvas) -> Canvas {
        match self.target {
            Some(t) if canvas.width > t.width || canvas.height > t.height => t,
            _ => canvas,
        }
    }

    /// Requested colour count capped by the profile.
    pub fn capped_colors(&self, requested: u16) -> u16 {
        requested.min(self.max_colors)
    }

    /// Subsampling stride `ceil(count / max_frames)`; `1` when under the cap.
    pub fn frame_stride(&self, count: usize) -> usize {
        match self.max_frames {
            Some(max) if max > 0 && count > max => count.div_ceil(max),
            _ => 1,
        }
    }
}

impl From<Profile> for OptimizationProfile {
    fn from(p: Profile) -> Self {
        match p {
            Profile::Emoji => Self::emoji(),
            Profile::Message => Self::message(),
        }
    }
}

/// Byte-size verdict for an artifact.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SizeCheck {
    /// Artifact size in bytes.
    pub size_bytes: u64,
    /// Budget in bytes.
    pub limit_bytes: u64,
    /// `size_bytes <= limit_bytes`.
    pub passes: bool,
    /// Bytes over budget (0 when passing).
    pub overage_bytes: u64,
    /// Overage as a percentage of the limit.
    pub overage_percent: f64,
}

impl SizeCheck {
    /// Size in KiB.
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }

    /// Limit in KiB.
    pub fn limit_kb(&self) -> f64 {
        self.limit_bytes as f64 / 1024.0
    }
}

/// Compare `size_bytes` against the profile budget.
pub fn check_size(size_bytes: u64, profile: &OptimizationProfile) -> SizeCheck {
    let limit_bytes = profile.max_bytes;
    let overage_bytes = size_bytes.saturating_sub(limit_bytes);
    let overage_percent = if limit_bytes == 0 {
        0.0
    } else {
        overage_bytes as f64 / limit_bytes as f64 * 100.0
    };
    SizeCheck {
        size_bytes,
        limit_bytes,
        passes: size_bytes <= limit_bytes,
        overage_bytes,
        overage_percent,
    }
}

/// How well a canvas suits a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionFit {
    /// Exactly what the target wants.
    Optimal,
    /// Usable, with a nudge toward the optimal size.
    Acceptable,
    /// Likely rejected or rendered poorly by the target.
    Unsuitable,
}

/// Dimension verdict for an artifact.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DimensionCheck {
    /// Checked canvas.
    pub canvas: Canvas,
    /// Profile the canvas was checked against.
    pub profile: Profile,
    /// Verdict.
    pub fit: DimensionFit,
    /// Long side over short side.
    pub aspect_ratio: f64,
}

impl DimensionCheck {
    /// `Optimal` and `Acceptable` both pass.
    pub fn passes(&self) -> bool {
        self.fit != DimensionFit::Unsuitable
    }
}

/// Emoji wants square 128x128 (64..=128 square is acceptable); messages want a roughly
/// square canvas (at most 2:1) with a short side in 320..=640.
pub fn validate_dimensions(canvas: Canvas, profile: Profile) -> DimensionCheck {
    let (w, h) = (canvas.width, canvas.height);
    let short = w.min(h);
    let aspect_ratio = if short == 0 {
        f64::INFINITY
    } else {
        f64::from(w.max(h)) / f64::from(short)
    };

    let fit = match profile {
        Profile::Emoji => {
            if w == EMOJI_SIDE && h == EMOJI_SIDE {
                DimensionFit::Optimal
            } else if w == h && (64..=EMOJI_SIDE).contains(&w) {
                DimensionFit::Acceptable
            } else {
                DimensionFit::Unsuitable
            }
        }
        Profile::Message => {
            let square_ish = aspect_ratio <= 2.0;
            let reasonable = (320..=640).contains(&short);
            match (square_ish, reasonable) {
                (true, true) => DimensionFit::Optimal,
                (false, false) => DimensionFit::Unsuitable,
                _ => DimensionFit::Acceptable,
            }
        }
    };

    DimensionCheck {
        canvas,
        profile,
        fit,
        aspect_ratio,
    }
}

/// Remedies for an artifact that misses its size or dimension targets.
pub fn optimization_suggestions(size: &SizeCheck, dims: &DimensionCheck) -> Vec<String> {
    let mut out = Vec::new();
    if !size.passes {
        out.push(format!(
            "reduce file size by {:.1} KB",
            size.overage_bytes as f64 / 1024.0
        ));
        match dims.profile {
            Profile::Emoji => {
                out.push("limit to 10-12 frames".to_string());
                out.push("use 32-40 colors maximum".to_string());
                out.push("remove gradients (solid colors compress better)".to_string());
                out.push("simplify the design".to_string());
            }
            Profile::Message => {
                out.push("reduce frame count or fps".to_string());
                out.push("use fewer colors (128 -> 64)".to_string());
                out.push("reduce dimensions".to_string());
            }
        }
    }
    if dims.profile == Profile::Emoji && dims.fit != DimensionFit::Optimal {
        out.push("use 128x128 dimensions with a square aspect ratio".to_string());
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/optimize/profile.rs"]
mod tests;
