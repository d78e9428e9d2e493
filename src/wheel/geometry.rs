//! Wheel geometry
//!
//! Maps an ordered list of equally weighted items onto circular sectors.
//! Angles are in degrees, measured clockwise with 0° at 3 o'clock, so the
//! pointer at 12 o'clock sits at -90°. Sector 0 starts at the pointer.

/// Angle of the fixed pointer in the wheel's unrotated frame
pub const POINTER_ANGLE: f64 = -90.0;

/// Saturation used for fallback sector colors
const FALLBACK_SATURATION: f64 = 0.6;
/// Lightness used for fallback sector colors
const FALLBACK_LIGHTNESS: f64 = 0.4;

/// Angular extent of one sector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub mid: f64,
}

impl Sector {
    /// Angular distance from a wheel-frame angle to the nearer boundary of
    /// this sector, `None` when the angle lies outside it
    pub fn edge_distance(&self, angle: f64) -> Option<f64> {
        let width = self.end - self.start;
        let offset = normalize_degrees(angle - self.start);
        (offset < width).then(|| offset.min(width - offset))
    }
}

/// Where and how to draw a sector label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Position relative to the wheel center (y grows downward)
    pub x: f64,
    pub y: f64,
    /// Text rotation that keeps the label upright
    pub rotation: f64,
    /// Whether the label was turned 180° to avoid being upside down
    pub flipped: bool,
}

/// Sector layout for a wheel of `item_count` equal items
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    item_count: usize,
    sector_angle: f64,
}

impl WheelGeometry {
    /// Geometry for `item_count` items. `None` for an empty wheel, whose
    /// sectors are undefined.
    pub fn new(item_count: usize) -> Option<Self> {
        if item_count == 0 {
            return None;
        }
        Some(Self {
            item_count,
            sector_angle: 360.0 / item_count as f64,
        })
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn sector_angle(&self) -> f64 {
        self.sector_angle
    }

    /// Sector `index`, clockwise from the pointer
    pub fn sector(&self, index: usize) -> Sector {
        let start = POINTER_ANGLE + index as f64 * self.sector_angle;
        Sector {
            index,
            start,
            end: start + self.sector_angle,
            mid: start + self.sector_angle / 2.0,
        }
    }

    pub fn sectors(&self) -> impl Iterator<Item = Sector> + '_ {
        (0..self.item_count).map(|i| self.sector(i))
    }

    /// Label anchor at `radius` along the sector midpoint
    pub fn label_placement(&self, index: usize, radius: f64) -> LabelPlacement {
        let angle = self.sector(index).mid;
        let rad = angle.to_radians();

        // Midpoints in the lower half-plane would read upside down
        let flipped = angle > 0.0 && angle < 180.0;
        let rotation = if flipped { angle + 180.0 } else { angle };

        LabelPlacement {
            x: rad.cos() * radius,
            y: rad.sin() * radius,
            rotation,
            flipped,
        }
    }

    /// Rotation (mod 360) that puts the middle of sector `index` under the
    /// pointer when the wheel is turned clockwise.
    pub fn resting_angle(&self, index: usize) -> f64 {
        let mid_offset = index as f64 * self.sector_angle + self.sector_angle / 2.0;
        normalize_degrees(360.0 - mid_offset)
    }

    /// Index of the sector under the pointer after rotating clockwise by
    /// `rotation` degrees.
    pub fn sector_at_pointer(&self, rotation: f64) -> usize {
        self.sector_at(POINTER_ANGLE - rotation)
    }

    /// Index of the sector containing a wheel-frame angle
    pub fn sector_at(&self, wheel_angle: f64) -> usize {
        let offset = normalize_degrees(wheel_angle - POINTER_ANGLE);
        let index = (offset / self.sector_angle).floor() as usize;
        index.min(self.item_count - 1)
    }

    /// Evenly spaced fallback color for sector `index`
    pub fn fallback_color(&self, index: usize) -> (u8, u8, u8) {
        let hue = index as f64 * 360.0 / self.item_count as f64;
        hsl_to_rgb(hue, FALLBACK_SATURATION, FALLBACK_LIGHTNESS)
    }

    /// Explicit color when given, otherwise the fallback hue
    pub fn sector_color(&self, index: usize, explicit: Option<(u8, u8, u8)>) -> (u8, u8, u8) {
        explicit.unwrap_or_else(|| self.fallback_color(index))
    }
}

/// Wrap an angle into [0, 360)
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Convert HSL (hue in degrees, saturation and lightness in 0..=1) to RGB
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = normalize_degrees(hue) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}
