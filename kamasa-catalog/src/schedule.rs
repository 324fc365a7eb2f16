use serde::{Deserialize, Serialize};

/// One quantity band of a volume discount schedule.
///
/// Constructed only through [`VolumeRange::new`] or the validating parser,
/// so malformed bands never reach the runtime representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeRange {
    min: i32,
    max: Option<i32>,
    discount_percent: f64,
}

impl VolumeRange {
    pub fn new(min: i32, max: Option<i32>, discount_percent: f64) -> Result<Self, ScheduleError> {
        if min < 0 {
            return Err(ScheduleError::NegativeMin(min));
        }
        if let Some(max) = max {
            if max < min {
                return Err(ScheduleError::MaxBelowMin { min, max });
            }
        }
        if discount_percent < 0.0 {
            return Err(ScheduleError::NegativeDiscount(discount_percent));
        }
        Ok(Self {
            min,
            max,
            discount_percent,
        })
    }

    /// A band with no upper quantity limit.
    pub fn unbounded(min: i32, discount_percent: f64) -> Result<Self, ScheduleError> {
        Self::new(min, None, discount_percent)
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    /// `None` means unbounded.
    pub fn max(&self) -> Option<i32> {
        self.max
    }

    pub fn discount_percent(&self) -> f64 {
        self.discount_percent
    }

    pub fn contains(&self, quantity: i32) -> bool {
        quantity >= self.min && self.max.map_or(true, |max| quantity <= max)
    }
}

/// Ordered quantity bands for one product.
///
/// Bands may overlap; the stored order is the tie-break, so schedule authors
/// put the most specific band first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeSchedule {
    ranges: Vec<VolumeRange>,
}

impl VolumeSchedule {
    pub fn new(ranges: Vec<VolumeRange>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &[VolumeRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Discount percentage for a quantity; the first matching band wins.
    ///
    /// Non-positive quantities never match, and an empty schedule always
    /// yields 0.
    pub fn discount_for_quantity(&self, quantity: i32) -> f64 {
        if quantity <= 0 {
            return 0.0;
        }
        self.ranges
            .iter()
            .find(|range| range.contains(quantity))
            .map(VolumeRange::discount_percent)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Range minimum must be non-negative, got {0}")]
    NegativeMin(i32),
    #[error("Range maximum {max} is below minimum {min}")]
    MaxBelowMin { min: i32, max: i32 },
    #[error("Discount must be non-negative, got {0}")]
    NegativeDiscount(f64),
}

/// One row of the admin data-entry form, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScheduleRow {
    #[serde(default)]
    pub min: String,
    #[serde(default)]
    pub max: String,
    #[serde(default)]
    pub discount: String,
}

/// Filters and coerces raw form rows into a well-formed schedule.
///
/// Rows are dropped rather than rejected wholesale: a fully blank row, a row
/// with a missing or non-numeric min/discount, a non-numeric max, or a max
/// below its min never reaches the persisted schedule. A blank max means
/// unbounded.
pub fn parse_schedule_rows(rows: &[RawScheduleRow]) -> VolumeSchedule {
    let mut ranges = Vec::new();

    for row in rows {
        let min_raw = row.min.trim();
        let max_raw = row.max.trim();
        let discount_raw = row.discount.trim();

        if min_raw.is_empty() && max_raw.is_empty() && discount_raw.is_empty() {
            continue;
        }

        let Some(min) = parse_quantity(min_raw) else {
            continue;
        };
        let Some(discount) = parse_decimal(discount_raw) else {
            continue;
        };

        let max = if max_raw.is_empty() {
            None
        } else {
            match parse_quantity(max_raw) {
                Some(max) => Some(max),
                None => continue,
            }
        };

        // Only max < min can still fail here; drop the row like the rest.
        if let Ok(range) = VolumeRange::new(min, max, discount.max(0.0)) {
            ranges.push(range);
        }
    }

    VolumeSchedule::new(ranges)
}

/// Form inputs arrive as text; "12" and "12.0" both count as numeric, and
/// fractional quantities truncate like an integer cast.
fn parse_quantity(raw: &str) -> Option<i32> {
    parse_decimal(raw).map(|value| (value as i32).max(0))
}

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}
