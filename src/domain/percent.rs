// Bounded percentage used by gauges and progress bars
use serde::Serialize;
use std::fmt;

/// Any integer or float that can be read as a percentage.
pub trait PercentInput: Copy {
    fn to_percent(self) -> u8;
}

macro_rules! integer_percent {
    ($($t:ty),*) => {
        $(impl PercentInput for $t {
            #[allow(unused_comparisons)]
            fn to_percent(self) -> u8 {
                if self <= 0 { 0 } else if self >= 100 { 100 } else { self as u8 }
            }
        })*
    };
}

integer_percent!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl PercentInput for f64 {
    fn to_percent(self) -> u8 {
        let v = self.trunc();
        if v.is_nan() {
            return 0;
        }
        v.clamp(0.0, 100.0) as u8
    }
}

impl PercentInput for f32 {
    fn to_percent(self) -> u8 {
        f64::from(self).to_percent()
    }
}

/// Truncate toward zero and saturate into `[0, 100]`. NaN reads as 0.
pub fn clamp_percent(value: impl PercentInput) -> u8 {
    value.to_percent()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PercentValue(u8);

impl PercentValue {
    pub fn new(value: impl PercentInput) -> Self {
        Self(clamp_percent(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn remainder(self) -> u8 {
        100 - self.0
    }
}

impl fmt::Display for PercentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
