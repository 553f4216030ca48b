use crate::error::{GridError, Result};

/// Highest scoring item. Ties go to the earliest item.
pub fn arg_max<T>(items: impl IntoIterator<Item = (T, f64)>) -> Option<(T, f64)> {
    items.into_iter().fold(None, |best, (item, v)| match best {
        Some((_, bv)) if bv >= v => best,
        _ => Some((item, v)),
    })
}

pub fn check_probability(value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(GridError::InvalidProbability { value })
    }
}
