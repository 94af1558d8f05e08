// src/stats.rs

use crate::record::{Field, RecordSet, Statistics};

/// Numeric value of a cell under the coerce-or-zero policy: thousands
/// separators are dropped, and anything that still isn't a finite number
/// (blank, free text, `NaN`, `inf`) counts as 0.
///
/// Zeroing `inf` is deliberate. Lenient numeric converters usually keep
/// infinities, which would poison every total.
pub fn coerce_or_zero(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|&c| c != ',').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Sum of `field` over the set, in set order.
pub fn sum_field(set: &RecordSet, field: Field) -> f64 {
    set.iter()
        .map(|r| coerce_or_zero(r.get(field)))
        .fold(0.0, |acc, v| acc + v)
}

/// Totals over the whole set. Recomputed on every call.
pub fn compute_statistics(set: &RecordSet) -> Statistics {
    Statistics {
        count: set.len() as u64,
        total_line_item_value: sum_field(set, Field::LineItemValue),
        total_weight_kg: sum_field(set, Field::WeightKg),
        total_freight_usd: sum_field(set, Field::FreightCostUsd),
    }
}
