use std::collections::BTreeMap;

use crate::categories::CategoryPlan;
use crate::error::{BaonError, Result};

/// Split an amount across a domain's categories by weight.
///
/// Values are `amount * weight` with no rounding; display-time formatting
/// handles presentation. The output key set always equals the plan's.
pub fn allocate(amount: f64, plan: &CategoryPlan) -> Result<BTreeMap<String, f64>> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BaonError::InvalidAmount(amount.to_string()));
    }

    Ok(plan
        .categories
        .iter()
        .map(|c| (c.key.to_string(), amount * c.weight))
        .collect())
}
