use crate::categories::{CategoryPlan, Tip};

/// Per-category note for the spending summary, picked by fixed bands of
/// spent/threshold. Bands are evaluated in order; a zero threshold with
/// any spending counts as overspending, never as a division fault.
pub fn advise(plan: &CategoryPlan, category: &str, spent: f64, threshold: f64, currency: &str) -> String {
    if spent == 0.0 {
        return "🎉 Amazing! No spending in this category!".to_string();
    }

    let ratio = if threshold > 0.0 {
        spent / threshold
    } else {
        f64::INFINITY
    };

    if ratio <= 0.5 {
        "💰 Excellent budgeting! Significant savings!".to_string()
    } else if ratio <= 0.8 {
        "✅ Good control! Within safe range.".to_string()
    } else if ratio <= 1.0 {
        "⚠️ Close to limit! Be careful with next expenses.".to_string()
    } else {
        let overspend = spent - threshold;
        let tip = match plan.get(category).and_then(|c| c.tip.as_ref()) {
            Some(Tip::SaveEstimate { text, extra }) => {
                format!("{} {}{:.0}", text, currency, overspend + extra)
            }
            Some(Tip::Flat(text)) => text.to_string(),
            None => format!("Review {} spending habits", category),
        };
        format!("🚨 Over budget by {}{:.0}! {}", currency, overspend, tip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{LIFE_PLAN, SCHOOL_PLAN};

    #[test]
    fn test_zero_spend_praise() {
        let note = advise(&SCHOOL_PLAN, "transport", 0.0, 200.0, "₱");
        assert!(note.contains("No spending"));
    }

    #[test]
    fn test_band_selection() {
        assert!(advise(&SCHOOL_PLAN, "transport", 100.0, 200.0, "₱").contains("Excellent"));
        assert!(advise(&SCHOOL_PLAN, "transport", 150.0, 200.0, "₱").contains("Good control"));
        assert!(advise(&SCHOOL_PLAN, "transport", 200.0, 200.0, "₱").contains("Close to limit"));
    }

    #[test]
    fn test_overspend_names_amount_plus_estimate() {
        // 50 over threshold, meal prep tip adds a 30 estimate on top
        let note = advise(&SCHOOL_PLAN, "lunch", 250.0, 200.0, "₱");
        assert!(note.contains("Over budget by ₱50"), "got: {}", note);
        assert!(note.contains("₱80"), "got: {}", note);

        let note = advise(&SCHOOL_PLAN, "transport", 250.0, 200.0, "₱");
        assert!(note.contains("₱70"), "got: {}", note);
    }

    #[test]
    fn test_flat_tip_and_generic_fallback() {
        let note = advise(&SCHOOL_PLAN, "school_supplies", 150.0, 100.0, "₱");
        assert!(note.contains("Plan projects early"));

        let note = advise(&SCHOOL_PLAN, "load_data", 150.0, 100.0, "₱");
        assert!(note.contains("Review load_data spending habits"));

        let note = advise(&LIFE_PLAN, "mystery", 10.0, 1.0, "₱");
        assert!(note.contains("Review mystery spending habits"));
    }

    #[test]
    fn test_zero_threshold_is_overspend_not_fault() {
        let note = advise(&SCHOOL_PLAN, "load_data", 50.0, 0.0, "₱");
        assert!(note.contains("Review load_data"), "got: {}", note);
    }
}
