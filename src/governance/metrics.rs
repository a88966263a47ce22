/// Derived chart values for the admin screens. Pure arithmetic over
/// raw event counts; nothing here touches the network.

/// Decorative intensity class for a coverage heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatLevel {
    Strong,
    Medium,
    Weak,
}

/// Bar-chart fractions per action, each clamped to [0, 1].
///
/// The denominator is `total_override` when provided, otherwise the sum
/// of the counts; a zero total falls back to the reference denominator
/// of 30 so placeholder rows still produce visible bars. The reported
/// `total_events` is not trusted to equal the sum of `by_action`.
pub fn bar_fractions(counts: &[(String, u64)], total_override: Option<u64>) -> Vec<(String, f64)> {
    let sum: u64 = counts.iter().map(|(_, c)| c).sum();
    let mut denom = match total_override {
        Some(total) if total > 0 => total,
        _ => sum,
    };
    if denom == 0 {
        denom = 30;
    }
    counts
        .iter()
        .map(|(action, count)| {
            let fraction = (*count as f64 / denom as f64).clamp(0.0, 1.0);
            (action.clone(), fraction)
        })
        .collect()
}

/// Compliance percentage string: `round(100 * (1 - full_solution/total))`
/// clamped to [0, 100], with the literal `85%` when no events exist.
pub fn compliance_rate(total_events: u64, full_solution: u64) -> String {
    if total_events == 0 {
        return "85%".to_string();
    }
    let pct = 100.0 * (1.0 - full_solution as f64 / total_events as f64);
    let pct = pct.round().clamp(0.0, 100.0) as u64;
    format!("{pct}%")
}

/// Illustrative palette for the 30-cell activity heatmap. A function of
/// index parity only; it carries no compliance signal.
pub fn heatmap_cell(idx: usize) -> HeatLevel {
    if idx % 5 == 0 {
        HeatLevel::Strong
    } else if idx % 3 == 0 {
        HeatLevel::Medium
    } else {
        HeatLevel::Weak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
        pairs.iter().map(|(a, c)| (a.to_string(), *c)).collect()
    }

    #[test]
    fn fractions_are_bounded_and_keyed_like_input() {
        let input = counts(&[
            ("brainstorm", 18),
            ("code_review", 12),
            ("citation_check", 9),
            ("full_solution", 3),
        ]);
        let fractions = bar_fractions(&input, Some(42));
        assert_eq!(fractions.len(), input.len());
        for ((action, _), (frac_action, fraction)) in input.iter().zip(&fractions) {
            assert_eq!(action, frac_action);
            assert!((0.0..=1.0).contains(fraction), "{fraction} out of range");
        }
    }

    #[test]
    fn count_above_total_caps_at_one() {
        let fractions = bar_fractions(&counts(&[("brainstorm", 90)]), Some(30));
        assert_eq!(fractions[0].1, 1.0);
    }

    #[test]
    fn zero_total_uses_reference_denominator() {
        let fractions = bar_fractions(&counts(&[("brainstorm", 15)]), Some(0));
        assert_eq!(fractions[0].1, 15.0 / 30.0);

        let empty = bar_fractions(&[], None);
        assert!(empty.is_empty());
    }

    #[test]
    fn compliance_with_no_events_is_the_85_literal() {
        assert_eq!(compliance_rate(0, 0), "85%");
    }

    #[test]
    fn compliance_rounds_and_clamps() {
        assert_eq!(compliance_rate(30, 3), "90%");
        assert_eq!(compliance_rate(10, 0), "100%");
        // More full-solution events than total: clamp, don't underflow.
        assert_eq!(compliance_rate(3, 30), "0%");
    }

    #[test]
    fn heatmap_is_decorative_parity_only() {
        assert_eq!(heatmap_cell(0), HeatLevel::Strong);
        assert_eq!(heatmap_cell(3), HeatLevel::Medium);
        assert_eq!(heatmap_cell(5), HeatLevel::Strong);
        assert_eq!(heatmap_cell(7), HeatLevel::Weak);
    }
}
