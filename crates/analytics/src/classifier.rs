use core_types::ProfitabilityStatus;
use rust_decimal::Decimal;

/// Whether the job's profit pays for its overhead. Trivially true when there is
/// no overhead to pay.
pub fn covers_overhead(overhead_cost_dollars: Decimal, net_profit_dollars: Decimal) -> bool {
    overhead_cost_dollars <= Decimal::ZERO || net_profit_dollars >= Decimal::ZERO
}

/// Maps a job's net margin and overhead coverage to a status.
///
/// Rules are checked in order and the first match wins. A job with no retail
/// price is always `Neutral`. The final `NoBueno` arm catches the one remaining
/// combination (target met, overhead not covered); it is reachable whenever the
/// target itself is negative.
pub fn classify_status(
    actual_net_margin_pct: Decimal,
    target_net_profit_pct: Decimal,
    covers_overhead: bool,
    retail_price: Decimal,
) -> ProfitabilityStatus {
    if retail_price <= Decimal::ZERO {
        return ProfitabilityStatus::Neutral;
    }

    let meets_target = actual_net_margin_pct >= target_net_profit_pct;
    if meets_target && covers_overhead {
        ProfitabilityStatus::Jackpot
    } else if !meets_target && covers_overhead {
        ProfitabilityStatus::Warning
    } else if !meets_target && !covers_overhead {
        ProfitabilityStatus::Thin
    } else {
        ProfitabilityStatus::NoBueno
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn no_retail_price_is_always_neutral() {
        for covers in [true, false] {
            for (net, target) in [(dec!(50), dec!(20)), (dec!(-5), dec!(20)), (dec!(0), dec!(0))] {
                assert_eq!(
                    classify_status(net, target, covers, Decimal::ZERO),
                    ProfitabilityStatus::Neutral
                );
                assert_eq!(
                    classify_status(net, target, covers, dec!(-1)),
                    ProfitabilityStatus::Neutral
                );
            }
        }
    }

    #[test]
    fn each_combination_maps_to_one_status() {
        let retail = dec!(1000);
        assert_eq!(classify_status(dec!(25), dec!(20), true, retail), ProfitabilityStatus::Jackpot);
        assert_eq!(classify_status(dec!(15), dec!(20), true, retail), ProfitabilityStatus::Warning);
        assert_eq!(classify_status(dec!(-5), dec!(20), false, retail), ProfitabilityStatus::Thin);
        assert_eq!(classify_status(dec!(25), dec!(20), false, retail), ProfitabilityStatus::NoBueno);
    }

    #[test]
    fn hitting_target_exactly_counts_as_meeting_it() {
        assert_eq!(
            classify_status(dec!(20), dec!(20), true, dec!(1)),
            ProfitabilityStatus::Jackpot
        );
    }

    #[test]
    fn overhead_coverage() {
        assert!(covers_overhead(Decimal::ZERO, dec!(-100)));
        assert!(covers_overhead(dec!(300), Decimal::ZERO));
        assert!(covers_overhead(dec!(300), dec!(1)));
        assert!(!covers_overhead(dec!(300), dec!(-0.01)));
    }
}
