use rust_decimal::{Decimal, RoundingStrategy};

/// Rounding and symbols for rendering money and percentages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal_places: u32,
    pub currency_symbol: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            currency_symbol: "$".to_string(),
        }
    }
}

impl NumberFormat {
    pub fn new(decimal_places: u32, currency_symbol: impl Into<String>) -> Self {
        Self {
            decimal_places,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Rounds half away from zero, so 66.665 becomes 66.67. A value that rounds
    /// to zero never keeps its minus sign.
    pub fn round(&self, value: Decimal) -> Decimal {
        let rounded =
            value.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() { Decimal::ZERO } else { rounded }
    }

    /// The rounded value padded to exactly `decimal_places` digits, e.g. `1120.00`.
    pub fn fixed(&self, value: Decimal) -> String {
        format!("{:.*}", self.decimal_places as usize, self.round(value))
    }

    /// e.g. `-$1,120.00`.
    pub fn currency(&self, value: Decimal) -> String {
        let rounded = self.round(value);
        let sign = if rounded.is_sign_negative() { "-" } else { "" };
        let fixed = self.fixed(rounded.abs());
        let (whole, fraction) = match fixed.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (fixed.as_str(), None),
        };

        let mut out = format!("{}{}{}", sign, self.currency_symbol, group_thousands(whole));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }

    /// e.g. `66.67%`.
    pub fn percent(&self, value: Decimal) -> String {
        format!("{}%", self.fixed(value))
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
