use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The raw value of a single numeric form field, exactly as a caller supplied it.
///
/// Form collaborators hand over whatever the user typed. A field can be left
/// empty, hold a number, or hold text that is not a number at all. The metrics
/// engine coerces blanks and text to zero; the validator reports them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Blank,
    Number(Decimal),
    Text(String),
}

impl FieldValue {
    /// Parses user text. Accepts an optional leading `$`, a trailing `%` and
    /// `,` thousands separators around the number.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldValue::Blank;
        }
        match parse_decimal(trimmed) {
            Some(value) => FieldValue::Number(value),
            None => FieldValue::Text(trimmed.to_string()),
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Best-effort numeric view: blanks and garbage become zero.
    pub fn coerce(&self) -> Decimal {
        self.as_decimal().unwrap_or(Decimal::ZERO)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Blank)
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest).trim();
    let rest = rest.strip_suffix('%').unwrap_or(rest).trim_end();
    if rest.is_empty() || rest.starts_with('-') || (negative && rest.starts_with('+')) {
        return None;
    }
    let digits = strip_thousands(rest)?;
    let value = Decimal::from_str(&digits).ok()?;
    Some(if negative { -value } else { value })
}

/// Removes `,` thousands separators. `None` when a comma appears anywhere other
/// than between groups of three integer digits, as in "12,5" or "1,0,0".
fn strip_thousands(number: &str) -> Option<String> {
    if !number.contains(',') {
        return Some(number.to_string());
    }
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if fraction.contains(',') {
        return None;
    }

    let unsigned = whole.strip_prefix('+').unwrap_or(whole);
    let well_formed = unsigned.split(',').enumerate().all(|(i, group)| {
        let width_ok = if i == 0 {
            (1..=3).contains(&group.len())
        } else {
            group.len() == 3
        };
        width_ok && group.bytes().all(|b| b.is_ascii_digit())
    });
    well_formed.then(|| number.replace(',', ""))
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Option<Decimal>> for FieldValue {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(FieldValue::Blank, FieldValue::Number)
    }
}

impl From<&str> for FieldValue {
    fn from(raw: &str) -> Self {
        FieldValue::parse(raw)
    }
}

impl From<String> for FieldValue {
    fn from(raw: String) -> Self {
        FieldValue::parse(&raw)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Blank => Ok(()),
            FieldValue::Number(value) => write!(f, "{}", value),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

// Numbers are written as strings to match how `Decimal` serializes everywhere
// else; blanks become `null`.
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Blank => serializer.serialize_none(),
            FieldValue::Number(value) => serializer.serialize_str(&value.to_string()),
            FieldValue::Text(text) => serializer.serialize_str(text),
        }
    }
}

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a string or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FieldValue, E> {
        Ok(Decimal::try_from(v)
            .map(FieldValue::Number)
            .unwrap_or_else(|_| FieldValue::Text(v.to_string())))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldValue, E> {
        Ok(FieldValue::parse(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Blank)
    }

    fn visit_none<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Blank)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<FieldValue, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

/// The raw, pre-validation inputs describing one job.
///
/// Percentages are already scaled: `15` means 15%.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobInput {
    #[serde(default)]
    pub job_name: String,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub retail_price: FieldValue,
    #[serde(default)]
    pub job_cost: FieldValue,
    #[serde(default)]
    pub division_overhead_pct: FieldValue,
    #[serde(default)]
    pub company_overhead_pct: FieldValue,
    #[serde(default)]
    pub royalty_pct: FieldValue,
    #[serde(default)]
    pub target_net_profit_pct: FieldValue,
}

impl JobInput {
    /// The coerced numeric view the metrics engine computes from.
    pub fn figures(&self) -> JobFigures {
        JobFigures {
            retail_price: self.retail_price.coerce(),
            job_cost: self.job_cost.coerce(),
            division_overhead_pct: self.division_overhead_pct.coerce(),
            company_overhead_pct: self.company_overhead_pct.coerce(),
            royalty_pct: self.royalty_pct.coerce(),
            target_net_profit_pct: self.target_net_profit_pct.coerce(),
        }
    }

    /// The job name with surrounding whitespace removed.
    pub fn trimmed_name(&self) -> &str {
        self.job_name.trim()
    }

    /// The carrier, or `None` when it was omitted or left blank.
    pub fn trimmed_carrier(&self) -> Option<&str> {
        self.carrier
            .as_deref()
            .map(str::trim)
            .filter(|carrier| !carrier.is_empty())
    }
}

/// Fully numeric job inputs. Every field of a `JobInput` after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobFigures {
    pub retail_price: Decimal,
    pub job_cost: Decimal,
    pub division_overhead_pct: Decimal,
    pub company_overhead_pct: Decimal,
    pub royalty_pct: Decimal,
    pub target_net_profit_pct: Decimal,
}

impl JobFigures {
    /// Division, company and royalty overhead combined, in percent of retail.
    /// Saturates instead of overflowing.
    pub fn total_overhead_pct(&self) -> Decimal {
        self.division_overhead_pct
            .saturating_add(self.company_overhead_pct)
            .saturating_add(self.royalty_pct)
    }
}

impl From<JobFigures> for JobInput {
    fn from(figures: JobFigures) -> Self {
        Self {
            job_name: String::new(),
            carrier: None,
            retail_price: figures.retail_price.into(),
            job_cost: figures.job_cost.into(),
            division_overhead_pct: figures.division_overhead_pct.into(),
            company_overhead_pct: figures.company_overhead_pct.into(),
            royalty_pct: figures.royalty_pct.into(),
            target_net_profit_pct: figures.target_net_profit_pct.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_recognises_blank_number_and_text() {
        assert_eq!(FieldValue::parse("   "), FieldValue::Blank);
        assert_eq!(FieldValue::parse("10400"), FieldValue::Number(dec!(10400)));
        assert_eq!(FieldValue::parse(" 12.5 "), FieldValue::Number(dec!(12.5)));
        assert_eq!(FieldValue::parse("abc"), FieldValue::Text("abc".to_string()));
    }

    #[test]
    fn parse_strips_currency_percent_and_separators() {
        assert_eq!(FieldValue::parse("$10,400.50"), FieldValue::Number(dec!(10400.50)));
        assert_eq!(FieldValue::parse("15%"), FieldValue::Number(dec!(15)));
        assert_eq!(FieldValue::parse("-$25"), FieldValue::Number(dec!(-25)));
        assert_eq!(FieldValue::parse("--5"), FieldValue::Text("--5".to_string()));
        assert_eq!(FieldValue::parse("$"), FieldValue::Text("$".to_string()));
    }

    #[test]
    fn commas_only_count_as_thousands_separators() {
        assert_eq!(FieldValue::parse("1,234,567"), FieldValue::Number(dec!(1234567)));
        assert_eq!(FieldValue::parse("-$2,500.75"), FieldValue::Number(dec!(-2500.75)));
        assert_eq!(FieldValue::parse("12,5"), FieldValue::Text("12,5".to_string()));
        assert_eq!(FieldValue::parse("1,0,0"), FieldValue::Text("1,0,0".to_string()));
        assert_eq!(FieldValue::parse("12,5%"), FieldValue::Text("12,5%".to_string()));
        assert_eq!(FieldValue::parse(",100"), FieldValue::Text(",100".to_string()));
        assert_eq!(FieldValue::parse("1,000.0,5"), FieldValue::Text("1,000.0,5".to_string()));
        assert_eq!(FieldValue::parse("1234,567"), FieldValue::Text("1234,567".to_string()));
    }

    #[test]
    fn coerce_treats_non_numbers_as_zero() {
        assert_eq!(FieldValue::Blank.coerce(), Decimal::ZERO);
        assert_eq!(FieldValue::Text("n/a".into()).coerce(), Decimal::ZERO);
        assert_eq!(FieldValue::Number(dec!(7.25)).coerce(), dec!(7.25));
    }

    #[test]
    fn figures_coerce_every_field() {
        let input = JobInput {
            job_name: "Roof".into(),
            carrier: Some("  ".into()),
            retail_price: "10000".into(),
            job_cost: "six thousand".into(),
            division_overhead_pct: "12".into(),
            company_overhead_pct: FieldValue::Blank,
            royalty_pct: "5".into(),
            target_net_profit_pct: "20".into(),
        };

        let figures = input.figures();
        assert_eq!(figures.retail_price, dec!(10000));
        assert_eq!(figures.job_cost, Decimal::ZERO);
        assert_eq!(figures.total_overhead_pct(), dec!(17));
        assert_eq!(input.trimmed_carrier(), None);
    }

    #[test]
    fn deserializes_numbers_strings_and_nulls() {
        let json = r#"{
            "job_name": "Siding",
            "retail_price": 10400,
            "job_cost": "8400",
            "division_overhead_pct": 15.5,
            "company_overhead_pct": null,
            "royalty_pct": "oops"
        }"#;
        let input: JobInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.retail_price, FieldValue::Number(dec!(10400)));
        assert_eq!(input.job_cost, FieldValue::Number(dec!(8400)));
        assert_eq!(input.division_overhead_pct, FieldValue::Number(dec!(15.5)));
        assert_eq!(input.company_overhead_pct, FieldValue::Blank);
        assert_eq!(input.royalty_pct, FieldValue::Text("oops".into()));
        assert_eq!(input.target_net_profit_pct, FieldValue::Blank);
    }
}
