use crate::error::{PipelineError, Result};
use crate::models::{Observation, OptionSide};

/// Map an observation's basis label and side to a signed moneyness offset.
///
/// Labels of the form `ATM`, `ATM + $0.50`, `ATM - $1.00` carry their own
/// signed offset and win regardless of side. A label with an unsigned dollar
/// magnitude takes its sign from the side: calls positive, puts negative.
/// A label with no magnitude at all maps calls to +1.0 and puts to -1.0.
/// Rows with neither a parseable offset nor a call/put side are unmappable.
pub fn moneyness(obs: &Observation) -> Result<f64> {
    let basis = obs.basis.trim();
    if let Some(offset) = parse_atm_label(basis) {
        return Ok(offset);
    }
    match (parse_magnitude(basis), obs.side) {
        (Some(magnitude), OptionSide::Call) => Ok(magnitude),
        (Some(magnitude), OptionSide::Put) => Ok(-magnitude),
        (None, OptionSide::Call) => Ok(1.0),
        (None, OptionSide::Put) => Ok(-1.0),
        (_, OptionSide::None) => Err(PipelineError::UnmappableRow {
            basis: obs.basis.clone(),
            side: obs.side.to_string(),
        }),
    }
}

/// `ATM` => 0.0, `ATM + $0.50` => 0.5, `ATM - $1.00` => -1.0. Anything that
/// is not an ATM-relative label returns `None`.
fn parse_atm_label(basis: &str) -> Option<f64> {
    let rest = strip_prefix_ignore_case(basis, "ATM")?.trim();
    if rest.is_empty() {
        return Some(0.0);
    }
    let (sign, rest) = match rest.as_bytes()[0] {
        b'+' => (1.0, &rest[1..]),
        b'-' => (-1.0, &rest[1..]),
        _ => return None,
    };
    let number = rest.trim().trim_start_matches('$').trim();
    number.parse::<f64>().ok().map(|value| sign * value)
}

/// First dollar amount appearing in the label, e.g. `$0.25 OTM` => 0.25.
fn parse_magnitude(basis: &str) -> Option<f64> {
    let start = basis.find(|c: char| c.is_ascii_digit())?;
    let tail = &basis[start..];
    let end = tail
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(tail.len());
    tail[..end].parse::<f64>().ok()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(basis: &str, side: OptionSide) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            curve: "NYMEX".to_string(),
            basis: basis.to_string(),
            side,
            mid: 10.0,
        }
    }

    #[test]
    fn atm_labels_carry_their_own_sign() {
        assert_eq!(moneyness(&obs("ATM", OptionSide::None)).unwrap(), 0.0);
        assert_eq!(
            moneyness(&obs("ATM + $0.50", OptionSide::Put)).unwrap(),
            0.50
        );
        assert_eq!(
            moneyness(&obs("ATM - $1.00", OptionSide::Call)).unwrap(),
            -1.00
        );
        assert_eq!(
            moneyness(&obs("atm + $2.00", OptionSide::None)).unwrap(),
            2.00
        );
    }

    #[test]
    fn unsigned_magnitudes_take_their_sign_from_the_side() {
        assert_eq!(moneyness(&obs("$0.25", OptionSide::Call)).unwrap(), 0.25);
        assert_eq!(moneyness(&obs("$0.25", OptionSide::Put)).unwrap(), -0.25);
    }

    #[test]
    fn bare_labels_fall_back_to_a_unit_offset() {
        assert_eq!(moneyness(&obs("Monthly", OptionSide::Call)).unwrap(), 1.0);
        assert_eq!(moneyness(&obs("Monthly", OptionSide::Put)).unwrap(), -1.0);
    }

    #[test]
    fn sideless_rows_without_an_offset_are_unmappable() {
        let err = moneyness(&obs("Monthly", OptionSide::None)).unwrap_err();
        assert!(matches!(err, PipelineError::UnmappableRow { .. }));
    }
}
