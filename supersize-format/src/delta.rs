//! Running-delta compression for the per-section numeric columns.
//!
//! Address and table-index columns are monotonic (or close to it) within a
//! section, so storing successive differences keeps most tokens short. The
//! delta sequence never crosses a section boundary; each section's column
//! restarts from an implicit previous value of zero.

use crate::{SizeFileError, SizeFileErrorKind};

/// Rewrites an absolute-value sequence as first-value-plus-differences.
pub fn encode_deltas(values: &[i64]) -> Vec<i64> {
    let mut prev = 0;
    values
        .iter()
        .map(|&value| {
            let delta = value - prev;
            prev = value;
            delta
        })
        .collect()
}

/// Reconstructs the absolute-value sequence produced by [`encode_deltas`].
///
/// Deltas come straight from an untrusted file, so the running sum is
/// checked: leaving `i64` range fails with
/// [`SizeFileErrorKind::BadNumber`](crate::SizeFileErrorKind::BadNumber).
pub fn decode_deltas(deltas: &[i64]) -> Result<Vec<i64>, SizeFileError> {
    let mut prev = 0i64;
    let mut values = Vec::with_capacity(deltas.len());
    for &delta in deltas {
        prev = prev
            .checked_add(delta)
            .ok_or(SizeFileErrorKind::BadNumber)?;
        values.push(prev);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_passes_through() {
        assert_eq!(encode_deltas(&[100, 150, 150, 400]), vec![100, 50, 0, 250]);
    }

    #[test]
    fn decode_inverts_encode() {
        let cases: &[&[i64]] = &[
            &[],
            &[0],
            &[7],
            &[100, 150, 150, 400],
            &[5, -3, 12, 12, -40, 0],
            &[i64::from(u32::MAX), 0, 1],
        ];
        for &values in cases {
            assert_eq!(decode_deltas(&encode_deltas(values)).unwrap(), values);
        }
    }

    #[test]
    fn negative_deltas_round_trip() {
        let values = [10, 2, -8, 300];
        let deltas = encode_deltas(&values);
        assert_eq!(deltas, vec![10, -8, -10, 308]);
        assert_eq!(decode_deltas(&deltas).unwrap(), values);
    }

    #[test]
    fn overflowing_running_sum_is_rejected() {
        let err = decode_deltas(&[i64::MAX, 1]).unwrap_err();
        assert_eq!(err.kind(), SizeFileErrorKind::BadNumber);

        let err = decode_deltas(&[i64::MIN, -1]).unwrap_err();
        assert_eq!(err.kind(), SizeFileErrorKind::BadNumber);
    }
}
