//! Transmission assembly: preambles, syncs, payload, and gaps.
//!
//! A Somfy RTS transmission is the same Manchester-encoded frame sent
//! `repeats` times. Frame `r` looks like:
//!
//! ```text
//! r == 0 : +9415 -89565 (+2416 -2416) x2   +4550 -604  <112 data>  [-30415]
//! r  > 0 :              (+2416 -2416) x7   +4550 -604  <112 data>  [-30415]
//! ```
//!
//! The inter-frame gap follows every frame except the last. The resulting
//! [`PulseSequence`] is the literal signal handed to the radio transport:
//! magnitude is a duration in microseconds, sign is carrier polarity.

use crate::consts::{
    FIRST_FRAME_HW_SYNCS, HW_SYNC_HIGH_US, HW_SYNC_LOW_US, INTER_FRAME_GAP_US, MANCHESTER_LEN,
    MAX_REPEATS, RAW_RECORD_LEN, REPEAT_FRAME_HW_SYNCS, SW_SYNC_HIGH_US, SW_SYNC_LOW_US,
    WAKEUP_HIGH_US, WAKEUP_LOW_US,
};
use crate::error::{Error, ValidationError};

#[cfg(not(feature = "std"))]
use crate::consts::MAX_PULSES;

/// Signed microsecond durations; positive = carrier on, negative = carrier off.
#[cfg(not(feature = "std"))]
pub type PulseSequence = heapless::Vec<i32, MAX_PULSES>;

/// Signed microsecond durations; positive = carrier on, negative = carrier off.
#[cfg(feature = "std")]
pub type PulseSequence = Vec<i32>;

/// Assembles the full pulse sequence for `repeats` copies of a Manchester block.
///
/// # Errors
/// [`ValidationError::RepeatsOutOfRange`] unless `1 <= repeats <= MAX_REPEATS`.
/// A zero repeat count would yield an empty, silent transmission.
pub fn compose(manchester: &[i32; MANCHESTER_LEN], repeats: u8) -> Result<PulseSequence, Error> {
    if repeats == 0 || repeats > MAX_REPEATS {
        return Err(ValidationError::RepeatsOutOfRange(repeats).into());
    }

    // Capacity is sized for MAX_REPEATS, so the heapless pushes below cannot fail.
    let mut seq = PulseSequence::new();
    for r in 0..repeats {
        let hw_syncs = if r == 0 {
            let _ = seq.extend_from_slice(&[WAKEUP_HIGH_US, -WAKEUP_LOW_US]);
            FIRST_FRAME_HW_SYNCS
        } else {
            REPEAT_FRAME_HW_SYNCS
        };
        for _ in 0..hw_syncs {
            let _ = seq.extend_from_slice(&[HW_SYNC_HIGH_US, -HW_SYNC_LOW_US]);
        }

        let _ = seq.extend_from_slice(&[SW_SYNC_HIGH_US, -SW_SYNC_LOW_US]);
        let _ = seq.extend_from_slice(manchester);

        if r + 1 < repeats {
            let _ = seq.push(-INTER_FRAME_GAP_US);
        }
    }
    Ok(seq)
}

/// Merges adjacent durations of the same polarity.
///
/// The signal on air is unchanged, but the result strictly alternates
/// between carrier on and off, which level/duration radio drivers expect.
/// Zero durations are dropped.
pub fn consolidate(pulses: &[i32]) -> PulseSequence {
    let mut out = PulseSequence::new();
    for &d in pulses.iter().filter(|d| **d != 0) {
        if let Some(last) = out.last_mut() {
            if (*last > 0) == (d > 0) {
                *last += d;
                continue;
            }
        }
        let _ = out.push(d);
    }
    out
}

/// Splits a sequence into the fixed-size records of a raw dump.
pub fn raw_records(pulses: &[i32]) -> core::slice::Chunks<'_, i32> {
    pulses.chunks(RAW_RECORD_LEN)
}

/// Total airtime of a sequence, in microseconds.
pub fn sequence_duration_us(pulses: &[i32]) -> u64 {
    pulses.iter().map(|d| u64::from(d.unsigned_abs())).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_PULSES;
    use crate::encoding::encode_manchester;

    fn payload() -> [i32; MANCHESTER_LEN] {
        encode_manchester(&[0xA0, 0x8E, 0x8E, 0x8F, 0x9D, 0xA9, 0xFF])
    }

    #[test]
    fn test_single_frame_layout() {
        let seq = compose(&payload(), 1).unwrap();
        assert_eq!(seq.len(), 2 + 4 + 2 + MANCHESTER_LEN);
        assert_eq!(&seq[..8], &[9415, -89565, 2416, -2416, 2416, -2416, 4550, -604]);
        assert_eq!(&seq[8..], &payload()[..]);
    }

    #[test]
    fn test_default_repeats_length() {
        let seq = compose(&payload(), 4).unwrap();
        // 120 + 3 * 128 frame pulses, 3 gaps
        assert_eq!(seq.len(), 507);
        assert_eq!(seq.iter().filter(|d| **d == -INTER_FRAME_GAP_US).count(), 3);
    }

    #[test]
    fn test_every_repeat_block_is_exact() {
        let repeats = 4;
        let seq = compose(&payload(), repeats).unwrap();
        let mut rest = &seq[..];

        for r in 0..repeats {
            let mut expected: heapless::Vec<i32, 20> = heapless::Vec::new();
            let syncs = if r == 0 {
                let _ = expected.extend_from_slice(&[9415, -89565]);
                2
            } else {
                7
            };
            for _ in 0..syncs {
                let _ = expected.extend_from_slice(&[2416, -2416]);
            }
            let _ = expected.extend_from_slice(&[4550, -604]);

            let (preamble, tail) = rest.split_at(expected.len());
            assert_eq!(preamble, &expected[..], "preamble of frame {}", r);
            let (data, tail) = tail.split_at(MANCHESTER_LEN);
            assert_eq!(data, &payload()[..], "payload of frame {}", r);

            rest = if r + 1 < repeats {
                // gap sits between this frame and the next preamble
                assert_eq!(tail[0], -30415, "gap after frame {}", r);
                assert_eq!(tail[1], 2416);
                &tail[1..]
            } else {
                tail
            };
        }
        assert!(rest.is_empty());
    }

    #[test]
    fn test_max_repeats_fit() {
        let seq = compose(&payload(), MAX_REPEATS).unwrap();
        assert_eq!(seq.len(), MAX_PULSES);
    }

    #[test]
    fn test_repeats_out_of_range() {
        assert_eq!(
            compose(&payload(), 0),
            Err(Error::Validation(ValidationError::RepeatsOutOfRange(0)))
        );
        assert!(compose(&payload(), MAX_REPEATS + 1).is_err());
    }

    #[test]
    fn test_consolidation_merges_adjacent_levels() {
        let seq = compose(&payload(), 2).unwrap();
        let merged = consolidate(&seq);
        for window in merged.windows(2) {
            assert_ne!(window[0] > 0, window[1] > 0);
        }
        assert_eq!(sequence_duration_us(&merged), sequence_duration_us(&seq));
    }

    #[test]
    fn test_consolidate_small() {
        assert_eq!(&consolidate(&[4550, -604, -604, 604, 0, 604])[..], &[4550, -1208, 1208]);
    }

    #[test]
    fn test_raw_records() {
        let seq = compose(&payload(), 4).unwrap();
        assert_eq!(raw_records(&seq).count(), 1);
        assert_eq!(raw_records(&seq).next().map(<[i32]>::len), Some(507));

        let long = compose(&payload(), MAX_REPEATS).unwrap();
        let got: heapless::Vec<usize, 4> = raw_records(&long).map(<[i32]>::len).collect();
        assert_eq!(&got[..], &[RAW_RECORD_LEN, MAX_PULSES - RAW_RECORD_LEN]);
    }
}
