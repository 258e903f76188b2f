//! Hardware trigger codes.
//!
//! Each stimulus onset is announced to the EEG amplifier with a code in
//! 0..=63 that packs the crossed condition into named bit positions,
//! most significant first: training, test (the complement of training),
//! for-T2, T2-present, dual-task, long-SOA. Test-phase stimulus codes
//! occupy 16..=31, training codes 32..=47. The analysis side decodes
//! recorded integer events against the same mapping.

use std::ops::RangeInclusive;

const BIT_TRAINING: u8 = 5;
const BIT_TEST: u8 = 4;
const BIT_FOR_T2: u8 = 3;
const BIT_T2_PRESENT: u8 = 2;
const BIT_DUAL_TASK: u8 = 1;
const BIT_LONG_SOA: u8 = 0;

/// Prompt codes: identity choice and visibility rating, test phase
pub const TASK_IDENTITY: u8 = 1;
pub const TASK_VISIBILITY: u8 = 2;
/// Prompt codes for the training phase
pub const TASK_IDENTITY_TRAINING: u8 = 11;
pub const TASK_VISIBILITY_TRAINING: u8 = 12;

/// Stimulus trigger code for one fully crossed condition.
pub fn code(training: bool, for_t2: bool, t2_present: bool, dual_task: bool, long_soa: bool) -> u8 {
    (training as u8) << BIT_TRAINING
        | (!training as u8) << BIT_TEST
        | (for_t2 as u8) << BIT_FOR_T2
        | (t2_present as u8) << BIT_T2_PRESENT
        | (dual_task as u8) << BIT_DUAL_TASK
        | (long_soa as u8) << BIT_LONG_SOA
}

/// Prompt code for the identity-choice task
pub fn identity_code(training: bool) -> u8 {
    if training { TASK_IDENTITY_TRAINING } else { TASK_IDENTITY }
}

/// Prompt code for the visibility-rating task
pub fn visibility_code(training: bool) -> u8 {
    if training { TASK_VISIBILITY_TRAINING } else { TASK_VISIBILITY }
}

/// The condition tuple a stimulus trigger code stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub training: bool,
    pub for_t2: bool,
    pub t2_present: bool,
    pub dual_task: bool,
    pub long_soa: bool,
}

impl Condition {
    pub fn code(&self) -> u8 {
        code(
            self.training,
            self.for_t2,
            self.t2_present,
            self.dual_task,
            self.long_soa,
        )
    }
}

/// Decode a recorded event code back into its condition.
///
/// Returns `None` for codes outside the stimulus ranges; in particular
/// the training and test bits must be complements of each other.
pub fn decode(raw: u8) -> Option<Condition> {
    if raw > 0b11_1111 {
        return None;
    }
    let bit = |n: u8| raw & (1 << n) != 0;
    if bit(BIT_TRAINING) == bit(BIT_TEST) {
        return None;
    }
    Some(Condition {
        training: bit(BIT_TRAINING),
        for_t2: bit(BIT_FOR_T2),
        t2_present: bit(BIT_T2_PRESENT),
        dual_task: bit(BIT_DUAL_TASK),
        long_soa: bit(BIT_LONG_SOA),
    })
}

/// Code ranges of T2 onsets, test and training phase. Epoch extraction
/// keeps exactly these so that events align one-to-one with trials.
pub fn t2_code_ranges() -> [RangeInclusive<u8>; 2] {
    [
        code(false, true, false, false, false)..=code(false, true, true, true, true),
        code(true, true, false, false, false)..=code(true, true, true, true, true),
    ]
}

pub fn is_t2_code(raw: u8) -> bool {
    t2_code_ranges().iter().any(|r| r.contains(&raw))
}

/// Overview of the full stimulus code space, for log output.
pub fn trigger_table() -> Vec<(String, u8)> {
    let mut rows = Vec::with_capacity(32);
    for training in [false, true] {
        for for_t2 in [false, true] {
            for t2_present in [false, true] {
                for dual_task in [false, true] {
                    for long_soa in [false, true] {
                        let name = format!(
                            "{}_{}_{}Task_{}SOA{}",
                            if for_t2 { "t2" } else { "t1" },
                            if t2_present { "present" } else { "absent" },
                            if dual_task { "dual" } else { "single" },
                            if long_soa { "long" } else { "short" },
                            if training { "_training" } else { "" },
                        );
                        rows.push((name, code(training, for_t2, t2_present, dual_task, long_soa)));
                    }
                }
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_code_values() {
        // t2, present, dual task: 30 for the short SOA, 31 for the long
        assert_eq!(code(false, true, true, true, false), 30);
        assert_eq!(code(false, true, true, true, true), 31);
        // t1 counterparts sit 8 below
        assert_eq!(code(false, false, true, true, false), 22);
        // first test-phase code
        assert_eq!(code(false, false, false, false, false), 16);
        // training variant of t2/absent/single/long
        assert_eq!(code(true, true, false, false, true), 41);
    }

    #[test]
    fn training_codes_offset_by_16() {
        for for_t2 in [false, true] {
            for t2_present in [false, true] {
                for dual_task in [false, true] {
                    for long_soa in [false, true] {
                        let test = code(false, for_t2, t2_present, dual_task, long_soa);
                        let train = code(true, for_t2, t2_present, dual_task, long_soa);
                        assert_eq!(train, test + 16);
                    }
                }
            }
        }
    }

    #[test]
    fn decode_roundtrip() {
        for (_, raw) in trigger_table() {
            let cond = decode(raw).expect("stimulus codes must decode");
            assert_eq!(cond.code(), raw);
        }
    }

    #[test]
    fn decode_rejects_non_stimulus_codes() {
        assert_eq!(decode(0), None);
        assert_eq!(decode(TASK_IDENTITY), None);
        assert_eq!(decode(TASK_VISIBILITY_TRAINING), None);
        // training and test bit both set
        assert_eq!(decode(0b11_0000), None);
        assert_eq!(decode(64), None);
    }

    #[test]
    fn t2_ranges_cover_exactly_the_for_t2_codes() {
        for raw in 0..=255u8 {
            let expected = decode(raw).is_some_and(|c| c.for_t2);
            assert_eq!(is_t2_code(raw), expected, "code {raw}");
        }
    }

    #[test]
    fn table_is_collision_free() {
        let mut codes: Vec<u8> = trigger_table().into_iter().map(|(_, c)| c).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 32);
    }
}
