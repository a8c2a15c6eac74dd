//! Turn arithmetic: who speaks, and when to run the end evaluator.
//!
//! Speakers take turns in config order, wrapping around. Evaluation is pointless until everyone has spoken at least twice, and only
//! meaningful at the end of a full rotation. Callers can push the first
//! evaluation further out, or turn it off.

use std::fmt;

/// Why a turn skips evaluation. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// `skip_eval_turns` is negative: never evaluate.
    Disabled,
    /// The turn is within the first `skip_eval_turns` turns.
    Warmup,
    /// Fewer than two full rotations have happened.
    FirstRounds,
    /// Not everyone has spoken in the current rotation yet.
    MidRotation,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Skip::Disabled => "evaluation disabled",
            Skip::Warmup => "within skipped turns",
            Skip::FirstRounds => "turn is too small",
            Skip::MidRotation => "not everyone has spoken yet",
        })
    }
}

/// Index of the speaker who plays `turn` (1-based) among `speakers`
/// participants. `None` for turn 0 or an empty meeting.
pub fn rotation(turn: u32, speakers: usize) -> Option<usize> {
    if speakers == 0 || turn == 0 {
        return None;
    }
    Some((turn as usize - 1) % speakers)
}

/// Decide whether `turn` (1-based) skips evaluation with `speakers`
/// participants. `None` means evaluate.
pub fn should_skip(turn: u32, skip_eval_turns: i32, speakers: usize) -> Option<Skip> {
    if skip_eval_turns < 0 {
        return Some(Skip::Disabled);
    }
    if i64::from(turn) <= i64::from(skip_eval_turns) {
        return Some(Skip::Warmup);
    }
    let turn = u64::from(turn);
    let n = speakers as u64;
    if n == 0 || turn < 2 * n {
        return Some(Skip::FirstRounds);
    }
    if turn % n != 0 {
        return Some(Skip::MidRotation);
    }
    None
}
