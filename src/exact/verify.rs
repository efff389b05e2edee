//! Local-move tests that prove a partial path cannot be extended into an
//! optimal one.
//!
//! Each verifier inspects the placed prefix `path[0..=level]`. Its last vertex
//! stays where it is, since the rest of the path hangs off it. If rearranging
//! the earlier vertices strictly shortens the prefix, the branch is dead.
//! Comparisons carry a small multiplicative tolerance so that floating point
//! noise never prunes an optimal branch.

use crate::weights::Weights;

pub const TOLERANCE: f64 = 1.00005;

pub trait Verifier {
    fn name(&self) -> &str;

    /// True when some local move shortens `path[0..=level]`.
    fn reject(&self, weights: &dyn Weights, path: &[usize], level: usize) -> bool;
}

/// Reversal of an inner subrange: `a b .. c d` becomes `a c .. b d`.
///
/// With a free start, also tries reversing the whole prefix before `d`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseVerifier {
    pub fixed_start: bool,
}

impl Verifier for ReverseVerifier {
    fn name(&self) -> &str {
        "Reverse"
    }

    fn reject(&self, weights: &dyn Weights, path: &[usize], level: usize) -> bool {
        assert!(level < path.len(), "level = {}", level);
        if level < 2 {
            return false;
        }
        let c = path[level - 1];
        let d = path[level];
        let cd = weights.value(c, d);
        if !self.fixed_start && cd > TOLERANCE * weights.value(path[0], d) {
            return true;
        }
        for i in 0..level - 2 {
            let a = path[i];
            let b = path[i + 1];
            let ab = weights.value(a, b);
            if ab + cd > TOLERANCE * (weights.value(a, c) + weights.value(b, d)) {
                return true;
            }
        }
        false
    }
}

/// Swaps the order of the two blocks `path[0..=i]` and `path[i+1..level]`,
/// each in either orientation, ahead of the last vertex.
///
/// Every such move changes the first vertex, so a fixed start disables it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DivideVerifier {
    pub fixed_start: bool,
}

impl Verifier for DivideVerifier {
    fn name(&self) -> &str {
        "Divide"
    }

    fn reject(&self, weights: &dyn Weights, path: &[usize], level: usize) -> bool {
        assert!(level < path.len(), "level = {}", level);
        if self.fixed_start || level < 2 {
            return false;
        }
        let a = path[0];
        let d = path[level - 1];
        let e = path[level];
        let de = weights.value(d, e);
        let ae = weights.value(a, e);
        let ad = weights.value(a, d);
        for i in 0..level - 2 {
            let b = path[i];
            let c = path[i + 1];
            let be = weights.value(b, e);
            let bc = weights.value(b, c);
            let ac = weights.value(a, c);
            let bd = weights.value(b, d);
            let current = (bc + de) / TOLERANCE;
            if current > ac + be || current > ad + be || current > bc + ae || current > bd + ae {
                return true;
            }
        }
        false
    }
}

/// Moves the second to last placed vertex to an earlier gap.
///
/// With a free start, also tries moving it to the front.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveVerifier {
    pub fixed_start: bool,
}

impl Verifier for MoveVerifier {
    fn name(&self) -> &str {
        "Move"
    }

    fn reject(&self, weights: &dyn Weights, path: &[usize], level: usize) -> bool {
        assert!(level < path.len(), "level = {}", level);
        if level < 2 {
            return false;
        }
        let c = path[level - 2];
        let d = path[level - 1];
        let e = path[level];
        let de = weights.value(d, e);
        let ce = weights.value(c, e);
        let cd = weights.value(c, d);
        let mut ad = weights.value(path[0], d);
        let front = ad;
        for i in 0..level - 2 {
            let b = path[i + 1];
            let bd = weights.value(b, d);
            let ab = weights.value(path[i], b);
            if ab + cd + de > TOLERANCE * (ad + bd + ce) {
                return true;
            }
            ad = bd;
        }
        !self.fixed_start && cd + de > TOLERANCE * (front + ce)
    }
}

/// Verifiers in the order branch and bound applies them.
pub fn standard_verifiers(fixed_start: bool) -> Vec<Box<dyn Verifier>> {
    vec![
        Box::new(ReverseVerifier { fixed_start }),
        Box::new(DivideVerifier { fixed_start }),
        Box::new(MoveVerifier { fixed_start }),
    ]
}
