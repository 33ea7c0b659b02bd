use std::fmt;
use std::ops::Index;
use std::ops::Mul;
use std::str::FromStr;

use crate::error::PtolemyError;

/// A bijection of the four vertex labels {0, 1, 2, 3}. The entry at
/// position `i` is the image of `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Permutation([usize; 4]);

impl Default for Permutation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Permutation {
    pub fn identity() -> Self {
        Self([0, 1, 2, 3])
    }

    pub fn new(images: [usize; 4]) -> Result<Self, PtolemyError> {
        let mut seen = [false; 4];
        for &image in images.iter() {
            if image >= 4 || seen[image] {
                return Err(PtolemyError::parse(format!(
                    "{:?} is not a permutation of 0123",
                    images
                )));
            }
            seen[image] = true;
        }
        Ok(Self(images))
    }

    pub fn images(&self) -> [usize; 4] {
        self.0
    }

    pub fn inverse(&self) -> Self {
        let mut inverse = [0; 4];
        for (i, &image) in self.0.iter().enumerate() {
            inverse[image] = i;
        }
        Self(inverse)
    }

    pub fn num_inversions(&self) -> usize {
        count_inversions(&self.0)
    }

    pub fn is_odd(&self) -> bool {
        self.num_inversions() % 2 == 1
    }

    pub fn is_even(&self) -> bool {
        !self.is_odd()
    }

    pub fn sign(&self) -> i32 {
        if self.is_odd() {
            -1
        } else {
            1
        }
    }

    /// Parity of the permutation restricted to the given (increasing)
    /// positions, after relabelling the images to 0..positions.len().
    pub fn restricted_sign(&self, positions: &[usize]) -> i32 {
        let images: Vec<usize> = positions.iter().map(|&i| self.0[i]).collect();
        if count_inversions(&images) % 2 == 1 {
            -1
        } else {
            1
        }
    }

    /// The images of the three vertices other than `omitted`, in order.
    pub fn images_without(&self, omitted: usize) -> [usize; 3] {
        let mut result = [0; 3];
        let mut k = 0;
        for (i, &image) in self.0.iter().enumerate() {
            if i != omitted {
                result[k] = image;
                k += 1;
            }
        }
        result
    }
}

fn count_inversions(images: &[usize]) -> usize {
    let mut count = 0;
    for i in 0..images.len() {
        for j in (i + 1)..images.len() {
            if images[i] > images[j] {
                count += 1;
            }
        }
    }
    count
}

impl Index<usize> for Permutation {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.0[index]
    }
}

/// `(a * b)[i] = a[b[i]]`, i.e. apply `b` first.
impl Mul for Permutation {
    type Output = Permutation;

    fn mul(self, other: Permutation) -> Permutation {
        Permutation([
            self.0[other.0[0]],
            self.0[other.0[1]],
            self.0[other.0[2]],
            self.0[other.0[3]],
        ])
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl FromStr for Permutation {
    type Err = PtolemyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<usize> = s
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .map(|d| d as usize)
                    .ok_or_else(|| PtolemyError::parse(format!("invalid permutation {}", s)))
            })
            .collect::<Result<_, _>>()?;
        if digits.len() != 4 {
            return Err(PtolemyError::parse(format!("invalid permutation {}", s)));
        }
        Self::new([digits[0], digits[1], digits[2], digits[3]])
    }
}

/// All 24 permutations in lexicographic order.
pub fn all_permutations() -> Vec<Permutation> {
    let mut result = vec![];
    for a in 0..4 {
        for b in 0..4 {
            for c in 0..4 {
                for d in 0..4 {
                    if let Ok(p) = Permutation::new([a, b, c, d]) {
                        result.push(p);
                    }
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::all_permutations;
    use super::Permutation;

    fn perm(s: &str) -> Permutation {
        s.parse().unwrap()
    }

    #[test]
    fn parity() {
        assert!(perm("0123").is_even());
        assert!(perm("0132").is_odd());
        assert!(perm("1230").is_odd());
        assert!(perm("1032").is_even());
        assert!(perm("2310").is_odd());
        assert_eq!(perm("0321").sign(), -1);
        assert_eq!(all_permutations().iter().filter(|p| p.is_even()).count(), 12);
    }

    #[test]
    fn composition_applies_right_factor_first() {
        let a = perm("1230");
        let b = perm("0132");
        assert_eq!((a * b).images(), [1, 2, 0, 3]);
    }

    #[test]
    fn restricted_sign() {
        let p = perm("2103");
        assert_eq!(p.restricted_sign(&[0, 1]), -1);
        assert_eq!(p.restricted_sign(&[1, 3]), 1);
        assert_eq!(p.restricted_sign(&[]), 1);
    }

    #[test]
    fn images_without() {
        assert_eq!(perm("3201").images_without(1), [3, 0, 1]);
    }

    #[test]
    fn invalid_permutations_are_rejected() {
        assert!("0112".parse::<Permutation>().is_err());
        assert!("012".parse::<Permutation>().is_err());
        assert!("01a3".parse::<Permutation>().is_err());
    }

    fn arb_permutation() -> impl Strategy<Value = Permutation> {
        (0..24usize).prop_map(|i| all_permutations()[i])
    }

    proptest! {
        #[test]
        fn inverse_composes_to_identity(p in arb_permutation()) {
            prop_assert_eq!(p * p.inverse(), Permutation::identity());
            prop_assert_eq!(p.inverse() * p, Permutation::identity());
        }

        #[test]
        fn sign_is_multiplicative(p in arb_permutation(), q in arb_permutation()) {
            prop_assert_eq!((p * q).sign(), p.sign() * q.sign());
        }

        #[test]
        fn text_form_round_trips(p in arb_permutation()) {
            prop_assert_eq!(p.to_string().parse::<Permutation>().unwrap(), p);
        }
    }
}
