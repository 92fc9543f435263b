//! Trial arithmetic for paced serial addition.

/// Two consecutive stimuli forming one trial. The expected answer is the
/// sum of both values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    pub previous: u32,
    pub current: u32,
}

impl Trial {
    pub fn new(previous: u32, current: u32) -> Self {
        Self { previous, current }
    }

    /// The only correct answer for this trial.
    pub fn sum(self) -> u32 {
        self.previous + self.current
    }

    pub fn matches(self, answer: u32) -> bool {
        answer == self.sum()
    }
}

/// Every sum a stimulus alphabet can produce, sorted and deduplicated.
/// Front ends use this to lay out their answer input (for the default
/// digits 1 through 9 this is 2 through 18).
pub fn answer_domain(alphabet: &[u32]) -> Vec<u32> {
    let mut sums: Vec<u32> = alphabet
        .iter()
        .flat_map(|a| alphabet.iter().map(move |b| a + b))
        .collect();
    sums.sort_unstable();
    sums.dedup();
    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sum_and_match() {
        let trial = Trial::new(7, 5);
        assert_eq!(trial.sum(), 12);
        assert!(trial.matches(12));
        assert!(!trial.matches(11));
        assert!(!trial.matches(0));
    }

    #[test]
    fn default_digit_domain_is_two_to_eighteen() {
        let alphabet: Vec<u32> = (1..=9).collect();
        let domain = answer_domain(&alphabet);
        assert_eq!(domain, (2..=18).collect::<Vec<u32>>());
    }

    #[test]
    fn sparse_alphabet_domain() {
        let domain = answer_domain(&[1, 5]);
        assert_eq!(domain, vec![2, 6, 10]);
    }

    #[test]
    fn empty_alphabet_has_empty_domain() {
        assert!(answer_domain(&[]).is_empty());
    }
}
