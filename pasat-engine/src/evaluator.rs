//! Pure answer classification, kept apart from scheduling so it can be
//! tested without a runtime.

use pasat_core::Trial;

/// What became of a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Right,
    Wrong,
    /// No open trial, or the open trial was already answered. Ignored
    /// answers leave no trace anywhere.
    Ignored,
}

/// Classifies `answer` against the open trial, if any. `already_answered`
/// is whether an earlier answer was accepted for this same trial.
pub fn evaluate(trial: Option<Trial>, already_answered: bool, answer: u32) -> Evaluation {
    let Some(trial) = trial else {
        return Evaluation::Ignored;
    };
    if already_answered {
        return Evaluation::Ignored;
    }
    if trial.matches(answer) {
        Evaluation::Right
    } else {
        Evaluation::Wrong
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn correct_sum_is_right() {
        assert_eq!(evaluate(Some(Trial::new(4, 9)), false, 13), Evaluation::Right);
    }

    #[test]
    fn incorrect_sum_is_wrong() {
        assert_eq!(evaluate(Some(Trial::new(4, 9)), false, 12), Evaluation::Wrong);
        assert_eq!(evaluate(Some(Trial::new(4, 9)), false, 0), Evaluation::Wrong);
    }

    #[test]
    fn no_open_trial_is_ignored() {
        assert_eq!(evaluate(None, false, 13), Evaluation::Ignored);
    }

    #[test]
    fn second_answer_to_same_trial_is_ignored() {
        assert_eq!(evaluate(Some(Trial::new(4, 9)), true, 13), Evaluation::Ignored);
    }
}
