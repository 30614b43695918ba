use crate::domain::AoiLabel;

/// Repairs single-sample dropouts.
///
/// An Invalid sample whose neighbours are both valid takes the label of the sample
/// before it, or of the sample after it when it opens the trial. Runs of two or
/// more Invalid samples are kept.
pub struct GapFiller;

impl GapFiller {
    /// Returns the filled label column. `raw` is left untouched.
    pub fn fill(raw: &[AoiLabel]) -> Vec<AoiLabel> {
        let mut filled = raw.to_vec();

        for (i, &label) in raw.iter().enumerate() {
            if label != AoiLabel::Invalid {
                continue;
            }

            let prev = i.checked_sub(1).map(|p| raw[p]);
            let next = raw.get(i + 1).copied();

            let isolated = prev != Some(AoiLabel::Invalid) && next != Some(AoiLabel::Invalid);
            if !isolated {
                continue;
            }

            if let Some(replacement) = prev.or(next) {
                filled[i] = replacement;
            }
        }

        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AoiLabel::*;

    #[test]
    fn test_single_dropout_takes_previous_label() {
        let filled = GapFiller::fill(&[Left, Left, Invalid, Left, Left]);
        assert_eq!(filled, vec![Left, Left, Left, Left, Left]);

        let filled = GapFiller::fill(&[Neither, Invalid, Right]);
        assert_eq!(filled, vec![Neither, Neither, Right]);
    }

    #[test]
    fn test_double_dropout_is_kept() {
        let raw = [Left, Invalid, Invalid, Left];
        assert_eq!(GapFiller::fill(&raw), raw.to_vec());
    }

    #[test]
    fn test_leading_dropout_takes_following_label() {
        let filled = GapFiller::fill(&[Invalid, Right, Right]);
        assert_eq!(filled, vec![Right, Right, Right]);
    }

    #[test]
    fn test_trailing_dropout_takes_previous_label() {
        let filled = GapFiller::fill(&[Right, Left, Invalid]);
        assert_eq!(filled, vec![Right, Left, Left]);
    }

    #[test]
    fn test_lone_invalid_sample_stays_invalid() {
        assert_eq!(GapFiller::fill(&[Invalid]), vec![Invalid]);
        assert!(GapFiller::fill(&[]).is_empty());
    }

    #[test]
    fn test_mixed_runs() {
        let raw = [Invalid, Left, Invalid, Invalid, Right, Invalid, Neither];
        let filled = GapFiller::fill(&raw);
        assert_eq!(
            filled,
            vec![Left, Left, Invalid, Invalid, Right, Right, Neither]
        );
    }
}
