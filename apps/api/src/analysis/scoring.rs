//! Additive confidence model over collected resume signals.

use crate::analysis::signals::SignalSet;
use crate::models::analysis::{MAX_CONFIDENCE, MIN_CONFIDENCE};

const BASE_SCORE: i32 = 48;

/// Computes the 0-100 confidence score, clamped to [45, 98].
///
/// Each signal contributes a fixed bonus or penalty; certifications are a
/// pure bonus and never penalize a resume that lacks them.
pub fn calculate_confidence(signals: &SignalSet) -> i32 {
    let mut score = BASE_SCORE;

    score += signals.detected.iter().map(|s| s.weight).sum::<i32>();
    score += if signals.has_experience { 10 } else { -8 };
    score += if signals.has_projects { 9 } else { -10 };
    score += if signals.has_education { 6 } else { 0 };
    score += if signals.has_summary { 3 } else { 0 };
    score += if signals.has_certifications { 4 } else { 0 };

    score += if signals.quantified_impact_count >= 5 {
        8
    } else if signals.quantified_impact_count >= 2 {
        4
    } else {
        -6
    };

    score += if signals.has_contact() { 4 } else { -5 };

    if signals.word_count < 170 {
        score -= 12;
    } else if signals.word_count < 260 {
        score -= 4;
    } else if signals.word_count > 1200 {
        score -= 8;
    }

    score.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::signals::SignalExtractor;
    use crate::models::analysis::ConfidenceLevel;

    fn score(corpus: &str) -> i32 {
        calculate_confidence(&SignalExtractor::new().collect(corpus))
    }

    #[test]
    fn test_empty_corpus_hits_floor() {
        let confidence = score("");
        assert_eq!(confidence, MIN_CONFIDENCE);
        assert_eq!(
            ConfidenceLevel::from_score(confidence),
            ConfidenceLevel::NeedsImprovement
        );
    }

    #[test]
    fn test_score_never_leaves_bounds() {
        let stacked = "javascript react typescript node python sql mongodb aws docker \
                       kubernetes machine learning tensorflow pytorch git experience \
                       projects education summary certification 10% 20% 30% 40% 50% \
                       a@b.co +1 555 010 7788 "
            .repeat(20);
        assert!(score(&stacked) <= MAX_CONFIDENCE);
        assert!(score("x") >= MIN_CONFIDENCE);
    }

    #[test]
    fn test_certifications_never_lower_the_score() {
        let base = "experience with projects and education. summary at the top. \
                    contact a@b.co +1 555 010 7788. cut costs 20% over 12 months."
            .to_string();
        let without = score(&base);
        let with = score(&format!("{base} certified kubernetes administrator."));
        assert!(with >= without);
    }

    /// Mid-band signal set that keeps scores away from both clamp edges,
    /// so single-signal deltas stay observable.
    fn mid_band_signals() -> SignalSet {
        SignalSet {
            detected: vec![],
            missing: vec![],
            detected_domains: vec![],
            has_projects: true,
            has_experience: true,
            has_education: true,
            has_certifications: false,
            has_summary: true,
            quantified_impact_count: 2,
            has_email: true,
            has_phone: true,
            word_count: 300,
        }
    }

    #[test]
    fn test_missing_contact_penalty() {
        let with_contact = mid_band_signals();
        let mut missing_phone = mid_band_signals();
        missing_phone.has_phone = false;

        assert_eq!(
            calculate_confidence(&with_contact) - calculate_confidence(&missing_phone),
            9
        );
    }

    #[test]
    fn test_impact_tiers() {
        let mut five = mid_band_signals();
        five.quantified_impact_count = 5;
        let two = mid_band_signals();
        let mut none = mid_band_signals();
        none.quantified_impact_count = 0;

        let five_score = calculate_confidence(&five);
        let two_score = calculate_confidence(&two);
        let none_score = calculate_confidence(&none);

        assert_eq!(five_score - two_score, 4);
        assert_eq!(two_score - none_score, 10);
        // More quantified impact never scores lower.
        assert!(five_score >= two_score && two_score >= none_score);
    }

    #[test]
    fn test_word_count_bands() {
        let mut signals = mid_band_signals();
        let in_band = calculate_confidence(&signals);

        signals.word_count = 150;
        assert_eq!(calculate_confidence(&signals), in_band - 12);
        signals.word_count = 200;
        assert_eq!(calculate_confidence(&signals), in_band - 4);
        signals.word_count = 1500;
        assert_eq!(calculate_confidence(&signals), in_band - 8);
    }
}
