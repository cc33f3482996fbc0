use syllo_core::{Conclusion, ConfusionCounts, Statistics};

use crate::error::ScoringError;

/// Reduces answered conclusions to a performance summary.
///
/// Unanswered conclusions count towards the total shown to the participant
/// but not towards any statistic.
pub fn score<'a, A: 'a>(
    conclusions: impl IntoIterator<Item = &'a Conclusion<A>>,
) -> Result<Statistics, ScoringError> {
    let mut counts = ConfusionCounts::default();
    let mut responses = Vec::new();
    let mut reaction_times = Vec::new();
    let mut total = 0;

    for conclusion in conclusions {
        total += 1;
        let Some(response) = conclusion.response() else {
            continue;
        };
        match (response.user_input, conclusion.label) {
            (true, true) => counts.true_positive += 1,
            (true, false) => counts.false_positive += 1,
            (false, false) => counts.true_negative += 1,
            (false, true) => counts.false_negative += 1,
        }
        responses.push(u8::from(response.user_input));
        reaction_times.push(response.reaction_time);
    }

    if reaction_times.is_empty() {
        return Err(ScoringError::NoResponses);
    }

    let n = reaction_times.len() as f64;
    let mean = reaction_times.iter().sum::<f64>() / n;
    let variance = reaction_times.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;

    Ok(Statistics {
        hit_rate: counts.hit_rate(),
        false_alarm_rate: counts.false_alarm_rate(),
        counts,
        responses,
        mean_reaction_time: round2(mean),
        std_reaction_time: round2(variance.sqrt()),
        total,
    })
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use syllo_core::Judgment;

    const SECOND: u64 = 1_000_000_000;

    fn answered(label: bool, judged_valid: bool, rt_secs: f64) -> Conclusion<()> {
        let mut c = Conclusion::new((), label);
        c.mark_displayed(SECOND);
        let judgment = if judged_valid {
            Judgment::Valid
        } else {
            Judgment::Invalid
        };
        c.answer(judgment, SECOND + (rt_secs * 1e9) as u64);
        c
    }

    #[test]
    fn confusion_counts_and_rates() {
        let cs = vec![
            answered(true, true, 1.0),
            answered(false, true, 1.0),
            answered(true, true, 1.0),
        ];
        let stats = score(&cs).unwrap();
        assert_eq!(stats.counts.true_positive, 2);
        assert_eq!(stats.counts.false_positive, 1);
        assert_eq!(stats.counts.true_negative, 0);
        assert_eq!(stats.counts.false_negative, 0);
        assert_eq!(stats.hit_rate, Some(1.0));
        assert_eq!(stats.false_alarm_rate, Some(1.0));
        assert_eq!(stats.responses, vec![1, 1, 1]);
    }

    #[test]
    fn reaction_time_uses_population_std() {
        let cs = vec![
            answered(true, true, 1.0),
            answered(true, false, 2.0),
            answered(false, false, 3.0),
        ];
        let stats = score(&cs).unwrap();
        assert_eq!(stats.mean_reaction_time, 2.0);
        assert_eq!(stats.std_reaction_time, 0.82);
        assert_eq!(stats.responses, vec![1, 0, 0]);
        assert_eq!(stats.counts.false_negative, 1);
        assert_eq!(stats.counts.true_negative, 1);
    }

    #[test]
    fn zero_denominators_are_none() {
        let cs = vec![answered(false, false, 0.5), answered(false, true, 0.5)];
        let stats = score(&cs).unwrap();
        assert_eq!(stats.hit_rate, None);
        assert_eq!(stats.false_alarm_rate, Some(0.5));
    }

    #[test]
    fn rates_stay_in_unit_interval() {
        let cs = vec![
            answered(true, false, 0.3),
            answered(true, true, 0.4),
            answered(false, false, 0.6),
            answered(false, true, 0.7),
        ];
        let stats = score(&cs).unwrap();
        for rate in [stats.hit_rate, stats.false_alarm_rate] {
            let r = rate.unwrap();
            assert!((0.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn scoring_is_idempotent() {
        let cs = vec![answered(true, true, 1.25), answered(false, true, 0.75)];
        assert_eq!(score(&cs).unwrap(), score(&cs).unwrap());
    }

    #[test]
    fn nothing_answered_is_an_error() {
        let cs = vec![Conclusion::new((), true)];
        assert_eq!(score(&cs), Err(ScoringError::NoResponses));
        assert_eq!(score(Vec::<&Conclusion<()>>::new()), Err(ScoringError::NoResponses));
    }

    #[test]
    fn summary_counts_correct_out_of_total() {
        let cs = vec![
            answered(true, true, 1.0),
            answered(false, true, 2.0),
            Conclusion::new((), true),
        ];
        let stats = score(&cs).unwrap();
        let [first, second] = stats.summary_lines();
        assert_eq!(first, "You answered 1 of 3 conclusions correctly");
        assert_eq!(second, "with an average reaction time of 1.50s.");
    }
}
