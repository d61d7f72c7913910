//! Display helpers for parsed reports
//!
//! - [`AdReport::to_plain_text`] - the "copy report" clipboard text
//! - [`SectionReport::score_percent`] and [`ScoreBand`] - score bar values
//!
//! Scores are model output and are never validated. Helpers that need a
//! number return `None` (or the lowest band) for scores they cannot read.

use serde::{Deserialize, Serialize};

use crate::types::{AdReport, SectionReport};

/// Maximum score the prompt asks the model for
pub const SCORE_SCALE: f64 = 50.0;

/// Title line of the plain-text report
pub const REPORT_TITLE: &str = "Ad Performance Analysis Report";

/// Color band for a score bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// 80% and above
    Excellent,
    /// 60% and above
    Good,
    /// 40% and above
    Fair,
    /// Below 40%, or unreadable
    Poor,
}

impl ScoreBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            ScoreBand::Excellent
        } else if percent >= 60.0 {
            ScoreBand::Good
        } else if percent >= 40.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }
}

impl SectionReport {
    /// Leading integer of the score text, e.g. `45` for `"45/50"`
    pub fn score_value(&self) -> Option<i64> {
        let head = self.score.split('/').next().unwrap_or_default().trim_start();
        let (sign, digits) = match head.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, head.strip_prefix('+').unwrap_or(head)),
        };

        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        digits[..end].parse::<i64>().ok().map(|value| sign * value)
    }

    /// Score as a percentage of [`SCORE_SCALE`]; not clamped
    pub fn score_percent(&self) -> Option<f64> {
        self.score_value()
            .map(|value| value as f64 / SCORE_SCALE * 100.0)
    }

    /// Score bar width in percent, clamped to `0..=100`
    pub fn bar_width(&self) -> f64 {
        self.score_percent()
            .map(|percent| percent.clamp(0.0, 100.0))
            .unwrap_or(0.0)
    }

    pub fn score_band(&self) -> ScoreBand {
        self.score_percent()
            .map(ScoreBand::from_percent)
            .unwrap_or(ScoreBand::Poor)
    }
}

impl AdReport {
    /// Flatten the report into the plain text used by "copy report"
    ///
    /// One block per present field, in report order, separated by a blank
    /// line. List items are joined with `,`.
    pub fn to_plain_text(&self) -> String {
        let mut blocks: Vec<String> = self
            .sections()
            .map(|(section, report)| {
                let mut block = format!(
                    "{}\nScore: {}\n",
                    section.tag().to_uppercase(),
                    report.score
                );
                block.push_str(&format!("What Works: {}\n", report.what_works.join(",")));
                if let Some(improvements) = &report.what_needs_improvement {
                    block.push_str(&format!("Needs Improvement: {}\n", improvements.join(",")));
                }
                block
            })
            .collect();

        if let Some(summary) = &self.summary {
            blocks.push(format!("Summary: {}", summary));
        }

        format!("{}\n\n{}", REPORT_TITLE, blocks.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(score: &str) -> SectionReport {
        SectionReport {
            score: score.to_string(),
            what_works: vec![],
            what_needs_improvement: None,
        }
    }

    #[test]
    fn test_score_value_reads_leading_integer() {
        assert_eq!(section("45/50").score_value(), Some(45));
        assert_eq!(section(" 7 / 50").score_value(), Some(7));
        assert_eq!(section("42abc/50").score_value(), Some(42));
        assert_eq!(section("-3/50").score_value(), Some(-3));
        assert_eq!(section("abc").score_value(), None);
        assert_eq!(section("").score_value(), None);
        assert_eq!(section("/50").score_value(), None);
    }

    #[test]
    fn test_score_percent_is_not_clamped() {
        assert_eq!(section("45/50").score_percent(), Some(90.0));
        assert_eq!(section("71/50").score_percent(), Some(142.0));
        assert_eq!(section("abc").score_percent(), None);
    }

    #[test]
    fn test_bar_width_is_clamped() {
        assert_eq!(section("71/50").bar_width(), 100.0);
        assert_eq!(section("-3/50").bar_width(), 0.0);
        assert_eq!(section("25/50").bar_width(), 50.0);
        assert_eq!(section("n/a").bar_width(), 0.0);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(section("45/50").score_band(), ScoreBand::Excellent);
        assert_eq!(section("40/50").score_band(), ScoreBand::Excellent);
        assert_eq!(section("30/50").score_band(), ScoreBand::Good);
        assert_eq!(section("20/50").score_band(), ScoreBand::Fair);
        assert_eq!(section("19/50").score_band(), ScoreBand::Poor);
        assert_eq!(section("abc").score_band(), ScoreBand::Poor);
    }

    #[test]
    fn test_plain_text_report() {
        let report = AdReport {
            hook: Some(SectionReport {
                score: "45/50".to_string(),
                what_works: vec!["- Mystery".to_string(), "- Emotion".to_string()],
                what_needs_improvement: Some(vec!["- Be specific".to_string()]),
            }),
            visuals: Some(SectionReport {
                score: "48/50".to_string(),
                what_works: vec!["- Layout".to_string()],
                what_needs_improvement: None,
            }),
            summary: Some("Strong ad.".to_string()),
            ..Default::default()
        };

        assert_eq!(
            report.to_plain_text(),
            "Ad Performance Analysis Report\n\n\
             HOOK\nScore: 45/50\nWhat Works: - Mystery,- Emotion\nNeeds Improvement: - Be specific\n\
             \n\n\
             VISUALS\nScore: 48/50\nWhat Works: - Layout\n\
             \n\n\
             Summary: Strong ad."
        );
    }

    #[test]
    fn test_plain_text_of_empty_report_is_title_only() {
        assert_eq!(
            AdReport::default().to_plain_text(),
            "Ad Performance Analysis Report\n\n"
        );
    }
}
