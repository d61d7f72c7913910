//! Tagged-report parser
//!
//! Turns the model's reply into an [`AdReport`]. The expected shape is:
//!
//! ```text
//! <hook>
//!   <score>##/50</score>
//!   <what_works>...</what_works>
//!   <what_needs_improvement>...</what_needs_improvement>
//! </hook>
//! <script>...</script>      same fields as hook
//! <visuals>...</visuals>    score and what_works only
//! <captions>...</captions>  same fields as hook
//! <summary>...</summary>
//! ```
//!
//! Each block is matched independently with the rules in
//! [`crate::grammar`]. A block that does not match is omitted; nothing here
//! can fail.

use lazy_static::lazy_static;

use crate::grammar::{Span, TagPattern};
use crate::types::{AdReport, Section, SectionReport};

lazy_static! {
    /// Section patterns, indexed in `Section::ALL` order
    static ref SECTIONS: Vec<TagPattern> = Section::ALL.into_iter().map(section_pattern).collect();
    static ref SUMMARY: TagPattern = TagPattern::new()
        .tag("<summary>")
        .capture(Span::Any)
        .tag("</summary>");
}

fn section_pattern(section: Section) -> TagPattern {
    let pattern = TagPattern::new()
        .tag(format!("<{}>", section.tag()))
        .skip()
        .tag("<score>")
        .capture(Span::Line)
        .tag("</score>")
        .skip()
        .tag("<what_works>")
        .capture(Span::Any)
        .tag("</what_works>");

    let pattern = if section.has_improvement_list() {
        pattern
            .skip()
            .tag("<what_needs_improvement>")
            .capture(Span::Any)
            .tag("</what_needs_improvement>")
    } else {
        pattern
    };

    pattern.skip().tag(format!("</{}>", section.tag()))
}

fn pattern_for(section: Section) -> &'static TagPattern {
    &SECTIONS[section as usize]
}

/// Parse a model reply into a report
///
/// Total and deterministic: empty or garbage input gives an empty report.
pub fn parse_ad_report(text: &str) -> AdReport {
    AdReport {
        hook: parse_section(text, Section::Hook),
        script: parse_section(text, Section::Script),
        visuals: parse_section(text, Section::Visuals),
        captions: parse_section(text, Section::Captions),
        summary: SUMMARY
            .find(text)
            .and_then(|captures| captures.first().map(|s| trim_text(s).to_string())),
    }
}

/// Parse one section block, or `None` if its grammar does not match
pub fn parse_section(text: &str, section: Section) -> Option<SectionReport> {
    let captures = pattern_for(section).find(text)?;

    match captures.as_slice() {
        [score, works, improvement] => Some(SectionReport {
            score: trim_text(score).to_string(),
            what_works: split_items(works),
            what_needs_improvement: Some(split_items(improvement)),
        }),
        [score, works] => Some(SectionReport {
            score: trim_text(score).to_string(),
            what_works: split_items(works),
            what_needs_improvement: None,
        }),
        _ => None,
    }
}

/// Split a list block into trimmed, non-empty lines
pub fn split_items(block: &str) -> Vec<String> {
    trim_text(block)
        .split('\n')
        .map(trim_text)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim the same characters as ECMAScript `String.prototype.trim`
///
/// Unlike `str::trim` this strips U+FEFF (byte order mark) and keeps U+0085.
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const FULL_REPORT: &str = r#"<ad_report>
  <hook>
    <score>45/50</score>
    <what_works>
- Compelling headline creates mystery
- Promises a remarkable discovery
    </what_works>
    <what_needs_improvement>
- Could tease the discovery more specifically
    </what_needs_improvement>
  </hook>
  <script>
    <score>42/50</score>
    <what_works>
- Clear storytelling progression
    </what_works>
    <what_needs_improvement>
- Needs more concrete details
- Missing a call to action
    </what_needs_improvement>
  </script>
  <visuals>
    <score>48/50</score>
    <what_works>
- Powerful dual image layout
- Branding clearly visible
    </what_works>
  </visuals>
  <captions>
    <score>43/50</score>
    <what_works>
- Clear hierarchical text structure
    </what_works>
    <what_needs_improvement>
- Missing date context
    </what_needs_improvement>
  </captions>
  <summary>
    Strong news advertisement that uses mystery to draw readers in.
  </summary>
</ad_report>"#;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_input_yields_empty_report() {
        let report = parse_ad_report("");
        assert_eq!(report, AdReport::default());
        assert!(report.is_empty());
    }

    #[test]
    fn test_garbage_input_yields_empty_report() {
        let report = parse_ad_report("I'm sorry, I can't analyze this image. <hook> </visuals>");
        assert!(report.is_empty());
    }

    #[test]
    fn test_full_report_populates_every_field() {
        let report = parse_ad_report(FULL_REPORT);

        assert_eq!(
            report.hook,
            Some(SectionReport {
                score: "45/50".to_string(),
                what_works: strings(&[
                    "- Compelling headline creates mystery",
                    "- Promises a remarkable discovery",
                ]),
                what_needs_improvement: Some(strings(&[
                    "- Could tease the discovery more specifically"
                ])),
            })
        );
        assert_eq!(
            report.script,
            Some(SectionReport {
                score: "42/50".to_string(),
                what_works: strings(&["- Clear storytelling progression"]),
                what_needs_improvement: Some(strings(&[
                    "- Needs more concrete details",
                    "- Missing a call to action",
                ])),
            })
        );
        assert_eq!(
            report.visuals,
            Some(SectionReport {
                score: "48/50".to_string(),
                what_works: strings(&[
                    "- Powerful dual image layout",
                    "- Branding clearly visible",
                ]),
                what_needs_improvement: None,
            })
        );
        assert_eq!(
            report.captions,
            Some(SectionReport {
                score: "43/50".to_string(),
                what_works: strings(&["- Clear hierarchical text structure"]),
                what_needs_improvement: Some(strings(&["- Missing date context"])),
            })
        );
        assert_eq!(
            report.summary.as_deref(),
            Some("Strong news advertisement that uses mystery to draw readers in.")
        );
    }

    #[test]
    fn test_visuals_never_captures_improvement_list() {
        let text = "<visuals>
            <score>30/50</score>
            <what_works>- Bold colors</what_works>
            <what_needs_improvement>- Too busy</what_needs_improvement>
        </visuals>";

        let visuals = parse_ad_report(text).visuals.expect("visuals should parse");
        assert_eq!(visuals.score, "30/50");
        assert_eq!(visuals.what_works, strings(&["- Bold colors"]));
        assert_eq!(visuals.what_needs_improvement, None);
    }

    #[test]
    fn test_unclosed_improvement_list_drops_whole_hook() {
        let text = "<hook>
            <score>45/50</score>
            <what_works>- Strong opener</what_works>
            <what_needs_improvement>- Slow start
        </hook>
        <summary>Fine</summary>";

        let report = parse_ad_report(text);
        assert_eq!(report.hook, None);
        assert_eq!(report.summary.as_deref(), Some("Fine"));
    }

    #[test]
    fn test_missing_what_works_drops_section_including_score() {
        let text = "<captions><score>40/50</score>
            <what_needs_improvement>- Too small</what_needs_improvement></captions>";

        assert_eq!(parse_ad_report(text).captions, None);
    }

    #[test]
    fn test_reordered_fields_drop_section() {
        let text = "<script>
            <what_works>- Punchy</what_works>
            <score>40/50</score>
            <what_needs_improvement>- Long</what_needs_improvement>
        </script>";

        assert_eq!(parse_ad_report(text).script, None);
    }

    #[test]
    fn test_first_of_two_script_blocks_wins() {
        let text = "<script><score>10/50</score><what_works>- first</what_works>\
            <what_needs_improvement>- first fix</what_needs_improvement></script>\
            <script><score>20/50</score><what_works>- second</what_works>\
            <what_needs_improvement>- second fix</what_needs_improvement></script>";

        let script = parse_ad_report(text).script.expect("script should parse");
        assert_eq!(script.score, "10/50");
        assert_eq!(script.what_works, strings(&["- first"]));
        assert_eq!(script.what_needs_improvement, Some(strings(&["- first fix"])));
    }

    #[test]
    fn test_hook_without_improvements_borrows_list_from_later_hook() {
        // Lazy skips may run past the first </hook> into the next block
        let text = "<hook><score>10/50</score><what_works>- first</what_works></hook>\
            <hook><score>20/50</score><what_works>- second</what_works>\
            <what_needs_improvement>- second fix</what_needs_improvement></hook>";

        let hook = parse_ad_report(text).hook.expect("hook should parse");
        assert_eq!(hook.score, "10/50");
        assert_eq!(hook.what_works, strings(&["- first"]));
        assert_eq!(hook.what_needs_improvement, Some(strings(&["- second fix"])));
    }

    #[test]
    fn test_patterns_follow_section_metadata() {
        for section in Section::ALL {
            let pattern = pattern_for(section);
            let expected = if section.has_improvement_list() { 3 } else { 2 };
            assert_eq!(pattern.capture_count(), expected, "{section}");

            let text = format!(
                "<{tag}><score>1/50</score><what_works>a</what_works>\
                 <what_needs_improvement>b</what_needs_improvement></{tag}>",
                tag = section.tag()
            );
            let report = parse_section(&text, section).expect("section should parse");
            assert_eq!(
                report.what_needs_improvement.is_some(),
                section.has_improvement_list(),
                "{section}"
            );
        }
    }

    #[test]
    fn test_byte_order_marks_are_trimmed() {
        let text = "<hook><score>\u{feff}45/50</score><what_works>\u{feff}- one\n\u{feff}</what_works>\
            <what_needs_improvement>- two\u{feff}</what_needs_improvement></hook>\
            <summary>\u{feff} done </summary>";

        let report = parse_ad_report(text);
        let hook = report.hook.expect("hook should parse");
        assert_eq!(hook.score, "45/50");
        assert_eq!(hook.what_works, strings(&["- one"]));
        assert_eq!(hook.what_needs_improvement, Some(strings(&["- two"])));
        assert_eq!(report.summary.as_deref(), Some("done"));
    }

    #[test]
    fn test_next_line_is_not_trimmed() {
        assert_eq!(trim_text("\u{85}x\u{a0} "), "\u{85}x");
    }

    #[test]
    fn test_list_items_are_trimmed_and_blank_lines_removed() {
        assert_eq!(
            split_items("  - point one  \n\n  \n- point two\n"),
            strings(&["- point one", "- point two"])
        );
    }

    #[test]
    fn test_blank_list_is_empty_not_absent() {
        let text = "<hook><score>5/50</score><what_works>\n   \n</what_works>\
            <what_needs_improvement></what_needs_improvement></hook>";

        let hook = parse_ad_report(text).hook.expect("hook should parse");
        assert!(hook.what_works.is_empty());
        assert_eq!(hook.what_needs_improvement, Some(vec![]));
    }

    #[test]
    fn test_score_is_passed_through_verbatim() {
        for score in ["71/50", "abc", "-3/50", ""] {
            let text = format!(
                "<visuals><score>  {score}  </score><what_works>x</what_works></visuals>"
            );
            let visuals = parse_ad_report(&text).visuals.expect("visuals should parse");
            assert_eq!(visuals.score, score);
        }
    }

    #[test]
    fn test_score_split_across_lines_drops_section() {
        let text = "<visuals><score>45\n/50</score><what_works>x</what_works></visuals>";
        assert_eq!(parse_ad_report(text).visuals, None);
    }

    #[test]
    fn test_summary_is_matched_at_document_scope() {
        let text = "<hook><summary>\n  inside hook  \n</summary></hook>";
        assert_eq!(parse_ad_report(text).summary.as_deref(), Some("inside hook"));
    }

    #[test]
    fn test_text_outside_tags_is_ignored() {
        let text = format!("Here is my analysis:\n\n{FULL_REPORT}\n\nLet me know!");
        assert_eq!(parse_ad_report(&text), parse_ad_report(FULL_REPORT));
    }

    #[test]
    fn test_windows_line_endings() {
        let text = "<visuals>\r\n<score>40/50</score>\r\n<what_works>\r\n- a\r\n\r\n- b\r\n</what_works>\r\n</visuals>";
        let visuals = parse_ad_report(text).visuals.expect("visuals should parse");
        assert_eq!(visuals.what_works, strings(&["- a", "- b"]));
    }

    proptest! {
        /// Property: parsing never panics and is deterministic
        #[test]
        fn parse_is_total_and_deterministic(text in ".{0,400}") {
            let first = parse_ad_report(&text);
            let second = parse_ad_report(&text);
            prop_assert_eq!(first, second);
        }

        /// Property: tag soup never yields blank or untrimmed list items
        #[test]
        fn list_items_are_never_blank(
            parts in proptest::collection::vec(
                prop_oneof![
                    Just("<hook>".to_string()),
                    Just("</hook>".to_string()),
                    Just("<visuals>".to_string()),
                    Just("</visuals>".to_string()),
                    Just("<score>".to_string()),
                    Just("</score>".to_string()),
                    Just("<what_works>".to_string()),
                    Just("</what_works>".to_string()),
                    Just("<what_needs_improvement>".to_string()),
                    Just("</what_needs_improvement>".to_string()),
                    "[ a-z\\-\n]{0,12}",
                ],
                0..40,
            )
        ) {
            let text = parts.concat();
            let report = parse_ad_report(&text);
            for (_, section) in report.sections() {
                let improvements = section.what_needs_improvement.iter().flatten();
                for item in section.what_works.iter().chain(improvements) {
                    prop_assert!(!item.is_empty());
                    prop_assert_eq!(trim_text(item), item.as_str());
                }
            }
            if let Some(visuals) = &report.visuals {
                prop_assert!(visuals.what_needs_improvement.is_none());
            }
        }

        /// Property: a well-formed section always round-trips its items
        #[test]
        fn well_formed_hook_is_found(
            score in "[0-9]{1,2}/50",
            works in proptest::collection::vec("[a-z][a-z ]{0,20}[a-z]", 1..5),
            fixes in proptest::collection::vec("[a-z][a-z ]{0,20}[a-z]", 0..5),
        ) {
            let text = format!(
                "<hook>\n<score>{}</score>\n<what_works>\n{}\n</what_works>\n\
                 <what_needs_improvement>\n{}\n</what_needs_improvement>\n</hook>",
                score,
                works.join("\n\n"),
                fixes.join("\n"),
            );
            let hook = parse_ad_report(&text).hook;
            prop_assert_eq!(
                hook,
                Some(SectionReport {
                    score,
                    what_works: works,
                    what_needs_improvement: Some(fixes),
                })
            );
        }
    }
}
