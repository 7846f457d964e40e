//! Pattern pass: ordered regex substitution.

use tracing::debug;

use crate::domain::{byte_to_char, default_rules, DetectedSpan, RedactionRule, SpanSource};

/// Output of the pattern pass.
#[derive(Debug, Clone, Default)]
pub struct PatternPass {
    /// Text with every rule match replaced by its token.
    pub text: String,
    /// One per match, summed across rules.
    pub count: usize,
    /// Matches in rule order. Each span's offsets refer to the text state
    /// that its rule ran against.
    pub spans: Vec<DetectedSpan>,
}

/// Applies an ordered list of rules, each against the output of the previous.
///
/// Overlapping pattern types are settled by rule order: once a rule replaces
/// a substring, later rules only see the token.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    rules: Vec<RedactionRule>,
}

impl PatternMatcher {
    pub fn new(rules: Vec<RedactionRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RedactionRule] {
        &self.rules
    }

    /// Runs every rule in order over `text`.
    pub fn apply(&self, text: &str) -> PatternPass {
        let mut current = text.to_string();
        let mut count = 0;
        let mut spans = Vec::new();

        for rule in &self.rules {
            let (next, rule_spans) = Self::apply_rule(rule, &current);
            if !rule_spans.is_empty() {
                debug!(
                    category = %rule.category(),
                    matches = rule_spans.len(),
                    "Pattern rule matched"
                );
                count += rule_spans.len();
                spans.extend(rule_spans);
                current = next;
            }
        }

        PatternPass {
            text: current,
            count,
            spans,
        }
    }

    fn apply_rule(rule: &RedactionRule, text: &str) -> (String, Vec<DetectedSpan>) {
        let mut output = String::with_capacity(text.len());
        let mut spans = Vec::new();
        let mut last = 0;
        // Running char offset of `last`, so each match costs only its gap.
        let mut last_char = 0;

        // Zero-width matches have nothing to replace.
        for m in rule.pattern().find_iter(text).filter(|m| !m.is_empty()) {
            let start = last_char + byte_to_char(&text[last..], m.start() - last);
            let end = start + m.as_str().chars().count();

            output.push_str(&text[last..m.start()]);
            output.push_str(rule.replacement_token());

            spans.push(DetectedSpan {
                start,
                end,
                category: rule.category(),
                source: SpanSource::Pattern,
                matched_text: m.as_str().to_string(),
            });

            last = m.end();
            last_char = end;
        }
        output.push_str(&text[last..]);

        (output, spans)
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new(default_rules())
    }
}
