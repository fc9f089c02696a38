mod store;
mod types;

pub use store::{RuleStore, RuleStoreError, RulesFile, RULES_FILE_NAME, RULES_VERSION};
pub use types::*;

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Rules seeded into a fresh rule store, most specific first
pub fn default_rules() -> Vec<PatternRule> {
    vec![
        PatternRule::new(
            "Détective Conan Standard",
            r"Détective\s+Conan\s+(?:[ée]pisode\s+|ep\.?\s*)?(\d+)",
            1,
        )
        .with_description("Standard format: Détective Conan 123")
        .as_default(),
        PatternRule::new(
            "Detective Conan Standard",
            r"Detective\s+Conan\s+(?:[ée]pisode\s+|ep\.?\s*)?(\d+)",
            1,
        )
        .with_description("Standard format without accents: Detective Conan 123")
        .as_default(),
        PatternRule::new("Format Simple", r"(\d+)", 1)
            .with_description("Bare episode number")
            .as_default(),
    ]
}

fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Compile a user-supplied rule, rejecting bad patterns and capture groups
/// the pattern does not have
fn validate_rule(rule: &PatternRule) -> Result<Regex, RuleError> {
    let regex = compile_pattern(&rule.pattern).map_err(|e| RuleError::InvalidPattern {
        name: rule.name.clone(),
        message: e.to_string(),
    })?;

    // captures_len includes the implicit whole-match group 0
    let available = regex.captures_len();
    if rule.capture_group >= available {
        return Err(RuleError::CaptureGroupOutOfRange {
            name: rule.name.clone(),
            capture_group: rule.capture_group,
            available: available - 1,
        });
    }

    Ok(regex)
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: PatternRule,
    /// None when the pattern failed to compile
    regex: Option<Regex>,
}

/// An immutable, ordered sequence of rules with their compiled patterns.
///
/// Patterns are compiled once per distinct pattern string when the set is
/// built. Rules whose pattern does not compile are kept (so they can be
/// listed and fixed) but never take part in extraction. Editing produces a
/// new set that reuses the compiled patterns of this one.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    cache: HashMap<String, Regex>,
    errors: Vec<RuleError>,
}

impl RuleSet {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self::build(rules, &HashMap::new())
    }

    fn build(rules: Vec<PatternRule>, previous: &HashMap<String, Regex>) -> Self {
        let mut cache: HashMap<String, Regex> = HashMap::new();
        let mut errors = Vec::new();
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let cached = cache
                .get(&rule.pattern)
                .or_else(|| previous.get(&rule.pattern))
                .cloned();

            let regex = match cached {
                Some(regex) => Some(regex),
                None => match compile_pattern(&rule.pattern) {
                    Ok(regex) => {
                        trace!(rule = %rule.name, "Compiled pattern");
                        Some(regex)
                    }
                    Err(e) => {
                        warn!(rule = %rule.name, error = %e, "Invalid pattern, rule disabled");
                        errors.push(RuleError::InvalidPattern {
                            name: rule.name.clone(),
                            message: e.to_string(),
                        });
                        None
                    }
                },
            };

            if let Some(regex) = &regex {
                cache.insert(rule.pattern.clone(), regex.clone());
            }

            compiled.push(CompiledRule { rule, regex });
        }

        debug!(
            rules = compiled.len(),
            patterns = cache.len(),
            invalid = errors.len(),
            "Rule set built"
        );

        Self {
            rules: compiled,
            cache,
            errors,
        }
    }

    /// Rules in precedence order
    pub fn rules(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    pub fn to_rules(&self) -> Vec<PatternRule> {
        self.rules().cloned().collect()
    }

    /// Patterns that failed to compile when the set was built
    pub fn errors(&self) -> &[RuleError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Extract an episode number from a file name.
    ///
    /// Enabled rules are tried in order and the first one whose capture
    /// group parses as a base-10 integer wins. `None` means no rule
    /// produced a number.
    pub fn extract_episode_number(&self, file_name: &str) -> Option<u32> {
        self.extract(file_name).map(|(number, _)| number)
    }

    /// Like `extract_episode_number`, also returning the name of the rule
    /// that produced the number
    pub fn extract(&self, file_name: &str) -> Option<(u32, &str)> {
        self.rules.iter().find_map(|compiled| {
            match apply_rule(compiled, file_name) {
                RuleTrace::Number(number) => {
                    trace!(rule = %compiled.rule.name, number, file = %file_name, "Rule matched");
                    Some((number, compiled.rule.name.as_str()))
                }
                _ => None,
            }
        })
    }

    /// Try every rule against a file name, without stopping at the first hit
    pub fn explain(&self, file_name: &str) -> Vec<(&PatternRule, RuleTrace)> {
        self.rules
            .iter()
            .map(|compiled| (&compiled.rule, apply_rule(compiled, file_name)))
            .collect()
    }

    /// New set with `rule` inserted at `position` (appended when `None`).
    ///
    /// Unlike rules loaded from a store, a rule added here must compile and
    /// its capture group must exist in the pattern.
    pub fn with_rule_added(
        &self,
        rule: PatternRule,
        position: Option<usize>,
    ) -> Result<RuleSet, RuleError> {
        let regex = validate_rule(&rule)?;

        let mut rules = self.to_rules();
        let index = position.unwrap_or(rules.len()).min(rules.len());
        rules.insert(index, rule);

        let mut cache = self.cache.clone();
        cache.insert(rules[index].pattern.clone(), regex);

        Ok(Self::build(rules, &cache))
    }

    /// First rule named `name`
    pub fn rule(&self, name: &str) -> Option<&PatternRule> {
        self.rules().find(|r| r.name == name)
    }

    /// New set with the first rule named `name` replaced by `rule`, keeping
    /// its precedence. The replacement is validated like an added rule.
    pub fn with_rule_replaced(&self, name: &str, rule: PatternRule) -> Result<RuleSet, RuleError> {
        let index = self
            .rules()
            .position(|r| r.name == name)
            .ok_or_else(|| RuleError::UnknownRule(name.to_string()))?;
        let regex = validate_rule(&rule)?;

        let mut rules = self.to_rules();
        let mut cache = self.cache.clone();
        cache.insert(rule.pattern.clone(), regex);
        rules[index] = rule;

        Ok(Self::build(rules, &cache))
    }

    /// New set without any rule named `name`
    pub fn with_rule_removed(&self, name: &str) -> Result<RuleSet, RuleError> {
        let rules: Vec<PatternRule> = self.rules().filter(|r| r.name != name).cloned().collect();

        if rules.len() == self.len() {
            return Err(RuleError::UnknownRule(name.to_string()));
        }

        Ok(Self::build(rules, &self.cache))
    }

    /// New set with every rule named `name` enabled or disabled
    pub fn with_rule_enabled(&self, name: &str, enabled: bool) -> Result<RuleSet, RuleError> {
        if !self.rules().any(|r| r.name == name) {
            return Err(RuleError::UnknownRule(name.to_string()));
        }

        let rules = self
            .rules()
            .map(|r| {
                if r.name == name {
                    r.clone().with_enabled(enabled)
                } else {
                    r.clone()
                }
            })
            .collect();

        Ok(Self::build(rules, &self.cache))
    }
}

fn apply_rule(compiled: &CompiledRule, file_name: &str) -> RuleTrace {
    if !compiled.rule.enabled {
        return RuleTrace::Disabled;
    }

    let Some(regex) = &compiled.regex else {
        return RuleTrace::Invalid;
    };

    let Some(captures) = regex.captures(file_name) else {
        return RuleTrace::NoMatch;
    };

    let Some(group) = captures.get(compiled.rule.capture_group) else {
        return RuleTrace::MissingGroup;
    };

    match group.as_str().parse::<u32>() {
        Ok(number) => RuleTrace::Number(number),
        Err(_) => RuleTrace::NotANumber(group.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RuleSet {
        RuleSet::new(default_rules())
    }

    // ============ Extraction ============

    #[test]
    fn test_extract_standard_phrase() {
        let rules = defaults();
        assert_eq!(
            rules.extract_episode_number("Détective Conan 123.mkv"),
            Some(123)
        );
        assert_eq!(
            rules.extract_episode_number("Detective Conan Episode 001.mkv"),
            Some(1)
        );
    }

    #[test]
    fn test_extract_ignores_accent_and_case() {
        let rules = defaults();
        let names = [
            "Détective Conan 42 VOSTFR.mp4",
            "DÉTECTIVE CONAN 42.mp4",
            "detective conan 42.mkv",
            "DETECTIVE Conan   42.mkv",
            "détective conan épisode 42.mkv",
        ];

        for name in names {
            assert_eq!(rules.extract_episode_number(name), Some(42), "{}", name);
        }
    }

    #[test]
    fn test_extract_reports_rule_name() {
        let rules = defaults();

        let (number, rule) = rules.extract("Detective Conan 7.mkv").unwrap();
        assert_eq!(number, 7);
        assert_eq!(rule, "Detective Conan Standard");

        let (number, rule) = rules.extract("Episode 88 [1080p].mkv").unwrap();
        assert_eq!(number, 88);
        assert_eq!(rule, "Format Simple");
    }

    #[test]
    fn test_extract_no_match_is_none() {
        let rules = defaults();
        assert_eq!(rules.extract_episode_number("notes.txt"), None);
        assert_eq!(rules.extract_episode_number(""), None);
    }

    #[test]
    fn test_empty_rule_set_never_matches() {
        let rules = RuleSet::default();
        assert!(rules.is_empty());
        assert_eq!(rules.extract_episode_number("Detective Conan 1.mkv"), None);
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let rules = RuleSet::new(vec![
            PatternRule::new("Off", r"(\d+)", 1).with_enabled(false),
            PatternRule::new("Ep", r"ep(\d+)", 1),
        ]);

        assert_eq!(rules.extract_episode_number("1080p ep12"), Some(12));
    }

    #[test]
    fn test_generic_rule_first_wins_over_specific() {
        // Precedence is list order: a bare digits rule placed first grabs the
        // resolution tag instead of the episode marker.
        let rules = RuleSet::new(vec![
            PatternRule::new("Format Simple", r"(\d+)", 1),
            PatternRule::new("Detective Conan Standard", r"Detective\s+Conan\s+(\d+)", 1),
        ]);

        assert_eq!(
            rules.extract_episode_number("[1080p] Detective Conan 0345.mkv"),
            Some(1080)
        );

        let ordered = RuleSet::new(rules.to_rules().into_iter().rev().collect());
        assert_eq!(
            ordered.extract_episode_number("[1080p] Detective Conan 0345.mkv"),
            Some(345)
        );
    }

    #[test]
    fn test_missing_capture_group_is_non_match() {
        let rules = RuleSet::new(vec![
            PatternRule::new("No group", r"Conan \d+", 1),
            PatternRule::new("Fallback", r"(\d+)", 1),
        ]);

        assert_eq!(rules.extract_episode_number("Conan 5"), Some(5));
        assert_eq!(rules.explain("Conan 5")[0].1, RuleTrace::MissingGroup);
    }

    #[test]
    fn test_optional_group_not_participating() {
        let rules = RuleSet::new(vec![PatternRule::new("Optional", r"Conan(?: (\d+))?", 1)]);

        assert_eq!(rules.extract_episode_number("Conan special"), None);
        assert_eq!(rules.extract_episode_number("Conan 9"), Some(9));
    }

    #[test]
    fn test_group_zero_uses_whole_match() {
        let rules = RuleSet::new(vec![PatternRule::new("Whole", r"\d+", 0)]);
        assert_eq!(rules.extract_episode_number("ep 0042"), Some(42));
    }

    #[test]
    fn test_unparseable_capture_falls_through() {
        let rules = RuleSet::new(vec![
            PatternRule::new("Word", r"Conan (\w+)", 1),
            PatternRule::new("Digits", r"(\d+)", 1),
        ]);

        assert_eq!(rules.extract_episode_number("Conan special 12"), Some(12));
    }

    #[test]
    fn test_overflowing_number_falls_through() {
        let rules = RuleSet::new(vec![
            PatternRule::new("Huge", r"(\d{11,})", 1),
            PatternRule::new("Ep", r"ep(\d+)", 1),
        ]);

        assert_eq!(rules.extract_episode_number("99999999999 ep3"), Some(3));
    }

    // ============ Invalid patterns ============

    #[test]
    fn test_invalid_pattern_reported_once_and_disabled() {
        let rules = RuleSet::new(vec![
            PatternRule::new("Broken", r"(\d+", 1),
            PatternRule::new("Digits", r"(\d+)", 1),
        ]);

        assert_eq!(rules.errors().len(), 1);
        assert!(matches!(
            &rules.errors()[0],
            RuleError::InvalidPattern { name, .. } if name == "Broken"
        ));
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.extract_episode_number("file 77"), Some(77));
        assert_eq!(rules.explain("file 77")[0].1, RuleTrace::Invalid);
    }

    // ============ Editing ============

    #[test]
    fn test_with_rule_added_returns_new_set() {
        let rules = defaults();
        let edited = rules
            .with_rule_added(PatternRule::new("SP", r"SP(\d+)", 1), Some(0))
            .unwrap();

        assert_eq!(rules.len(), 3);
        assert_eq!(edited.len(), 4);
        assert_eq!(edited.rules().next().unwrap().name, "SP");
        assert_eq!(edited.extract("Conan SP3 1080p").unwrap(), (3, "SP"));
    }

    #[test]
    fn test_with_rule_added_appends_by_default() {
        let edited = defaults()
            .with_rule_added(PatternRule::new("Last", r"x(\d+)", 1), None)
            .unwrap();

        assert_eq!(edited.rules().last().unwrap().name, "Last");
    }

    #[test]
    fn test_with_rule_added_rejects_invalid_pattern() {
        let result = defaults().with_rule_added(PatternRule::new("Bad", r"[", 1), None);
        assert!(matches!(result, Err(RuleError::InvalidPattern { .. })));
    }

    #[test]
    fn test_with_rule_added_rejects_missing_group() {
        let result = defaults().with_rule_added(PatternRule::new("Bad", r"ep(\d+)", 2), None);
        assert!(matches!(
            result,
            Err(RuleError::CaptureGroupOutOfRange {
                capture_group: 2,
                available: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_with_rule_replaced_keeps_position() {
        let rules = defaults();
        let replacement = PatternRule::new("Detective Conan Ep", r"Detective\s+Conan\s+#(\d+)", 1)
            .with_description("hash numbering");

        let edited = rules
            .with_rule_replaced("Detective Conan Standard", replacement.clone())
            .unwrap();

        let names: Vec<_> = edited.rules().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            ["Détective Conan Standard", "Detective Conan Ep", "Format Simple"]
        );
        assert_eq!(edited.rule("Detective Conan Ep"), Some(&replacement));
        assert!(edited.rule("Detective Conan Standard").is_none());
        assert_eq!(edited.extract("Detective Conan #42").unwrap(), (42, "Detective Conan Ep"));
        assert_eq!(rules.len(), 3);
        assert!(rules.rule("Detective Conan Standard").is_some());
    }

    #[test]
    fn test_with_rule_replaced_validates() {
        let rules = defaults();

        assert!(matches!(
            rules.with_rule_replaced("Nope", PatternRule::new("Nope", r"(\d+)", 1)),
            Err(RuleError::UnknownRule(_))
        ));
        assert!(matches!(
            rules.with_rule_replaced("Format Simple", PatternRule::new("Format Simple", r"(\d+", 1)),
            Err(RuleError::InvalidPattern { .. })
        ));
        assert!(matches!(
            rules.with_rule_replaced("Format Simple", PatternRule::new("Format Simple", r"\d+", 1)),
            Err(RuleError::CaptureGroupOutOfRange { available: 0, .. })
        ));
    }

    #[test]
    fn test_with_rule_removed() {
        let rules = defaults();
        let edited = rules.with_rule_removed("Format Simple").unwrap();

        assert_eq!(edited.len(), 2);
        assert_eq!(edited.extract_episode_number("random 123"), None);
        assert!(matches!(
            rules.with_rule_removed("Nope"),
            Err(RuleError::UnknownRule(_))
        ));
    }

    #[test]
    fn test_with_rule_enabled_toggles() {
        let rules = defaults();
        let disabled = rules.with_rule_enabled("Format Simple", false).unwrap();

        assert_eq!(disabled.extract_episode_number("random 123"), None);
        assert_eq!(rules.extract_episode_number("random 123"), Some(123));

        let enabled = disabled.with_rule_enabled("Format Simple", true).unwrap();
        assert_eq!(enabled.extract_episode_number("random 123"), Some(123));
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let rules = RuleSet::new(vec![
            PatternRule::new("Same", r"a(\d+)", 1),
            PatternRule::new("Same", r"b(\d+)", 1),
        ]);

        assert_eq!(rules.extract_episode_number("b4"), Some(4));
        let disabled = rules.with_rule_enabled("Same", false).unwrap();
        assert!(disabled.rules().all(|r| !r.enabled));
    }

    #[test]
    fn test_explain_lists_every_rule() {
        let rules = defaults();
        let traces = rules.explain("Detective Conan 12.mkv");

        assert_eq!(traces.len(), 3);
        assert_eq!(traces[0].1, RuleTrace::NoMatch);
        assert_eq!(traces[1].1, RuleTrace::Number(12));
        assert_eq!(traces[2].1, RuleTrace::Number(12));
    }
}
