//! Rule registry - ordered tables of lexical cues per content type
//!
//! Each [`RuleSet`] binds one [`ContentType`] to a list of [`Cue`]s. The
//! classifier walks the registry in order and never hard-codes a category,
//! so adding a category means registering a new rule set, not touching
//! control flow. Confidence weights live next to the patterns they score so
//! the tables can be checked independently.

use crate::error::DistillError;
use crate::text;
use distill_domain::ContentType;
use regex::Regex;

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

/// How a cue match is turned into a confidence score
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CueWeight {
    /// Constant confidence for every match
    Fixed(f64),

    /// Base confidence raised by specificity signals in the statement
    Specificity {
        /// Confidence with no specificity signals
        base: f64,
        /// Added when the statement contains a numeral
        numeral_bonus: f64,
        /// Added when the statement names a proper noun
        proper_noun_bonus: f64,
    },
}

impl CueWeight {
    /// Score a match found in `statement`, clamped to (0, 1]
    pub fn score(&self, statement: &str) -> f64 {
        let raw = match *self {
            CueWeight::Fixed(c) => c,
            CueWeight::Specificity {
                base,
                numeral_bonus,
                proper_noun_bonus,
            } => {
                let mut c = base;
                if text::has_numeral(statement) {
                    c += numeral_bonus;
                }
                if text::has_proper_noun(statement) {
                    c += proper_noun_bonus;
                }
                c
            }
        };
        raw.clamp(f64::EPSILON, 1.0)
    }
}

/// Which matches of a rule set become items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScope {
    /// Every match of every cue yields an item
    EveryMatch,

    /// At most one item per sentence, from the earliest cue match, and only
    /// for sentences of at least `min_words` words
    FirstPerSentence {
        /// Minimum sentence length in words
        min_words: usize,
    },
}

/// A single lexical trigger
#[derive(Debug, Clone)]
pub struct Cue {
    /// Stable cue name, recorded on every item it produces
    pub name: String,

    /// Human-readable description used in explanations
    pub description: String,

    /// Compiled pattern
    pub pattern: Regex,

    /// Confidence weighting
    pub weight: CueWeight,
}

impl Cue {
    /// Compile a cue
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        pattern: &str,
        weight: CueWeight,
    ) -> Result<Self, DistillError> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|e| DistillError::Rule {
            name: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name,
            description: description.into(),
            pattern,
            weight,
        })
    }
}

/// All cues for one content type
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Category assigned to matches
    pub content_type: ContentType,

    /// Justification prefix used in explainability entries
    pub reason: String,

    /// Match scope
    pub scope: MatchScope,

    /// Cues, in evaluation order
    pub cues: Vec<Cue>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new(content_type: ContentType, reason: impl Into<String>, scope: MatchScope) -> Self {
        Self {
            content_type,
            reason: reason.into(),
            scope,
            cues: Vec::new(),
        }
    }

    /// Add a cue, compiling its pattern
    pub fn cue(
        mut self,
        name: &str,
        description: &str,
        pattern: &str,
        weight: CueWeight,
    ) -> Result<Self, DistillError> {
        self.cues.push(Cue::new(name, description, pattern, weight)?);
        Ok(self)
    }

    /// Look up a cue by name
    pub fn find_cue(&self, name: &str) -> Option<&Cue> {
        self.cues.iter().find(|c| c.name == name)
    }
}

/// Ordered registry of rule sets plus the narrative cues used to explain
/// excluded content
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    sets: Vec<RuleSet>,
    narrative: Vec<Regex>,
}

impl RuleRegistry {
    /// An empty registry
    pub fn empty() -> Self {
        Self {
            sets: Vec::new(),
            narrative: Vec::new(),
        }
    }

    /// Register a rule set
    ///
    /// A set for a content type that is already registered extends the
    /// existing set's cues; otherwise the set is appended.
    pub fn register(&mut self, set: RuleSet) {
        match self.sets.iter_mut().find(|s| s.content_type == set.content_type) {
            Some(existing) => existing.cues.extend(set.cues),
            None => self.sets.push(set),
        }
    }

    /// Register a narrative (background content) cue
    pub fn register_narrative(&mut self, pattern: &str) -> Result<(), DistillError> {
        let regex = Regex::new(pattern).map_err(|e| DistillError::Rule {
            name: "narrative".to_string(),
            message: e.to_string(),
        })?;
        self.narrative.push(regex);
        Ok(())
    }

    /// Rule sets in evaluation order
    pub fn rule_sets(&self) -> &[RuleSet] {
        &self.sets
    }

    /// The rule set for a content type
    pub fn get(&self, content_type: ContentType) -> Option<&RuleSet> {
        self.sets.iter().find(|s| s.content_type == content_type)
    }

    /// Whether text reads as generic narrative or background
    pub fn is_narrative(&self, text: &str) -> bool {
        self.narrative.iter().any(|r| r.is_match(text))
    }

    /// Justification for an item produced by `rule` with `quote`
    pub fn explain(&self, content_type: ContentType, rule: &str, quote: &str) -> String {
        match self.get(content_type) {
            Some(set) => match set.find_cue(rule) {
                Some(cue) => format!("{} ({} `{}`)", set.reason, cue.description, quote),
                None => format!("{} (`{}`)", set.reason, quote),
            },
            None => format!("Matched {} cue `{}`", content_type, quote),
        }
    }

    /// The standard English legal/contractual cue tables
    pub fn standard() -> Result<Self, DistillError> {
        let mut registry = Self::empty();

        registry.register(number_rules()?);
        registry.register(date_rules()?);
        registry.register(exception_rules()?);
        registry.register(risk_rules()?);
        registry.register(compliance_rules()?);
        registry.register(mandatory_rules()?);
        registry.register(fact_rules()?);

        for pattern in [
            r"(?i)^\s*(?:this document|this section|the purpose|background|introduction|overview)\b",
            r"(?i)\b(?:for example|such as|including but not limited to)\b",
            r"(?i)\b(?:in general|generally speaking|typically)\b",
        ] {
            registry.register_narrative(pattern)?;
        }

        Ok(registry)
    }
}

fn number_rules() -> Result<RuleSet, DistillError> {
    RuleSet::new(
        ContentType::NumberLimit,
        "Contains a specific numerical threshold or limit",
        MatchScope::EveryMatch,
    )
    .cue(
        "currency_amount",
        "currency amount",
        r"(?i)[$€£]\s?\d+(?:,\d{3})*(?:\.\d+)?(?:\s?(?:million|billion|thousand)\b)?",
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "currency_code",
        "amount with currency unit",
        r"(?i)\b\d+(?:,\d{3})*(?:\.\d+)?\s?(?:USD|EUR|GBP|dollars?|euros?|pounds sterling)\b",
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "percentage",
        "percentage",
        r"(?i)\b\d+(?:\.\d+)?\s?(?:%|percent\b|per cent\b)",
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "bounded_quantity",
        "bounded quantity",
        r"(?i)\b(?:maximum|minimum|up to|at least|no more than|no less than|not more than|not less than|not to exceed|in excess of|threshold of|limit of|cap of)\s+(?:of\s+)?[$€£]?\d+(?:,\d{3})*(?:\.\d+)?",
        CueWeight::Fixed(0.9),
    )?
    .cue(
        "duration",
        "duration",
        r"(?i)\b\d+\)?\s?(?:business\s+|calendar\s+)?(?:days?|hours?|minutes?|weeks?|months?|years?)\b",
        CueWeight::Fixed(0.8),
    )
}

fn date_rules() -> Result<RuleSet, DistillError> {
    RuleSet::new(
        ContentType::DateTimeline,
        "Contains a date, deadline or timeline",
        MatchScope::EveryMatch,
    )
    .cue(
        "numeric_date",
        "numeric date",
        r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b",
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "iso_date",
        "ISO date",
        r"\b\d{4}-\d{2}-\d{2}\b",
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "month_date",
        "calendar date",
        &format!(r"(?i)\b(?:{MONTHS})\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b"),
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "day_month_date",
        "calendar date",
        &format!(r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{MONTHS}),?\s+\d{{4}}\b"),
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "deadline",
        "deadline",
        &format!(
            r"(?i)\b(?:within|no later than|not later than|on or before|prior to|by|before|after|until|from|effective|commencing)\s+(?:\d+\)?\s?(?:business\s+|calendar\s+)?(?:days?|weeks?|months?|years?)\b|(?:{MONTHS})\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b|\d{{1,2}}[/-]\d{{1,2}}[/-]\d{{2,4}}\b)"
        ),
        CueWeight::Fixed(0.9),
    )?
    .cue(
        "recurring_period",
        "recurring period",
        r"(?i)\b(?:annually|quarterly|monthly|weekly|per annum|fiscal year|calendar year)\b",
        CueWeight::Fixed(0.6),
    )
}

fn exception_rules() -> Result<RuleSet, DistillError> {
    RuleSet::new(
        ContentType::ExceptionCondition,
        "Contains an exception or conditional qualification",
        MatchScope::EveryMatch,
    )
    .cue(
        "carve_out",
        "carve-out",
        r"(?i)\b(?:unless|except(?:\s+(?:as|that|for))?|excluding|with the exception of|other than|save for)\b",
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "proviso",
        "proviso",
        r"(?i)\b(?:provided,?\s+(?:however,?\s+)?that|subject to|conditional (?:up)?on|contingent (?:up)?on|if and only if|in the event (?:that|of))\b",
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "restriction",
        "restrictive qualifier",
        r"(?i)\bonly(?:\s+if|\s+when)?\b",
        CueWeight::Fixed(0.8),
    )?
    .cue(
        "contrast",
        "contrasting connective",
        r"(?i)\b(?:however|notwithstanding|although|whereas)\b",
        CueWeight::Fixed(0.7),
    )?
    .cue(
        "but",
        "contrasting connective",
        r"(?i)\bbut\b",
        CueWeight::Fixed(0.5),
    )
}

fn risk_rules() -> Result<RuleSet, DistillError> {
    RuleSet::new(
        ContentType::RiskPenalty,
        "Contains a risk, penalty or liability",
        MatchScope::EveryMatch,
    )
    .cue(
        "penalty",
        "penalty",
        r"(?i)\b(?:penalty|penalties|liquidated damages|punishable by|forfeit(?:s|ed|ure)?|event of default)\b",
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "breach",
        "violation",
        r"(?i)\b(?:violations?|violate[sd]?|breach(?:es|ed)?|non-?compliance)\b",
        CueWeight::Fixed(0.9),
    )?
    .cue(
        "consequence",
        "adverse consequence",
        r"(?i)\b(?:may|will|shall) result in\b|\bgrounds for termination\b|\bterminat(?:e|ion) for cause\b",
        CueWeight::Fixed(0.8),
    )?
    .cue(
        "liability",
        "liability",
        r"(?i)\b(?:liability|liable|damages|indemnif(?:y|ies|ied|ication))\b",
        CueWeight::Fixed(0.8),
    )?
    .cue("fine", "fine", r"(?i)\bfines?\b", CueWeight::Fixed(0.8))?
    .cue(
        "failure",
        "failure to perform",
        r"(?i)\bfailure to\b",
        CueWeight::Fixed(0.8),
    )?
    .cue("risk", "risk", r"(?i)\brisks?\b", CueWeight::Fixed(0.6))
}

fn compliance_rules() -> Result<RuleSet, DistillError> {
    RuleSet::new(
        ContentType::ComplianceRequirement,
        "Contains a compliance or regulatory requirement",
        MatchScope::EveryMatch,
    )
    .cue(
        "named_regime",
        "named regulatory regime",
        r"\b(?:GDPR|HIPAA|SOX|Sarbanes-Oxley|CCPA|FCPA|PCI[- ]DSS|ISO\s?\d{4,5}|SOC\s?2)\b",
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "regulatory",
        "regulatory reference",
        r"(?i)\b(?:regulations?|regulatory|statutes?|statutory|applicable laws?)\b",
        CueWeight::Fixed(0.9),
    )?
    .cue(
        "comply",
        "compliance obligation",
        r"(?i)\b(?:comply|complies|complied|complying|compliance|compliant)\b",
        CueWeight::Fixed(0.9),
    )?
    .cue(
        "pursuant",
        "pursuant reference",
        r"(?i)\b(?:pursuant to|in accordance with)\b",
        CueWeight::Fixed(0.8),
    )?
    .cue(
        "assurance",
        "assurance activity",
        r"(?i)\b(?:certif(?:y|ied|ies|ication)|audits?|audited|auditor|inspections?|verification|validation)\b",
        CueWeight::Fixed(0.7),
    )?
    .cue(
        "standard",
        "standard",
        r"(?i)\bstandards?\b",
        CueWeight::Fixed(0.6),
    )
}

fn mandatory_rules() -> Result<RuleSet, DistillError> {
    RuleSet::new(
        ContentType::MandatoryRequirement,
        "Contains a mandatory obligation",
        MatchScope::EveryMatch,
    )
    .cue(
        "shall_must",
        "binding modal",
        r"(?i)\b(?:shall|must)(?:\s+not)?\b",
        CueWeight::Fixed(1.0),
    )?
    .cue(
        "required",
        "requirement",
        r"(?i)\b(?:required|obligated|obliged|mandatory)\b",
        CueWeight::Fixed(0.9),
    )?
    .cue(
        "prohibited",
        "prohibition",
        r"(?i)\b(?:prohibited|forbidden|may not)\b",
        CueWeight::Fixed(0.9),
    )?
    .cue(
        "undertaking",
        "undertaking",
        r"(?i)\b(?:agrees?|undertakes?|covenants?) to\b",
        CueWeight::Fixed(0.8),
    )?
    .cue(
        "should",
        "advisory modal",
        r"(?i)\bshould(?:\s+not)?\b",
        CueWeight::Fixed(0.6),
    )
}

fn fact_rules() -> Result<RuleSet, DistillError> {
    let weight = CueWeight::Specificity {
        base: 0.6,
        numeral_bonus: 0.1,
        proper_noun_bonus: 0.1,
    };

    RuleSet::new(
        ContentType::ObjectiveFact,
        "Contains an objective factual assertion",
        MatchScope::FirstPerSentence { min_words: 6 },
    )
    .cue(
        "definition",
        "definition",
        r"(?i)\b(?:means|refers to|is defined as|defines)\b",
        weight,
    )?
    .cue(
        "copula",
        "factual assertion",
        r"(?i)\b(?:is|are|was|were|will be|has been|have been)\b",
        weight,
    )?
    .cue(
        "composition",
        "composition statement",
        r"(?i)\b(?:includes|consists of|comprises|contains|indicates|specifies)\b",
        weight,
    )
}
