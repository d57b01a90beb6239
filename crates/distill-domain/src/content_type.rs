//! Content type module - the closed set of decision-critical categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of decision-critical content
///
/// The set is closed per release. Adding a category means extending this
/// enum and registering a rule set for it; the match arms below keep every
/// consumer exhaustive-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Numerical thresholds, amounts, percentages and durations
    NumberLimit,

    /// Dates, deadlines and timelines
    DateTimeline,

    /// Exceptions, carve-outs and conditional clauses
    ExceptionCondition,

    /// Penalties, violations, liabilities and other risks
    RiskPenalty,

    /// Regulatory and compliance obligations
    ComplianceRequirement,

    /// Modal obligations (shall, must, required to)
    MandatoryRequirement,

    /// Objective factual assertions
    ObjectiveFact,
}

impl ContentType {
    /// Every content type, in declaration order
    pub const ALL: [ContentType; 7] = [
        ContentType::NumberLimit,
        ContentType::DateTimeline,
        ContentType::ExceptionCondition,
        ContentType::RiskPenalty,
        ContentType::ComplianceRequirement,
        ContentType::MandatoryRequirement,
        ContentType::ObjectiveFact,
    ];

    /// Get the content type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::NumberLimit => "number_limit",
            ContentType::DateTimeline => "date_timeline",
            ContentType::ExceptionCondition => "exception_condition",
            ContentType::RiskPenalty => "risk_penalty",
            ContentType::ComplianceRequirement => "compliance_requirement",
            ContentType::MandatoryRequirement => "mandatory_requirement",
            ContentType::ObjectiveFact => "objective_fact",
        }
    }

    /// Parse a content type from its snake_case name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "number_limit" => Some(ContentType::NumberLimit),
            "date_timeline" => Some(ContentType::DateTimeline),
            "exception_condition" => Some(ContentType::ExceptionCondition),
            "risk_penalty" => Some(ContentType::RiskPenalty),
            "compliance_requirement" => Some(ContentType::ComplianceRequirement),
            "mandatory_requirement" => Some(ContentType::MandatoryRequirement),
            "objective_fact" => Some(ContentType::ObjectiveFact),
            _ => None,
        }
    }

    /// Precedence rank used for single-label decisions and priority scoring
    ///
    /// Higher is more important:
    /// `risk_penalty > compliance_requirement > exception_condition >
    /// date_timeline > number_limit > mandatory_requirement > objective_fact`.
    pub fn rank(&self) -> u32 {
        match self {
            ContentType::RiskPenalty => 7,
            ContentType::ComplianceRequirement => 6,
            ContentType::ExceptionCondition => 5,
            ContentType::DateTimeline => 4,
            ContentType::NumberLimit => 3,
            ContentType::MandatoryRequirement => 2,
            ContentType::ObjectiveFact => 1,
        }
    }

    /// Name of the output bucket holding items of this type
    pub fn bucket_name(&self) -> &'static str {
        match self {
            ContentType::NumberLimit => "numbers_and_limits",
            ContentType::DateTimeline => "dates_and_timelines",
            ContentType::ExceptionCondition => "exceptions_and_conditions",
            ContentType::RiskPenalty | ContentType::ComplianceRequirement => {
                "risks_and_constraints"
            }
            ContentType::MandatoryRequirement => "mandatory_requirements",
            ContentType::ObjectiveFact => "key_facts",
        }
    }

    /// Short human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::NumberLimit => "Number / limit",
            ContentType::DateTimeline => "Date / timeline",
            ContentType::ExceptionCondition => "Exception / condition",
            ContentType::RiskPenalty => "Risk / penalty",
            ContentType::ComplianceRequirement => "Compliance",
            ContentType::MandatoryRequirement => "Obligation",
            ContentType::ObjectiveFact => "Fact",
        }
    }

    /// The dominant type among several, by precedence rank
    pub fn dominant<I>(types: I) -> Option<Self>
    where
        I: IntoIterator<Item = ContentType>,
    {
        types.into_iter().max_by_key(|t| t.rank())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
