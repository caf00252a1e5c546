use super::{Confidence, Recommendation, RecommendationKind};

/// Version tag of the SNP reference data, surfaced in every report.
pub const MAPPING_VERSION: &str = "v1.0";

pub const DISCLAIMER: &str = "This service provides informational recommendations only and is not a medical diagnosis. Always consult a licensed healthcare professional before starting supplements or major diet changes.";

pub const DEFAULT_BADGES: &[&str] = &["DNA-Verified", "First-Report"];

#[derive(Debug)]
pub struct SnpTrait {
    pub rsid: &'static str,
    pub trait_name: &'static str,
    pub genotypes: &'static [(&'static str, &'static str)],
}

impl SnpTrait {
    pub fn interpret(&self, genotype: &str) -> Option<&'static str> {
        self.genotypes
            .iter()
            .find(|(code, _)| *code == genotype)
            .map(|(_, interpretation)| *interpretation)
    }
}

// Known nutrition-relevant variants
pub const SNP_TRAITS: &[SnpTrait] = &[
    SnpTrait {
        rsid: "RS4988235",
        trait_name: "Lactose Tolerance",
        genotypes: &[
            ("GG", "Lactose tolerant"),
            ("AA", "Lactose intolerant"),
            ("AG", "Intermediate lactose tolerance"),
            ("GA", "Intermediate lactose tolerance"),
        ],
    },
    SnpTrait {
        rsid: "RS1801133",
        trait_name: "Folate Metabolism",
        genotypes: &[
            ("CC", "Normal folate metabolism"),
            ("CT", "Intermediate (reduced) folate function"),
            ("TC", "Intermediate (reduced) folate function"),
            ("TT", "Reduced folate function (consider increased dietary folate)"),
        ],
    },
    SnpTrait {
        rsid: "RS762551",
        trait_name: "Caffeine Metabolism",
        genotypes: &[
            ("AA", "Fast metabolizer"),
            ("AC", "Intermediate"),
            ("CA", "Intermediate"),
            ("CC", "Slow metabolizer (recommend lower caffeine)"),
        ],
    },
    SnpTrait {
        rsid: "RS2282679",
        trait_name: "Vitamin D Binding",
        genotypes: &[
            ("GG", "Normal vitamin D binding"),
            ("GT", "Reduced vitamin D binding (consider higher vitamin D sources)"),
            ("TG", "Reduced vitamin D binding (consider higher vitamin D sources)"),
            ("TT", "Reduced vitamin D binding (consider higher vitamin D sources)"),
        ],
    },
    SnpTrait {
        rsid: "RS174537",
        trait_name: "Omega-3 Processing",
        genotypes: &[
            ("GG", "Normal omega-3 conversion"),
            ("GT", "Intermediate omega-3 conversion"),
            ("TG", "Intermediate omega-3 conversion"),
            ("TT", "Lower endogenous conversion (recommend dietary omega-3)"),
        ],
    },
    SnpTrait {
        rsid: "RS9939609",
        trait_name: "FTO Obesity Risk",
        genotypes: &[
            ("TT", "Typical risk"),
            ("AT", "Intermediate risk"),
            ("TA", "Intermediate risk"),
            ("AA", "Higher risk"),
        ],
    },
];

pub fn lookup_snp(rsid: &str) -> Option<&'static SnpTrait> {
    SNP_TRAITS.iter().find(|snp| snp.rsid == rsid)
}

/// A canned recommendation fired when an interpretation mentions `keyword`.
#[derive(Debug)]
pub struct RecommendationRule {
    pub trait_name: &'static str,
    pub keyword: &'static str,
    pub kind: RecommendationKind,
    pub text: &'static str,
    pub confidence: Confidence,
}

pub const RECOMMENDATION_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        trait_name: "Lactose Tolerance",
        keyword: "intolerant",
        kind: RecommendationKind::Diet,
        text: "Replace dairy milk with soy, almond, or oat milk. Choose lactose-free yogurt and cheese alternatives.",
        confidence: Confidence::High,
    },
    RecommendationRule {
        trait_name: "Folate Metabolism",
        keyword: "reduced",
        kind: RecommendationKind::Diet,
        text: "Include daily servings of spinach, lentils, chickpeas, and citrus fruits. Consider folate-rich whole grains.",
        confidence: Confidence::Moderate,
    },
    RecommendationRule {
        trait_name: "Folate Metabolism",
        keyword: "reduced",
        kind: RecommendationKind::Supplement,
        text: "Consult healthcare provider about folate supplementation.",
        confidence: Confidence::Low,
    },
    RecommendationRule {
        trait_name: "Caffeine Metabolism",
        keyword: "slow",
        kind: RecommendationKind::Lifestyle,
        text: "Limit caffeine to <200mg daily. Avoid coffee after 2 PM to prevent sleep disruption.",
        confidence: Confidence::High,
    },
];

/// Apply the fixed rule set to a trait/interpretation pair, in rule order.
pub fn recommendations_for(trait_name: &str, interpretation: &str) -> Vec<Recommendation> {
    RECOMMENDATION_RULES
        .iter()
        .filter(|rule| rule.trait_name == trait_name && interpretation.contains(rule.keyword))
        .map(|rule| Recommendation {
            kind: rule.kind,
            text: rule.text.to_string(),
            confidence: rule.confidence,
        })
        .collect()
}
