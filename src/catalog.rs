use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AnalysisError, Result};
use crate::model::Severity;

// ---------------------------------------------------------------------------
// Rule definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct SubcategoryDef {
    pub category: &'static str,
    pub subcategory: &'static str,
    pub severity: Severity,
    pub explanation: &'static str,
    pub patterns: &'static [&'static str],
}

pub const BUILTIN_DEFS: &[SubcategoryDef] = &[
    // Manipulation
    SubcategoryDef {
        category: "manipulation",
        subcategory: "love_bombing",
        severity: Severity::High,
        explanation: "Love bombing - Excessive romantic declarations too early in conversation",
        patterns: &[
            r"\b(you['\s]re\s+perfect|soulmate|meant\s+to\s+be)\b",
            r"\b(love\s+you|my\s+everything)\b.*\b(day|week|hour)\b",
            r"\b(never\s+felt\s+this\s+way|you['\s]re\s+different)\b",
            r"\b(you['\s]re\s+special|not\s+like\s+other\s+girls)\b",
            r"\b(can['\s]t\s+live\s+without\s+you|need\s+you)\b",
            r"\b(you['\s]re\s+my\s+world|my\s+everything)\b",
            r"\b(destiny|fate|meant\s+to\s+be\s+together)\b",
        ],
    },
    SubcategoryDef {
        category: "manipulation",
        subcategory: "guilt_tripping",
        severity: Severity::High,
        explanation: "Guilt tripping - Attempting to manipulate through guilt and emotional pressure",
        patterns: &[
            r"\b(if\s+you\s+really\s+cared|you\s+don['\s]t\s+care)\b",
            r"\b(fine\s+whatever|forget\s+it\s+then)\b",
            r"\b(you['\s]re\s+being\s+mean|why\s+are\s+you\s+ignoring)\b",
            r"\b(i\s+thought\s+you\s+were\s+different|guess\s+i\s+was\s+wrong)\b",
        ],
    },
    SubcategoryDef {
        category: "manipulation",
        subcategory: "gaslighting",
        severity: Severity::High,
        explanation: "Gaslighting - Attempting to make you question your own reality or feelings",
        patterns: &[
            r"\b(you['\s]re\s+overreacting|being\s+dramatic)\b",
            r"\b(that\s+never\s+happened|you['\s]re\s+imagining)\b",
            r"\b(you['\s]re\s+too\s+sensitive|crazy)\b",
            r"\b(i\s+never\s+said\s+that|you\s+misunderstood)\b",
            r"\b(you['\s]re\s+being\s+paranoid|insecure)\b",
        ],
    },
    // Boundary violations
    SubcategoryDef {
        category: "boundary_violations",
        subcategory: "persistent_messaging",
        severity: Severity::Medium,
        explanation: "Persistent messaging - Not respecting communication boundaries",
        patterns: &[
            r"\b(hello\?+|hey\?+|respond\s+please)\b",
            r"\b(why\s+aren['\s]t\s+you\s+responding|answer\s+me)\b",
            r"\b(ignoring\s+me|reply\s+to\s+me)\b",
        ],
    },
    SubcategoryDef {
        category: "boundary_violations",
        subcategory: "sexual_content",
        severity: Severity::High,
        explanation: "Sexual pressure - Inappropriate sexual requests or comments",
        patterns: &[
            r"\b(send\s+pics|nudes|sexy\s+photo)\b",
            r"\b(what\s+are\s+you\s+wearing|bedroom|naked)\b",
            r"\b(show\s+me|let\s+me\s+see)\b.*\b(body|pics)\b",
            r"\b(you['\s]re\s+so\s+sexy|hot\s+body)\b",
            r"\b(turn\s+me\s+on|getting\s+hard)\b",
        ],
    },
    // Financial scams
    SubcategoryDef {
        category: "financial_scams",
        subcategory: "money_requests",
        severity: Severity::Critical,
        explanation: "Financial scam - Money request detected (major red flag)",
        patterns: &[
            r"\b(need\s+money|financial\s+help|emergency.*money)\b",
            r"\b(send\s+\$|venmo|cashapp|paypal|zelle)\b",
            r"\b(bitcoin|crypto|investment\s+opportunity)\b",
            r"\b(stranded|stuck|trapped).*\b(money|cash|help|funds)\b",
            r"\b(lend|loan|borrow).*\b(money|cash|\$)\b",
            r"\b(desperate|urgent|immediate).*\b(money|cash|help)\b",
            r"\b(wire\s+transfer|money\s+order|bank\s+transfer)\b",
        ],
    },
    SubcategoryDef {
        category: "financial_scams",
        subcategory: "sophisticated_scams",
        severity: Severity::Critical,
        explanation: "Sophisticated financial scam - Elaborate story with money request",
        patterns: &[
            r"\b(stranded|stuck|trapped|lost).*\b(island|country|airport|hotel)\b",
            r"\b(promise.*repay|guarantee.*return|pay.*back)\b",
            r"\b(temporary.*loan|short.*term|just.*until)\b",
            r"\b(trust.*me|you.*know.*me|good.*for.*it)\b.*\b(money|loan)\b",
            r"\b(family.*emergency|medical.*bill|travel.*problems)\b",
            r"\b(inheritance|lottery|prize).*\b(fee|tax|processing)\b",
        ],
    },
    // Controlling behavior
    SubcategoryDef {
        category: "controlling_behavior",
        subcategory: "personal_info",
        severity: Severity::High,
        explanation: "Personal information fishing - Requesting sensitive details too early",
        patterns: &[
            r"\b(what['\s]s\s+your\s+address|where\s+do\s+you\s+live)\b",
            r"\b(send\s+your\s+location|meet\s+me\s+now)\b",
            r"\b(give\s+me\s+your\s+number|what['\s]s\s+your\s+phone)\b",
            r"\b(where\s+do\s+you\s+work|what\s+school)\b",
        ],
    },
    SubcategoryDef {
        category: "controlling_behavior",
        subcategory: "isolation",
        severity: Severity::High,
        explanation: "Isolation tactics - Attempting to separate you from support network",
        patterns: &[
            r"\b(don['\s]t\s+tell\s+anyone|keep\s+this\s+between\s+us)\b",
            r"\b(your\s+friends\s+don['\s]t\s+understand|wouldn['\s]t\s+get\s+it)\b",
            r"\b(your\s+family\s+wouldn['\s]t\s+approve|won['\s]t\s+like)\b",
            r"\b(nobody\s+gets\s+us|they['\s]re\s+jealous)\b",
            r"\b(delete\s+this\s+conversation|clear\s+your\s+history)\b",
        ],
    },
    // Pressure tactics
    SubcategoryDef {
        category: "pressure_tactics",
        subcategory: "urgency",
        severity: Severity::Medium,
        explanation: "Pressure tactics - Creating false urgency to bypass rational thinking",
        patterns: &[
            r"\b(right\s+now|immediately|urgent|asap)\b",
            r"\b(can['\s]t\s+wait|need\s+to\s+know\s+now)\b",
            r"\b(limited\s+time|act\s+fast|hurry)\b",
            r"\b(before\s+it['\s]s\s+too\s+late|last\s+chance)\b",
            r"\b(decide\s+now|yes\s+or\s+no)\b",
        ],
    },
    // Aggressive language
    SubcategoryDef {
        category: "aggressive_language",
        subcategory: "threats",
        severity: Severity::Critical,
        explanation: "Direct threats - Aggressive or threatening language toward recipient",
        patterns: &[
            r"\b(you['\s]ll\s+regret|i['\s]ll\s+find\s+you)\b",
            r"\b(bitch|slut|whore|cunt)\b",
            r"\b(i['\s]ll\s+kill\s+you|i['\s]ll\s+hurt\s+you)\b",
            r"\b(you['\s]re\s+dead|i['\s]ll\s+destroy\s+you)\b",
            r"\b(watch\s+your\s+back|you['\s]ll\s+be\s+sorry)\b",
        ],
    },
];

// ---------------------------------------------------------------------------
// Compiled catalog
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Rule {
    pub source: &'static str,
    regex: Regex,
}

impl Rule {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[derive(Debug)]
pub struct Subcategory {
    pub category: &'static str,
    pub subcategory: &'static str,
    pub severity: Severity,
    pub explanation: &'static str,
    pub rules: Vec<Rule>,
}

impl Subcategory {
    // <category>_<subcategory>
    pub fn id(&self) -> String {
        format!("{}_{}", self.category, self.subcategory)
    }

    pub fn first_match(&self, text: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.is_match(text))
    }
}

#[derive(Debug)]
pub struct Catalog {
    subcategories: Vec<Subcategory>,
}

static BUILTIN: Lazy<std::result::Result<Catalog, AnalysisError>> =
    Lazy::new(|| Catalog::compile(BUILTIN_DEFS));

impl Catalog {
    pub fn compile(defs: &[SubcategoryDef]) -> Result<Self> {
        let subcategories = defs
            .iter()
            .map(|def| -> Result<Subcategory> {
                let rules = def
                    .patterns
                    .iter()
                    .map(|&source| {
                        Regex::new(&format!("(?i){source}"))
                            .map(|regex| Rule { source, regex })
                            .map_err(|e| AnalysisError::PatternCompile {
                                category: def.category,
                                subcategory: def.subcategory,
                                source: e,
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Subcategory {
                    category: def.category,
                    subcategory: def.subcategory,
                    severity: def.severity,
                    explanation: def.explanation,
                    rules,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { subcategories })
    }

    pub fn builtin() -> std::result::Result<&'static Catalog, &'static AnalysisError> {
        (*BUILTIN).as_ref()
    }

    pub fn subcategories(&self) -> &[Subcategory] {
        &self.subcategories
    }

    pub fn get(&self, category: &str, subcategory: &str) -> Option<&Subcategory> {
        self.subcategories
            .iter()
            .find(|s| s.category == category && s.subcategory == subcategory)
    }

    pub fn categories(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for sub in &self.subcategories {
            if !out.contains(&sub.category) {
                out.push(sub.category);
            }
        }
        out
    }

    pub fn subcategories_of<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Subcategory> + 'a {
        self.subcategories
            .iter()
            .filter(move |s| s.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_compiles() {
        let catalog = Catalog::builtin().expect("builtin catalog should compile");
        assert_eq!(catalog.subcategories().len(), BUILTIN_DEFS.len());
        assert_eq!(
            catalog.categories(),
            vec![
                "manipulation",
                "boundary_violations",
                "financial_scams",
                "controlling_behavior",
                "pressure_tactics",
                "aggressive_language",
            ]
        );
    }

    #[test]
    fn lookup_by_category_and_subcategory() {
        let catalog = Catalog::builtin().unwrap();
        let threats = catalog.get("aggressive_language", "threats").unwrap();
        assert_eq!(threats.severity, Severity::Critical);
        assert_eq!(threats.id(), "aggressive_language_threats");
        assert_eq!(catalog.subcategories_of("manipulation").count(), 3);
        assert!(catalog.get("manipulation", "flattery").is_none());
    }

    #[test]
    fn rules_are_case_insensitive() {
        let catalog = Catalog::builtin().unwrap();
        let money = catalog.get("financial_scams", "money_requests").unwrap();
        assert!(money.first_match("PAY ME ON VENMO").is_some());
        assert!(money.first_match("lovely weather today").is_none());
    }

    #[test]
    fn malformed_pattern_is_reported() {
        let defs = [SubcategoryDef {
            category: "broken",
            subcategory: "rule",
            severity: Severity::Low,
            explanation: "unbalanced group",
            patterns: &[r"(oops"],
        }];
        let err = Catalog::compile(&defs).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::PatternCompile {
                category: "broken",
                subcategory: "rule",
                ..
            }
        ));
    }
}
