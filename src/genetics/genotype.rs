use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref GENOTYPE_PATTERN: Regex = Regex::new(r"^[ATCG]{2}$").expect("valid genotype pattern");
    static ref ALLELE_PATTERN: Regex = Regex::new(r"[ATCG]").expect("valid allele pattern");
}

/// Normalize a raw genotype cell into a two-letter nucleotide code.
///
/// Separators (`/` and `|`) are stripped and the value upper-cased. A lone
/// allele is doubled to form a homozygous call. Anything that does not end
/// up as exactly two letters from {A,T,C,G} normalizes to an empty string.
pub fn normalize_genotype(genotype: &str) -> String {
    if genotype.is_empty() {
        return String::new();
    }

    let mut normalized: String = genotype
        .chars()
        .filter(|c| *c != '/' && *c != '|')
        .collect::<String>()
        .to_uppercase()
        .trim()
        .to_string();

    if normalized.chars().count() == 1 && ALLELE_PATTERN.is_match(&normalized) {
        normalized = normalized.repeat(2);
    }

    if !is_valid_genotype(&normalized) {
        return String::new();
    }

    normalized
}

pub fn is_valid_genotype(genotype: &str) -> bool {
    GENOTYPE_PATTERN.is_match(genotype)
}
