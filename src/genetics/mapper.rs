use std::collections::HashSet;

use super::parser::GenotypeRecord;
use super::reference::{lookup_snp, recommendations_for};
use super::{Confidence, TraitInterpretation};

/// Map validated rows to trait interpretations in input order.
///
/// A row carrying its own trait/interpretation pair is taken as-is. Other
/// rows go through the SNP reference table. Only the first interpretation
/// per trait name is kept.
pub fn map_traits<'a, I>(rows: I) -> Vec<TraitInterpretation>
where
    I: IntoIterator<Item = &'a GenotypeRecord>,
{
    let mut traits = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for row in rows {
        if let Some((trait_name, interpretation)) = row.user_trait() {
            if seen.insert(trait_name.to_string()) {
                traits.push(interpret(&row.rsid, trait_name, interpretation, Confidence::UserProvided));
            }
            continue;
        }

        let Some(snp) = lookup_snp(&row.rsid) else {
            continue;
        };
        if row.genotype.is_empty() {
            continue;
        }

        if let Some(interpretation) = snp.interpret(&row.genotype) {
            if seen.insert(snp.trait_name.to_string()) {
                traits.push(interpret(&row.rsid, snp.trait_name, interpretation, Confidence::Moderate));
            }
        }
    }

    traits
}

fn interpret(rsid: &str, trait_name: &str, interpretation: &str, confidence: Confidence) -> TraitInterpretation {
    TraitInterpretation {
        trait_name: trait_name.to_string(),
        supporting_snps: vec![rsid.to_string()],
        interpretation: interpretation.to_string(),
        recommendations: recommendations_for(trait_name, interpretation),
        confidence,
    }
}
