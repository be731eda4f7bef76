//! Target-market conventions injected into the rewrite prompt.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetRegion {
    #[default]
    International,
    Germany,
    Dubai,
    Uk,
    Usa,
}

impl TargetRegion {
    /// Unknown or empty names fall back to `International`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "germany" | "de" => TargetRegion::Germany,
            "dubai" | "uae" => TargetRegion::Dubai,
            "uk" | "united kingdom" => TargetRegion::Uk,
            "usa" | "us" => TargetRegion::Usa,
            _ => TargetRegion::International,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetRegion::International => "international",
            TargetRegion::Germany => "germany",
            TargetRegion::Dubai => "dubai",
            TargetRegion::Uk => "uk",
            TargetRegion::Usa => "usa",
        }
    }

    /// Prompt section describing the market's résumé conventions.
    pub fn instructions(&self) -> &'static str {
        match self {
            TargetRegion::Germany => GERMANY,
            TargetRegion::Dubai => DUBAI,
            TargetRegion::Uk => UK,
            TargetRegion::Usa => USA,
            TargetRegion::International => INTERNATIONAL,
        }
    }
}

impl<'de> Deserialize<'de> for TargetRegion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(TargetRegion::parse(&name))
    }
}

const GERMANY: &str = "\
REGION: GERMANY (Lebenslauf)
- Tone: factual, formal, results-oriented. No sales language.
- `basics` MUST include birth_date (YYYY-MM-DD), nationality, full address and marital_status.
- Add `picture: \"path/to/photo.jpg\"` to `basics`.
- Open with a 3-4 sentence Kurzprofil: core stack, years of experience, one major achievement.
- Detailed skills matrix grouped by category (Languages, Cloud/DevOps, Databases) with proficiency.
- Languages on the CEFR scale, e.g. \"German (A2 - Basic)\".
- List certifications with acquisition dates.
- Add a `signature` section containing \"[City, Date]\".
- Dates in ISO 8601 YYYY-MM-DD.";

const DUBAI: &str = "\
REGION: DUBAI / UAE
- Strictly professional English.
- `basics` MUST include nationality, visa_status, marital_status and date_of_birth (YYYY-MM-DD).
- Add `picture: \"path/to/photo.jpg\"` to `basics`.
- Open with a 3-4 line professional summary.
- Reverse-chronological experience; first bullet may describe the company in one line.
- Bullets focus on quantified achievements, not duties.
- Highlight degrees and relevant certifications; list spoken languages.
- Dates in ISO 8601 YYYY-MM-DD.";

const UK: &str = "\
REGION: UNITED KINGDOM
- Reverse-chronological, emphasise the last 10-15 years.
- Header: name, title, mobile, email, city and postcode only, LinkedIn.
- 3-5 line personal statement with years of experience and one quantified highlight.
- 6-10 key skills split into hard and soft skills.
- British spelling (optimised, organised, programme, centre).
- NO photo, date of birth, marital status, nationality or full address.
- Add a `references` section with \"References available upon request\".
- Dates in ISO 8601 YYYY-MM-DD.";

const USA: &str = "\
REGION: UNITED STATES
- Reverse-chronological, single column, no tables.
- Header: name, phone, email, city and state, LinkedIn, GitHub or portfolio.
- 2-4 sentence summary: years of experience, core stack, one major achievement.
- Categorised technical skills.
- Accomplishments over duties: \"Accomplished [X] as measured by [Y], by doing [Z]\".
- Quantify with percentages, money and user numbers.
- NO age, date_of_birth, marital_status, religion, gender or picture.
- American spelling (optimized, center, program).
- Dates in ISO 8601 YYYY-MM-DD.";

const INTERNATIONAL: &str = "\
REGION: INTERNATIONAL
- Standard ATS-friendly conventions.
- Clear action verbs and quantified achievements.
- Neutral professional English, consistent spelling.
- Dates in ISO 8601 YYYY-MM-DD.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_regions() {
        assert_eq!(TargetRegion::parse("germany"), TargetRegion::Germany);
        assert_eq!(TargetRegion::parse(" UK "), TargetRegion::Uk);
        assert_eq!(TargetRegion::parse("USA"), TargetRegion::Usa);
        assert_eq!(TargetRegion::parse("dubai"), TargetRegion::Dubai);
    }

    #[test]
    fn test_unknown_region_falls_back_to_international() {
        assert_eq!(TargetRegion::parse("mars"), TargetRegion::International);
        assert_eq!(TargetRegion::parse(""), TargetRegion::International);
    }

    #[test]
    fn test_deserializes_from_plain_string() {
        let region: TargetRegion = serde_json::from_str("\"germany\"").unwrap();
        assert_eq!(region, TargetRegion::Germany);
        let region: TargetRegion = serde_json::from_str("\"atlantis\"").unwrap();
        assert_eq!(region, TargetRegion::International);
    }

    #[test]
    fn test_uk_instructions_request_references_section() {
        assert!(TargetRegion::Uk.instructions().contains("references"));
        assert!(TargetRegion::Germany.instructions().contains("signature"));
    }
}
