use serde::{Deserialize, Serialize};
use tessera_core::Field;

use crate::config::ConfigError;

/// Keywords that claim a header for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    pub field: Field,
    pub keywords: Vec<String>,
}

impl FieldRule {
    pub fn new(field: Field, keywords: &[&str]) -> Self {
        Self {
            field,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// `folded` must already be lower-cased.
    pub fn matches(&self, folded: &str) -> bool {
        self.keywords.iter().any(|k| folded.contains(k.as_str()))
    }
}

/// Header vocabulary used to find the header row and to suggest columns.
///
/// `field_rules` is an ordered list: when a header matches several rules the
/// earliest one claims it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalePack {
    pub name: String,
    pub header_keywords: Vec<String>,
    pub field_rules: Vec<FieldRule>,
}

impl Default for LocalePack {
    fn default() -> Self {
        Self::seed()
    }
}

impl LocalePack {
    /// Built-in Portuguese/Spanish/English vocabulary.
    pub fn seed() -> Self {
        let header_keywords = [
            "data", "date", "fecha", "dia", "day", "descri", "histor", "históric", "memo",
            "lançamento", "lancamento", "concepto", "debit", "débito", "debito", "credit",
            "crédito", "credito", "amount", "valor", "value", "montante", "importe",
        ];

        Self {
            name: "pt-es-en".to_string(),
            header_keywords: header_keywords.iter().map(|k| k.to_string()).collect(),
            field_rules: vec![
                FieldRule::new(Field::Date, &["data", "date", "fecha", "dia", "day"]),
                FieldRule::new(
                    Field::Description,
                    &[
                        "descri", "histor", "históric", "memo", "lançamento", "lancamento",
                        "concepto", "detalhe", "payee",
                    ],
                ),
                FieldRule::new(
                    Field::Debit,
                    &["débito", "debito", "debit", "saída", "saida", "withdrawal"],
                ),
                FieldRule::new(
                    Field::Credit,
                    &["crédito", "credito", "credit", "entrada", "deposit"],
                ),
                FieldRule::new(
                    Field::Amount,
                    &["valor", "amount", "value", "montante", "importe", "quantia"],
                ),
                FieldRule::new(Field::Category, &["categ", "category", "tipo"]),
            ],
        }
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let pack: LocalePack = toml::from_str(toml_content)?;
        pack.normalized()
    }

    /// Lower-cases every keyword and rejects packs that cannot match anything.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        if self.field_rules.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "locale pack '{}' has no field rules",
                self.name
            )));
        }
        for k in &mut self.header_keywords {
            *k = k.to_lowercase();
        }
        for rule in &mut self.field_rules {
            for k in &mut rule.keywords {
                *k = k.to_lowercase();
            }
            rule.keywords.retain(|k| !k.is_empty());
        }
        self.header_keywords.retain(|k| !k.is_empty());
        Ok(self)
    }

    /// True when the line mentions any header keyword (case-insensitive).
    pub fn is_header_candidate(&self, line: &str) -> bool {
        let folded = line.to_lowercase();
        self.header_keywords
            .iter()
            .any(|k| folded.contains(k.as_str()))
    }

    /// First rule in order whose keywords match `header`.
    pub fn classify(&self, header: &str) -> Option<Field> {
        let folded = header.to_lowercase();
        self.field_rules
            .iter()
            .find(|rule| rule.matches(&folded))
            .map(|rule| rule.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_rules_follow_priority_order() {
        let fields: Vec<Field> = LocalePack::seed().field_rules.iter().map(|r| r.field).collect();
        assert_eq!(fields, Field::PRIORITY.to_vec());
    }

    #[test]
    fn classify_is_case_insensitive() {
        let pack = LocalePack::seed();
        assert_eq!(pack.classify("DATA MOV"), Some(Field::Date));
        assert_eq!(pack.classify("Descrição"), Some(Field::Description));
        assert_eq!(pack.classify("DÉBITO"), Some(Field::Debit));
        assert_eq!(pack.classify("Crédito"), Some(Field::Credit));
        assert_eq!(pack.classify("Histórico"), Some(Field::Description));
        assert_eq!(pack.classify("Saldo"), None);
    }

    #[test]
    fn seed_vocabulary_is_the_documented_one() {
        let pack = LocalePack::seed();
        assert_eq!(pack.classify("Details"), None);
        assert_eq!(pack.classify("Detalhe"), Some(Field::Description));
        assert_eq!(pack.classify("Category"), Some(Field::Category));
        assert!(pack.is_header_candidate("Histórico;Valor"));
    }

    #[test]
    fn earlier_rule_wins_ambiguous_header() {
        let pack = LocalePack::seed();
        // Mentions both a date and an amount keyword.
        assert_eq!(pack.classify("Data Valor"), Some(Field::Date));
        // Debit is checked before the generic amount keywords.
        assert_eq!(pack.classify("Debit Amount"), Some(Field::Debit));
    }

    #[test]
    fn header_candidate_detection() {
        let pack = LocalePack::seed();
        assert!(pack.is_header_candidate("Transaction Date,Payee,Amount"));
        assert!(!pack.is_header_candidate("Account: 1234-5"));
    }

    #[test]
    fn from_toml_lowercases_keywords() {
        let toml = r#"
            name = "fr"
            header_keywords = ["Libellé", "Montant"]

            [[field_rules]]
            field = "description"
            keywords = ["LIBELLÉ"]

            [[field_rules]]
            field = "amount"
            keywords = ["Montant"]
        "#;
        let pack = LocalePack::from_toml(toml).unwrap();
        assert_eq!(pack.header_keywords, vec!["libellé", "montant"]);
        assert_eq!(pack.classify("Libellé opération"), Some(Field::Description));
        assert_eq!(pack.classify("MONTANT"), Some(Field::Amount));
    }

    #[test]
    fn from_toml_rejects_empty_rules() {
        let toml = r#"
            name = "empty"
            header_keywords = []
            field_rules = []
        "#;
        assert!(matches!(
            LocalePack::from_toml(toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn from_toml_reports_parse_errors() {
        assert!(matches!(
            LocalePack::from_toml("name = "),
            Err(ConfigError::Toml(_))
        ));
    }
}
