//! Language-keyed synonym tables for METEOR's second alignment pass.
//!
//! A table is immutable configuration: it is resolved once per language into
//! a [`SynonymMap`] and then only read.

use std::collections::{HashMap, HashSet};
use tracing::warn;
use translation_eval_core::{EngineConfig, SynonymGroups, DEFAULT_LANGUAGE};

const EN_GROUPS: &[&[&str]] = &[
    &["go", "walk", "move", "travel", "proceed"],
    &["say", "tell", "speak", "talk", "state", "declare"],
    &["think", "believe", "consider", "suppose", "assume"],
    &["know", "understand", "realize", "recognize", "comprehend"],
    &["big", "large", "huge", "enormous", "vast", "massive"],
    &["small", "little", "tiny", "minute", "compact"],
    &["good", "great", "excellent", "fine", "wonderful"],
    &["bad", "poor", "terrible", "awful", "horrible"],
    &["fast", "quick", "rapid", "swift", "speedy"],
    &["happy", "glad", "joyful", "pleased", "delighted"],
    &["important", "significant", "crucial", "vital", "essential"],
    &["difficult", "hard", "challenging", "tough", "complex"],
    &["easy", "simple", "straightforward", "effortless"],
];

const DE_GROUPS: &[&[&str]] = &[
    &["gehen", "laufen", "wandern", "schreiten"],
    &["sagen", "sprechen", "reden", "erzählen"],
    &["groß", "riesig", "enorm", "gewaltig"],
    &["klein", "winzig", "gering", "kompakt"],
    &["gut", "prima", "toll", "ausgezeichnet"],
    &["schlecht", "schlimm", "übel", "furchtbar"],
    &["schnell", "rasch", "zügig", "flott"],
];

const RU_GROUPS: &[&[&str]] = &[
    &["идти", "ходить", "шагать", "двигаться"],
    &["говорить", "сказать", "рассказать", "произнести"],
    &["большой", "крупный", "огромный", "громадный"],
    &["маленький", "небольшой", "мелкий", "крошечный"],
    &["хороший", "отличный", "прекрасный"],
    &["плохой", "скверный", "ужасный"],
    &["быстрый", "скорый", "стремительный"],
];

/// Symmetric word -> synonyms lookup. Every word maps to all members of
/// every group it belongs to, itself included.
#[derive(Debug, Clone, Default)]
pub struct SynonymMap {
    entries: HashMap<String, HashSet<String>>,
}

impl SynonymMap {
    pub fn from_groups(groups: &[Vec<String>]) -> Self {
        let mut entries: HashMap<String, HashSet<String>> = HashMap::new();

        for group in groups {
            let words: Vec<String> = group.iter().map(|w| w.to_lowercase()).collect();

            for word in &words {
                entries
                    .entry(word.clone())
                    .or_default()
                    .extend(words.iter().cloned());
            }
        }

        Self { entries }
    }

    /// Identical words are always synonyms.
    pub fn are_synonyms(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        self.entries
            .get(a)
            .is_some_and(|synonyms| synonyms.contains(b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SynonymTable {
    groups: SynonymGroups,
}

impl SynonymTable {
    pub fn new(groups: SynonymGroups) -> Self {
        let groups = groups
            .into_iter()
            .map(|(language, groups)| (language.to_lowercase(), groups))
            .collect();
        Self { groups }
    }

    /// Built-in English, German and Russian tables.
    pub fn builtin() -> Self {
        let to_owned = |groups: &[&[&str]]| -> Vec<Vec<String>> {
            groups
                .iter()
                .map(|group| group.iter().map(|w| w.to_string()).collect())
                .collect()
        };

        let mut groups = HashMap::new();
        groups.insert("en".to_string(), to_owned(EN_GROUPS));
        groups.insert("de".to_string(), to_owned(DE_GROUPS));
        groups.insert("ru".to_string(), to_owned(RU_GROUPS));
        Self { groups }
    }

    /// The configured override when present, the built-in tables otherwise.
    pub fn from_config(config: &EngineConfig) -> Self {
        match &config.synonyms {
            Some(groups) => Self::new(groups.clone()),
            None => Self::builtin(),
        }
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    /// Resolve the map for `language`, falling back to the default language
    /// and then to an empty map.
    pub fn resolve(&self, language: &str) -> SynonymMap {
        let language = language.trim().to_lowercase();

        if let Some(groups) = self.groups.get(&language) {
            return SynonymMap::from_groups(groups);
        }

        warn!(
            "No synonym table for language '{}', falling back to '{}'",
            language, DEFAULT_LANGUAGE
        );

        self.groups
            .get(DEFAULT_LANGUAGE)
            .map(|groups| SynonymMap::from_groups(groups))
            .unwrap_or_default()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_is_symmetric() {
        let map = SynonymTable::builtin().resolve("en");
        assert!(map.are_synonyms("big", "huge"));
        assert!(map.are_synonyms("huge", "big"));
        assert!(!map.are_synonyms("big", "small"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_default() {
        let table = SynonymTable::builtin();
        let map = table.resolve("fr");
        assert!(map.are_synonyms("fast", "quick"));
    }

    #[test]
    fn test_language_code_is_case_insensitive() {
        let map = SynonymTable::builtin().resolve("DE");
        assert!(map.are_synonyms("gut", "toll"));
    }

    #[test]
    fn test_override_without_default_yields_empty_map() {
        let mut groups = HashMap::new();
        groups.insert(
            "es".to_string(),
            vec![vec!["rápido".to_string(), "veloz".to_string()]],
        );
        let table = SynonymTable::new(groups);
        assert!(table.resolve("it").is_empty());
        assert!(table.resolve("es").are_synonyms("veloz", "rápido"));
    }
}
