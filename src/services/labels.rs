// Label Mapping
// Translates raw classifier label codes into stable display labels

pub const HUMAN_LABEL: &str = "Human";
pub const AI_LABEL: &str = "AI";

/// Immutable code -> label table. Unknown codes resolve to themselves.
#[derive(Debug, Clone, Copy)]
pub struct LabelTable {
    entries: &'static [(&'static str, &'static str)],
}

impl LabelTable {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, code: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == code)
            .map(|(_, v)| *v)
    }

    pub fn resolve(&self, code: &str) -> String {
        match self.lookup(code) {
            Some(label) => label.to_string(),
            None => code.to_string(),
        }
    }
}

pub static ORIGIN_LABELS: LabelTable =
    LabelTable::new(&[("LABEL_0", HUMAN_LABEL), ("LABEL_1", AI_LABEL)]);

pub static MODEL_FAMILY_LABELS: LabelTable = LabelTable::new(&[
    ("LABEL_0", "Gemini 1.x Family"),
    ("LABEL_1", "Gemini 2.x Family"),
    ("LABEL_2", "GPT Family"),
    ("LABEL_3", "Llama 3.x Family"),
]);

pub fn map_origin_label(code: &str) -> String {
    ORIGIN_LABELS.resolve(code)
}

pub fn map_model_family_label(code: &str) -> String {
    MODEL_FAMILY_LABELS.resolve(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_codes() {
        assert_eq!(map_origin_label("LABEL_0"), "Human");
        assert_eq!(map_origin_label("LABEL_1"), "AI");
        assert_eq!(ORIGIN_LABELS.lookup("LABEL_2"), None);
    }

    #[test]
    fn test_model_family_codes() {
        assert_eq!(map_model_family_label("LABEL_2"), "GPT Family");
        assert_eq!(map_model_family_label("LABEL_3"), "Llama 3.x Family");
        assert_eq!(map_model_family_label("LABEL_0"), "Gemini 1.x Family");
        assert_eq!(map_model_family_label("LABEL_1"), "Gemini 2.x Family");
        assert_eq!(MODEL_FAMILY_LABELS.lookup("LABEL_4"), None);
    }

    #[test]
    fn test_unknown_code_passes_through() {
        assert_eq!(map_origin_label("LABEL_9"), "LABEL_9");
        assert_eq!(map_model_family_label("LABEL_9"), "LABEL_9");
        assert_eq!(map_model_family_label(""), "");
    }

    #[test]
    fn test_tables_are_independent() {
        assert_ne!(map_origin_label("LABEL_0"), map_model_family_label("LABEL_0"));
    }
}
