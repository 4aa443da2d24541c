//! Analysis record: the single mutable aggregate behind one metaphor analysis.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a characteristic row, unique within its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacteristicId(pub u64);

/// A literal trait of the vehicle and its counterpart on the tenor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    pub id: CharacteristicId,
    pub literal: String,
    pub mapped: String,
}

/// Top-level free-text fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    OriginalSentence,
    Tenor,
    Vehicle,
}

/// Editable columns of a characteristic row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacteristicField {
    Literal,
    Mapped,
}

/// The two plain string lists of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Challenges,
    Alternatives,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordFields")]
pub struct AnalysisRecord {
    pub original_sentence: String,
    pub tenor: String,
    pub vehicle: String,
    pub characteristics: Vec<Characteristic>,
    pub challenges: Vec<String>,
    pub alternatives: Vec<String>,
    /// Last id handed out; only ever increases.
    next_id: u64,
}

/// Wire shape of [`AnalysisRecord`]; the counter may be absent or stale.
#[derive(Deserialize)]
struct RecordFields {
    #[serde(default)]
    original_sentence: String,
    #[serde(default)]
    tenor: String,
    #[serde(default)]
    vehicle: String,
    #[serde(default)]
    characteristics: Vec<Characteristic>,
    #[serde(default)]
    challenges: Vec<String>,
    #[serde(default)]
    alternatives: Vec<String>,
    #[serde(default)]
    next_id: u64,
}

impl From<RecordFields> for AnalysisRecord {
    fn from(raw: RecordFields) -> Self {
        // Never reissue an id already present in the rows.
        let highest = raw.characteristics.iter().map(|c| c.id.0).max().unwrap_or(0);
        Self {
            original_sentence: raw.original_sentence,
            tenor: raw.tenor,
            vehicle: raw.vehicle,
            characteristics: raw.characteristics,
            challenges: raw.challenges,
            alternatives: raw.alternatives,
            next_id: raw.next_id.max(highest),
        }
    }
}

/// Partial update produced by the suggestion client.
///
/// Scalar fields replace, list fields append. `None` and empty strings leave
/// the record untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionPatch {
    pub tenor: Option<String>,
    pub vehicle: Option<String>,
    /// Literal traits; each becomes a new row with an empty mapping.
    pub characteristics: Vec<String>,
    /// Replacement `mapped` text for existing rows.
    pub mappings: Vec<(CharacteristicId, String)>,
    pub challenges: Vec<String>,
    pub alternatives: Vec<String>,
}

impl SuggestionPatch {
    pub fn is_empty(&self) -> bool {
        self.tenor.as_deref().is_none_or(str::is_empty)
            && self.vehicle.as_deref().is_none_or(str::is_empty)
            && self.characteristics.is_empty()
            && self.mappings.iter().all(|(_, text)| text.is_empty())
            && self.challenges.is_empty()
            && self.alternatives.is_empty()
    }
}

impl AnalysisRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fully populated record, e.g. for static example content.
    ///
    /// Characteristic ids are assigned in order starting at 1.
    pub fn from_parts(
        original_sentence: &str,
        tenor: &str,
        vehicle: &str,
        characteristics: &[(&str, &str)],
        challenges: &[&str],
        alternatives: &[&str],
    ) -> Self {
        let mut record = Self {
            original_sentence: original_sentence.to_string(),
            tenor: tenor.to_string(),
            vehicle: vehicle.to_string(),
            challenges: challenges.iter().map(|s| s.to_string()).collect(),
            alternatives: alternatives.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        };
        for (literal, mapped) in characteristics {
            record.push_characteristic(literal.to_string(), mapped.to_string());
        }
        record
    }

    pub fn field(&self, field: TextField) -> &str {
        match field {
            TextField::OriginalSentence => &self.original_sentence,
            TextField::Tenor => &self.tenor,
            TextField::Vehicle => &self.vehicle,
        }
    }

    pub fn set_field(&mut self, field: TextField, value: impl Into<String>) {
        let slot = match field {
            TextField::OriginalSentence => &mut self.original_sentence,
            TextField::Tenor => &mut self.tenor,
            TextField::Vehicle => &mut self.vehicle,
        };
        *slot = value.into();
    }

    pub fn characteristic(&self, id: CharacteristicId) -> Option<&Characteristic> {
        self.characteristics.iter().find(|c| c.id == id)
    }

    /// Appends an empty row and returns its id.
    pub fn add_characteristic(&mut self) -> CharacteristicId {
        self.push_characteristic(String::new(), String::new())
    }

    fn push_characteristic(&mut self, literal: String, mapped: String) -> CharacteristicId {
        self.next_id += 1;
        let id = CharacteristicId(self.next_id);
        self.characteristics.push(Characteristic {
            id,
            literal,
            mapped,
        });
        id
    }

    /// Replaces one column of the row with `id`. Unknown ids are ignored.
    pub fn update_characteristic(
        &mut self,
        id: CharacteristicId,
        field: CharacteristicField,
        value: impl Into<String>,
    ) {
        if let Some(entry) = self.characteristics.iter_mut().find(|c| c.id == id) {
            match field {
                CharacteristicField::Literal => entry.literal = value.into(),
                CharacteristicField::Mapped => entry.mapped = value.into(),
            }
        }
    }

    pub fn remove_characteristic(&mut self, id: CharacteristicId) {
        self.characteristics.retain(|c| c.id != id);
    }

    pub fn list(&self, list: ListKind) -> &[String] {
        match list {
            ListKind::Challenges => &self.challenges,
            ListKind::Alternatives => &self.alternatives,
        }
    }

    fn list_mut(&mut self, list: ListKind) -> &mut Vec<String> {
        match list {
            ListKind::Challenges => &mut self.challenges,
            ListKind::Alternatives => &mut self.alternatives,
        }
    }

    pub fn append_list_item(&mut self, list: ListKind) {
        self.list_mut(list).push(String::new());
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn update_list_item(&mut self, list: ListKind, index: usize, value: impl Into<String>) {
        self.list_mut(list)[index] = value.into();
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_list_item(&mut self, list: ListKind, index: usize) {
        self.list_mut(list).remove(index);
    }

    /// Folds a suggestion result into the record.
    ///
    /// `tenor`/`vehicle` and mappings are replaced, lists are appended.
    /// Empty results never overwrite what the user already typed.
    pub fn merge_suggestions(&mut self, patch: SuggestionPatch) {
        let SuggestionPatch {
            tenor,
            vehicle,
            characteristics,
            mappings,
            challenges,
            alternatives,
        } = patch;

        if let Some(tenor) = tenor.filter(|t| !t.is_empty()) {
            self.tenor = tenor;
        }
        if let Some(vehicle) = vehicle.filter(|v| !v.is_empty()) {
            self.vehicle = vehicle;
        }
        for literal in characteristics {
            self.push_characteristic(literal, String::new());
        }
        for (id, text) in mappings {
            if !text.is_empty() {
                self.update_characteristic(id, CharacteristicField::Mapped, text);
            }
        }
        self.challenges.extend(challenges);
        self.alternatives.extend(alternatives);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(record: &AnalysisRecord) -> Vec<&str> {
        record
            .characteristics
            .iter()
            .map(|c| c.literal.as_str())
            .collect()
    }

    #[test]
    fn test_new_record_is_empty() {
        let r = AnalysisRecord::new();
        assert_eq!(r.original_sentence, "");
        assert_eq!(r.tenor, "");
        assert_eq!(r.vehicle, "");
        assert!(r.characteristics.is_empty());
        assert!(r.challenges.is_empty());
        assert!(r.alternatives.is_empty());
    }

    #[test]
    fn test_add_characteristic_ids_are_fresh() {
        let mut r = AnalysisRecord::new();
        let mut seen = Vec::new();
        for n in 1..=20 {
            let before: Vec<_> = r.characteristics.iter().map(|c| c.id).collect();
            let id = r.add_characteristic();
            assert_eq!(r.characteristics.len(), before.len() + 1);
            assert!(!before.contains(&id));
            let last = r.characteristics.last().unwrap();
            assert_eq!(last.id, id);
            assert_eq!(last.literal, "");
            assert_eq!(last.mapped, "");
            seen.push(id);
            // Removing entries must not cause ids to be reissued
            if n % 3 == 0 {
                r.remove_characteristic(seen[0]);
            }
        }
        let mut dedup = seen.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), seen.len());
    }

    #[test]
    fn test_update_characteristic_only_touches_target() {
        let mut r = AnalysisRecord::from_parts(
            "",
            "",
            "",
            &[("a", "1"), ("b", "2"), ("c", "3")],
            &[],
            &[],
        );
        let before = r.clone();
        let target = r.characteristics[1].id;
        r.update_characteristic(target, CharacteristicField::Mapped, "two");

        assert_eq!(r.characteristics[0], before.characteristics[0]);
        assert_eq!(r.characteristics[2], before.characteristics[2]);
        assert_eq!(r.characteristics[1].literal, "b");
        assert_eq!(r.characteristics[1].mapped, "two");

        r.update_characteristic(target, CharacteristicField::Literal, "bee");
        assert_eq!(r.characteristics[1].literal, "bee");
        assert_eq!(r.characteristics[1].mapped, "two");
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut r = AnalysisRecord::from_parts("", "", "", &[("a", "1")], &[], &[]);
        let before = r.clone();
        r.update_characteristic(CharacteristicId(999), CharacteristicField::Literal, "x");
        assert_eq!(r, before);
    }

    #[test]
    fn test_remove_characteristic() {
        let mut r = AnalysisRecord::from_parts("", "", "", &[("a", ""), ("b", "")], &[], &[]);
        let id = r.characteristics[0].id;
        r.remove_characteristic(id);
        assert_eq!(r.characteristics.len(), 1);
        assert!(r.characteristic(id).is_none());

        r.remove_characteristic(id);
        assert_eq!(r.characteristics.len(), 1);
        assert_eq!(literals(&r), vec!["b"]);
    }

    #[test]
    fn test_list_items_by_position() {
        let mut r = AnalysisRecord::new();
        r.append_list_item(ListKind::Challenges);
        r.append_list_item(ListKind::Challenges);
        r.update_list_item(ListKind::Challenges, 1, "second");
        assert_eq!(r.challenges, vec!["".to_string(), "second".to_string()]);
        r.remove_list_item(ListKind::Challenges, 0);
        assert_eq!(r.challenges, vec!["second".to_string()]);
        assert!(r.alternatives.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_list_update_out_of_bounds_panics() {
        let mut r = AnalysisRecord::new();
        r.update_list_item(ListKind::Alternatives, 0, "nope");
    }

    #[test]
    fn test_merge_replaces_structure() {
        let mut r = AnalysisRecord::new();
        r.set_field(TextField::Tenor, "old tenor");
        r.set_field(TextField::Vehicle, "old vehicle");
        r.merge_suggestions(SuggestionPatch {
            tenor: Some("X".into()),
            vehicle: Some("Y".into()),
            ..Default::default()
        });
        assert_eq!(r.tenor, "X");
        assert_eq!(r.vehicle, "Y");
    }

    #[test]
    fn test_merge_appends_lists() {
        let mut r = AnalysisRecord::from_parts("", "", "", &[("c", "")], &["q1"], &["alt1"]);
        r.merge_suggestions(SuggestionPatch {
            characteristics: vec!["a".into(), "b".into()],
            challenges: vec!["q2".into()],
            alternatives: vec!["alt2".into(), "alt3".into()],
            ..Default::default()
        });
        assert_eq!(literals(&r), vec!["c", "a", "b"]);
        assert!(r.characteristics[1..].iter().all(|c| c.mapped.is_empty()));
        assert_eq!(r.challenges, vec!["q1", "q2"]);
        assert_eq!(r.alternatives, vec!["alt1", "alt2", "alt3"]);

        let ids: Vec<_> = r.characteristics.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids[0] != ids[1] && ids[1] != ids[2] && ids[0] != ids[2]);
    }

    #[test]
    fn test_merge_empty_results_keep_user_text() {
        let mut r = AnalysisRecord::from_parts(
            "Time is money.",
            "Time",
            "Money",
            &[("spendable", "hours run out")],
            &["q"],
            &[],
        );
        let before = r.clone();
        r.merge_suggestions(SuggestionPatch {
            tenor: Some(String::new()),
            vehicle: Some(String::new()),
            mappings: vec![(before.characteristics[0].id, String::new())],
            ..Default::default()
        });
        assert_eq!(r, before);

        r.merge_suggestions(SuggestionPatch::default());
        assert_eq!(r, before);
    }

    #[test]
    fn test_merge_mapping_targets_one_row() {
        let mut r = AnalysisRecord::from_parts("", "", "", &[("a", ""), ("b", "")], &[], &[]);
        let id = r.characteristics[1].id;
        r.merge_suggestions(SuggestionPatch {
            mappings: vec![(id, "mapped b".into()), (CharacteristicId(77), "ghost".into())],
            ..Default::default()
        });
        assert_eq!(r.characteristics[0].mapped, "");
        assert_eq!(r.characteristics[1].mapped, "mapped b");
        assert_eq!(r.characteristics.len(), 2);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(SuggestionPatch::default().is_empty());
        assert!(
            SuggestionPatch {
                tenor: Some(String::new()),
                ..Default::default()
            }
            .is_empty()
        );
        assert!(
            !SuggestionPatch {
                alternatives: vec!["x".into()],
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_record_serializes_to_json() {
        let r = AnalysisRecord::from_parts("s", "t", "v", &[("l", "m")], &[], &[]);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["tenor"], "t");
        assert_eq!(json["characteristics"][0]["id"], 1);
        assert_eq!(json["characteristics"][0]["literal"], "l");
    }

    #[test]
    fn test_deserialized_record_keeps_ids_fresh() {
        let json = serde_json::json!({
            "original_sentence": "Argument is war.",
            "tenor": "Argument",
            "vehicle": "War",
            "characteristics": [
                { "id": 1, "literal": "Has sides", "mapped": "" },
                { "id": 7, "literal": "Has winners", "mapped": "" }
            ],
            "challenges": [],
            "alternatives": []
        });
        let mut r: AnalysisRecord = serde_json::from_value(json).unwrap();
        let id = r.add_characteristic();
        assert_eq!(id, CharacteristicId(8));

        // A stale counter is pulled up to the highest row id
        let mut stale = serde_json::to_value(&r).unwrap();
        stale["next_id"] = serde_json::json!(2);
        let mut r: AnalysisRecord = serde_json::from_value(stale).unwrap();
        let id = r.add_characteristic();
        let ids: Vec<_> = r.characteristics.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![
            CharacteristicId(1),
            CharacteristicId(7),
            CharacteristicId(8),
            CharacteristicId(9)
        ]);
        assert_eq!(id, CharacteristicId(9));
    }

    #[test]
    fn test_record_json_round_trip_preserves_counter() {
        let mut r = AnalysisRecord::from_parts("s", "t", "v", &[("a", ""), ("b", "")], &[], &[]);
        let last = r.characteristics[1].id;
        r.remove_characteristic(last);
        let mut back: AnalysisRecord =
            serde_json::from_value(serde_json::to_value(&r).unwrap()).unwrap();
        assert_eq!(back, r);
        assert_ne!(back.add_characteristic(), last);
    }
}
