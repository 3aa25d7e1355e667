//! Partition hit records by rule-set name

use crate::Error;
use hits_case::{EntityId, HitRecord};
use std::collections::BTreeMap;

/// One flagged item under one rule-set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub artifact_id: u64,
    pub file_id: EntityId,
}

/// A rule-set with its description and hits, borrowed from [`SetGroups`]
#[derive(Debug, Clone, Copy)]
pub struct SetGroup<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub hits: &'a [Hit],
}

/// Hit records grouped by rule-set name.
///
/// The first description seen for a name is kept. Hits keep record order
/// within their set; sets iterate in ascending name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetGroups {
    descriptions: BTreeMap<String, String>,
    hits: BTreeMap<String, Vec<Hit>>,
    malformed: Vec<u64>,
}

impl SetGroups {
    /// Group `records`. Records without a set-name attribute are skipped
    /// and remembered in [`SetGroups::malformed`].
    pub fn from_records(records: &[HitRecord]) -> Self {
        let mut groups = Self::default();
        for record in records {
            let mut found = false;
            for (name, description) in record.set_names() {
                found = true;
                groups
                    .descriptions
                    .entry(name.to_string())
                    .or_insert_with(|| description.to_string());
                groups.hits.entry(name.to_string()).or_default().push(Hit {
                    artifact_id: record.artifact_id,
                    file_id: record.file_id,
                });
            }
            if !found {
                let error = Error::MalformedHitRecord {
                    artifact_id: record.artifact_id,
                };
                tracing::warn!(file_id = record.file_id, %error, "skipping hit record");
                groups.malformed.push(record.artifact_id);
            }
        }
        groups
    }

    /// Number of distinct rule-sets
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.descriptions.get(name).map(String::as_str)
    }

    pub fn hits(&self, name: &str) -> &[Hit] {
        self.hits.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Artifact ids of skipped records
    pub fn malformed(&self) -> &[u64] {
        &self.malformed
    }

    /// Rule-sets in ascending name order
    pub fn iter(&self) -> impl Iterator<Item = SetGroup<'_>> {
        self.descriptions.iter().map(|(name, description)| SetGroup {
            name,
            description,
            hits: self.hits(name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hits_case::{AttributeKind, HitAttribute};
    use pretty_assertions::assert_eq;

    #[test]
    fn groups_by_name_in_ascending_order() {
        let records = vec![
            HitRecord::flagged(1, 10, "zeta", "last"),
            HitRecord::flagged(2, 11, "alpha", "first"),
            HitRecord::flagged(3, 12, "zeta", "last"),
        ];

        let groups = SetGroups::from_records(&records);

        let names: Vec<_> = groups.iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        let zeta: Vec<_> = groups.hits("zeta").iter().map(|h| h.file_id).collect();
        assert_eq!(zeta, vec![10, 12]);
    }

    #[test]
    fn first_description_wins() {
        let records = vec![
            HitRecord::flagged(1, 10, "docs", "Office documents"),
            HitRecord::flagged(2, 11, "docs", "Something else"),
        ];

        let groups = SetGroups::from_records(&records);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups.description("docs"), Some("Office documents"));
        assert_eq!(groups.hits("docs").len(), 2);
    }

    #[test]
    fn records_without_set_name_are_skipped() {
        let records = vec![
            HitRecord {
                artifact_id: 7,
                file_id: 70,
                attributes: vec![HitAttribute {
                    kind: AttributeKind::Other,
                    value: "x".into(),
                    context: String::new(),
                }],
            },
            HitRecord::flagged(8, 80, "docs", ""),
        ];

        let groups = SetGroups::from_records(&records);

        assert_eq!(groups.malformed(), &[7]);
        assert_eq!(groups.len(), 1);
        assert!(groups.iter().all(|g| g.hits.iter().all(|h| h.artifact_id != 7)));
    }

    #[test]
    fn record_with_two_set_names_lands_in_both() {
        let mut record = HitRecord::flagged(1, 10, "a", "A");
        record.attributes.push(HitAttribute {
            kind: AttributeKind::SetName,
            value: "b".into(),
            context: "B".into(),
        });

        let groups = SetGroups::from_records(&[record]);

        assert_eq!(groups.hits("a").len(), 1);
        assert_eq!(groups.hits("b").len(), 1);
    }

    #[test]
    fn no_records_no_groups() {
        let groups = SetGroups::from_records(&[]);
        assert!(groups.is_empty());
        assert_eq!(groups.iter().count(), 0);
        assert!(groups.hits("missing").is_empty());
    }
}
