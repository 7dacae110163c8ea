//! Center resolution

use inspection_model::{CenterRecord, InspectionRecord};
use std::collections::HashMap;
use tracing::warn;

use crate::CenterMatching;

/// Lookup from inspections to the centers they were recorded at
pub struct CenterIndex<'a> {
    by_id: HashMap<&'a str, &'a CenterRecord>,
    /// `None` marks a name shared by several centers
    by_name: HashMap<&'a str, Option<&'a CenterRecord>>,
    matching: CenterMatching,
}

impl<'a> CenterIndex<'a> {
    /// Index a center list; on duplicate ids the first center wins
    pub fn new(centers: &'a [CenterRecord], matching: CenterMatching) -> Self {
        let mut by_id = HashMap::with_capacity(centers.len());
        let mut by_name: HashMap<&'a str, Option<&'a CenterRecord>> = HashMap::new();

        for center in centers {
            if by_id.contains_key(center.id.as_str()) {
                warn!("Duplicate center id {}, keeping first entry", center.id);
            } else {
                by_id.insert(center.id.as_str(), center);
            }

            by_name
                .entry(center.name.trim())
                .and_modify(|slot| *slot = None)
                .or_insert(Some(center));
        }

        Self {
            by_id,
            by_name,
            matching,
        }
    }

    /// Center an inspection belongs to.
    ///
    /// An inspection carrying a center id resolves by id only. Without one
    /// it resolves by name when name fallback is enabled and the name is
    /// unique.
    pub fn resolve(&self, inspection: &InspectionRecord) -> Option<&'a CenterRecord> {
        if let Some(id) = inspection.center_id.as_deref() {
            return self.by_id.get(id).copied();
        }

        match self.matching {
            CenterMatching::IdOnly => None,
            CenterMatching::IdThenName => {
                let name = inspection.center_name.as_deref()?.trim();
                match self.by_name.get(name) {
                    Some(Some(center)) => Some(*center),
                    Some(None) => {
                        warn!(
                            "Inspection {} names ambiguous center '{}', not resolving",
                            inspection.id, name
                        );
                        None
                    }
                    None => None,
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
