use serde::Serialize;

use crate::model::{ObjectChangeKind, ObjectDelta};
use crate::utils::{is_dynamic_field, prettify_type};

/// Mutated objects listed before collapsing the rest into a count.
pub const MUTATED_PREVIEW_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRow {
    pub object_id: Option<String>,
    pub object_type: String,
    pub display: String,
}

impl ObjectRow {
    fn from_delta(delta: &ObjectDelta) -> Self {
        let object_type = delta.object_type.clone().unwrap_or_default();
        ObjectRow {
            object_id: delta.object_id.clone(),
            display: prettify_type(&object_type),
            object_type,
        }
    }
}

/// Object lifecycle changes split into what the user sees.
///
/// Mutated dynamic-field wrappers are not listed; they are counted in `hidden_low_level`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectSummary {
    pub created: Vec<ObjectRow>,
    pub mutated: Vec<ObjectRow>,
    /// Package ids of published packages.
    pub published: Vec<String>,
    pub hidden_low_level: usize,
    pub total_changes: usize,
}

impl ObjectSummary {
    pub fn from_changes(changes: &[ObjectDelta]) -> Self {
        let mut summary = ObjectSummary {
            total_changes: changes.len(),
            ..Default::default()
        };

        for delta in changes {
            match delta.kind {
                ObjectChangeKind::Created => summary.created.push(ObjectRow::from_delta(delta)),
                ObjectChangeKind::Mutated => {
                    if delta.object_type.as_deref().is_some_and(is_dynamic_field) {
                        summary.hidden_low_level += 1;
                    } else {
                        summary.mutated.push(ObjectRow::from_delta(delta));
                    }
                }
                ObjectChangeKind::Published => summary
                    .published
                    .push(delta.object_id.clone().unwrap_or_default()),
                ObjectChangeKind::Deleted
                | ObjectChangeKind::Wrapped
                | ObjectChangeKind::Transferred => {}
            }
        }

        summary
    }

    /// `None` when nothing was hidden.
    pub fn hidden_footnote(&self) -> Option<String> {
        match self.hidden_low_level {
            0 => None,
            1 => Some("+1 hidden low-level object (dynamic field)".to_string()),
            n => Some(format!("+{n} hidden low-level objects (dynamic fields)")),
        }
    }

    /// First mutated rows and the number left out.
    pub fn mutated_preview(&self) -> (&[ObjectRow], usize) {
        let shown = self.mutated.len().min(MUTATED_PREVIEW_LIMIT);
        (&self.mutated[..shown], self.mutated.len() - shown)
    }

    pub fn is_empty(&self) -> bool {
        self.total_changes == 0
    }
}
