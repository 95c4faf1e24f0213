use paramtree_schema::{RecordRef, SchemaRef, Value};
use tracing::debug;

use super::{Forward, NodeId};
use crate::change::{Accepted, ChangeFn, EditMode};
use crate::error::TreeError;
use crate::tree::Tree;

/// Tree node owning one live record.
///
/// Every edit below this node, up to the next nested record, ends here: the
/// edited field is copied, the change is applied to the copy, and the full
/// candidate record (siblings untouched) goes to the validator. Only an
/// accepted candidate is written back, and only the one field.
#[derive(Debug, Clone)]
pub struct BoundaryNode {
    pub record: RecordRef,
    /// Declaration position of the field each child displays.
    pub slots: Vec<usize>,
}

impl BoundaryNode {
    pub fn new(record: RecordRef) -> Self {
        Self {
            record,
            slots: Vec::new(),
        }
    }

    pub fn schema(&self) -> SchemaRef {
        self.record.borrow().schema().clone()
    }

    /// Name of the record field `child` displays.
    pub fn field_name(&self, tree: &Tree, me: NodeId, child: NodeId) -> Result<String, TreeError> {
        let pos = tree.slot_of(me, child)?;
        let record = self.record.borrow();
        record
            .get_index(pos)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| missing_field(&record.schema().name, pos))
    }
}

fn missing_field(record: &str, pos: usize) -> TreeError {
    TreeError::lookup(format!("record `{record}` has no field at position {pos}"))
}

impl Forward for BoundaryNode {
    fn field_value(&self, tree: &Tree, me: NodeId, child: NodeId) -> Result<Value, TreeError> {
        let pos = tree.slot_of(me, child)?;
        let record = self.record.borrow();
        record
            .get_index(pos)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| missing_field(&record.schema().name, pos))
    }

    fn forward(
        &self,
        tree: &Tree,
        me: NodeId,
        child: NodeId,
        change: ChangeFn<'_>,
        mode: EditMode,
    ) -> Result<Accepted, TreeError> {
        let pos = tree.slot_of(me, child)?;
        let (schema, name, candidate) = {
            let record = self.record.borrow();
            let (name, current) = record
                .get_index(pos)
                .ok_or_else(|| missing_field(&record.schema().name, pos))?;
            let name = name.clone();
            let updated = change.apply(current.clone())?;
            let mut candidate = record.fields().clone();
            candidate.insert(name.clone(), updated);
            (record.schema().clone(), name, candidate)
        };

        let mut accepted = match tree.validator().validate(&schema, candidate) {
            Ok(accepted) => accepted,
            Err(source) => {
                debug!(record = %schema.name, field = %name, ?mode, error = %source, "edit rejected");
                return Err(TreeError::Validation {
                    record: schema.name.clone(),
                    source,
                });
            }
        };
        let value = accepted
            .swap_remove(&name)
            .ok_or_else(|| TreeError::lookup(format!("validator dropped field `{name}`")))?;

        if mode == EditMode::Commit {
            self.record.borrow_mut().assign(&name, value.clone());
        }
        debug!(record = %schema.name, field = %name, ?mode, "edit accepted");

        Ok(Accepted {
            boundary: Some(me),
            field: Some(name),
            value,
        })
    }

    fn nearest_boundary(&self, _tree: &Tree, me: NodeId) -> Option<NodeId> {
        Some(me)
    }
}
