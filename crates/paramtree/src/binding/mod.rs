//! Synchronization facade.
//!
//! A [`Binding`] owns the node tree for one top-level value, the display
//! controls attached to its leaves and the event listeners. Every edit runs
//! the same sequence: interpret the raw input, optionally propose, commit,
//! then either update the control and emit `ValueCommitted`, or emit a
//! rejection and (by default) put the authoritative value back on the
//! control. Validation always precedes mutation, so no observer can see a
//! partially applied edit.

mod control;
mod events;

use std::collections::BTreeMap;

use paramtree_path::PathStep;
use paramtree_schema::Value;
use tracing::debug;

pub use control::{DisplayControl, RawInput, TextControl};
pub use events::TreeEvent;

use crate::builder::TreeBuilder;
use crate::change::Accepted;
use crate::error::TreeError;
use crate::node::NodeId;
use crate::tree::Tree;

type Listener = Box<dyn FnMut(&TreeEvent)>;

pub struct Binding {
    builder: TreeBuilder,
    tree: Tree,
    controls: BTreeMap<NodeId, Box<dyn DisplayControl>>,
    next_listener_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

impl Binding {
    /// Build the tree for `value`.
    pub fn new(builder: TreeBuilder, value: Value) -> Result<Self, TreeError> {
        let tree = builder.build(value)?;
        Ok(Self {
            builder,
            tree,
            controls: BTreeMap::new(),
            next_listener_id: 0,
            listeners: BTreeMap::new(),
        })
    }

    /// Bind a different top-level value. The tree is rebuilt from scratch and
    /// attached controls are dropped, since their node ids are stale.
    /// Listeners stay subscribed. On error the previous binding is kept.
    pub fn bind(&mut self, value: Value) -> Result<(), TreeError> {
        self.tree = self.builder.build(value)?;
        self.controls.clear();
        debug!(nodes = self.tree.len(), "value rebound");
        Ok(())
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The bound value (records live, collections copied).
    pub fn value(&self) -> Value {
        self.tree.value()
    }

    pub fn on_event<F>(&mut self, listener: F) -> u64
    where
        F: FnMut(&TreeEvent) + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        self.listeners.insert(id, Box::new(listener));
        id
    }

    pub fn off_event(&mut self, listener_id: u64) -> bool {
        self.listeners.remove(&listener_id).is_some()
    }

    fn emit(&mut self, event: TreeEvent) {
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
    }

    /// Attach `control` to `leaf` and show the leaf's current value on it.
    pub fn attach_control(
        &mut self,
        leaf: NodeId,
        mut control: Box<dyn DisplayControl>,
    ) -> Result<(), TreeError> {
        let value = &self.tree.leaf(leaf)?.value;
        control.set_value(RawInput::from_value(value));
        self.controls.insert(leaf, control);
        Ok(())
    }

    pub fn detach_control(&mut self, leaf: NodeId) -> Option<Box<dyn DisplayControl>> {
        self.controls.remove(&leaf)
    }

    pub fn control(&self, leaf: NodeId) -> Option<&dyn DisplayControl> {
        self.controls.get(&leaf).map(|c| c.as_ref())
    }

    pub fn control_mut(&mut self, leaf: NodeId) -> Option<&mut (dyn DisplayControl + 'static)> {
        self.controls.get_mut(&leaf).map(|c| c.as_mut())
    }

    /// Show the leaf's authoritative value on its control, if it has one.
    fn redisplay(&mut self, leaf: NodeId) {
        let Ok(node) = self.tree.leaf(leaf) else { return };
        let raw = RawInput::from_value(&node.value);
        if let Some(control) = self.controls.get_mut(&leaf) {
            control.set_value(raw);
        }
    }

    fn interpreted(&mut self, leaf: NodeId, raw: &RawInput) -> Result<Value, TreeError> {
        match self.tree.interpret(leaf, raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!(node = %leaf, %raw, error = %err, "input rejected");
                if matches!(err, TreeError::Interpretation { .. }) {
                    self.emit(TreeEvent::InputRejected {
                        node: leaf,
                        raw: raw.clone(),
                        message: err.to_string(),
                    });
                    if self.tree.config().reset_on_reject {
                        self.redisplay(leaf);
                    }
                }
                Err(err)
            }
        }
    }

    fn rejected(&mut self, node: NodeId, err: TreeError) -> TreeError {
        if let Some(error) = err.validation_error() {
            let path = self.tree.path_of(node).unwrap_or_default();
            self.emit(TreeEvent::ValidationRejected {
                node,
                path,
                error: error.clone(),
            });
        }
        if self.tree.config().reset_on_reject {
            self.redisplay(node);
        }
        err
    }

    /// Apply raw input to `leaf`: interpret, propose (if configured), commit.
    ///
    /// # Errors
    ///
    /// [`TreeError::Interpretation`] if the input cannot be parsed, in which
    /// case nothing is proposed; [`TreeError::Validation`] if the owning
    /// record rejects the value. Either way the live object is unchanged.
    pub fn edit(&mut self, leaf: NodeId, raw: impl Into<RawInput>) -> Result<Accepted, TreeError> {
        let raw = raw.into();
        let value = self.interpreted(leaf, &raw)?;
        if self.tree.config().confirm_before_commit {
            if let Err(err) = self.tree.propose_self_change(leaf, value.clone()) {
                return Err(self.rejected(leaf, err));
            }
        }
        match self.tree.self_change(leaf, value) {
            Ok(accepted) => {
                self.redisplay(leaf);
                let value = self.tree.leaf(leaf)?.value.clone();
                let path = self.tree.path_of(leaf)?;
                self.emit(TreeEvent::ValueCommitted {
                    node: leaf,
                    path,
                    value,
                });
                Ok(accepted)
            }
            Err(err) => Err(self.rejected(leaf, err)),
        }
    }

    /// Interpret and propose without committing, for live previews. Emits no
    /// events and leaves the control alone.
    pub fn preview(
        &mut self,
        leaf: NodeId,
        raw: impl Into<RawInput>,
    ) -> Result<Accepted, TreeError> {
        let value = self.tree.interpret(leaf, &raw.into())?;
        self.tree.propose_self_change(leaf, value)
    }

    /// A control reported a final change.
    pub fn control_changed(&mut self, leaf: NodeId) -> Result<Accepted, TreeError> {
        let raw = self.control_input(leaf)?;
        self.edit(leaf, raw)
    }

    /// A control reported an intermediate change (slider drag).
    pub fn control_changing(&mut self, leaf: NodeId) -> Result<Accepted, TreeError> {
        let raw = self.control_input(leaf)?;
        self.preview(leaf, raw)
    }

    fn control_input(&self, leaf: NodeId) -> Result<RawInput, TreeError> {
        self.controls
            .get(&leaf)
            .map(|c| c.value())
            .ok_or_else(|| TreeError::lookup(format!("no control attached to {leaf}")))
    }

    /// Insert an element into a list or dictionary node.
    pub fn insert_element(
        &mut self,
        container: NodeId,
        at: PathStep,
        value: Value,
    ) -> Result<Option<NodeId>, TreeError> {
        if self.tree.config().confirm_before_commit {
            if let Err(err) = self.tree.propose_insert(container, at.clone(), value.clone()) {
                return Err(self.rejected(container, err));
            }
        }
        match self.tree.insert_element(container, at, value) {
            Ok(child) => {
                self.container_committed(container)?;
                Ok(child)
            }
            Err(err) => Err(self.rejected(container, err)),
        }
    }

    /// Remove an element from its list or dictionary. Its control, and the
    /// controls of anything below it, are dropped.
    pub fn remove_element(&mut self, element: NodeId) -> Result<Value, TreeError> {
        let parent = self
            .tree
            .node(element)?
            .parent
            .ok_or_else(|| TreeError::lookup("the root cannot be removed"))?;
        if self.tree.config().confirm_before_commit {
            if let Err(err) = self.tree.propose_remove(element) {
                return Err(self.rejected(parent, err));
            }
        }
        match self.tree.remove_element(element) {
            Ok(removed) => {
                let tree = &self.tree;
                self.controls.retain(|id, _| tree.get(*id).is_some());
                self.container_committed(parent)?;
                Ok(removed)
            }
            Err(err) => Err(self.rejected(parent, err)),
        }
    }

    fn container_committed(&mut self, container: NodeId) -> Result<(), TreeError> {
        let value = self.tree.field_value(container)?;
        let path = self.tree.path_of(container)?;
        self.emit(TreeEvent::ValueCommitted {
            node: container,
            path,
            value,
        });
        Ok(())
    }
}
