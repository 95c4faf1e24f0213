//! The node tree for one bound value.
//!
//! A [`Tree`] owns the node arena and the bound value. Edits enter through a
//! leaf ([`Tree::self_change`]) or a container ([`Tree::insert_element`],
//! [`Tree::remove_element`]) and travel upward through [`Forward`] until a
//! boundary node validates them. A bound list, dictionary or primitive has
//! no boundary above its root; edits reaching the root are written into the
//! bound value directly.

use std::cell::RefCell;
use std::fmt::{self, Write as _};
use std::rc::Rc;

use paramtree_path::{parse_pointer, Path, PathStep};
use paramtree_schema::{Validator, Value};
use tracing::debug;

use crate::binding::RawInput;
use crate::builder::{Assembler, SkippedField};
use crate::change::{Accepted, ChangeFn, EditMode};
use crate::config::TreeConfig;
use crate::error::TreeError;
use crate::node::{ContainerKind, Forward, LeafNode, Node, NodeId, NodeKind};
use crate::registry::Registry;

pub struct Tree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    value: RefCell<Value>,
    registry: Registry,
    validator: Rc<dyn Validator>,
    config: TreeConfig,
    skipped: Vec<SkippedField>,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("nodes", &self.len())
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}

/// Where a structural insert lands.
struct Insertion {
    change: ChangeFn<'static>,
    slot: usize,
    name: String,
    step: PathStep,
}

impl Tree {
    pub(crate) fn from_parts(
        nodes: Vec<Option<Node>>,
        root: NodeId,
        value: Value,
        registry: Registry,
        validator: Rc<dyn Validator>,
        config: TreeConfig,
        skipped: Vec<SkippedField>,
    ) -> Self {
        Self {
            nodes,
            root,
            value: RefCell::new(value),
            registry,
            validator,
            config,
            skipped,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Values left out of the tree while building.
    pub fn skipped(&self) -> &[SkippedField] {
        &self.skipped
    }

    /// Number of nodes currently in the tree.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bound value. Lists and dictionaries are copies; records are the
    /// live instances.
    pub fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.value.borrow().to_json()
    }

    pub(crate) fn validator(&self) -> &dyn Validator {
        self.validator.as_ref()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// # Errors
    ///
    /// [`TreeError::StructuralLookup`] for ids of removed nodes or ids from
    /// another tree.
    pub fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.get(id)
            .ok_or_else(|| TreeError::lookup(format!("node {id} is not in the tree")))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or_else(|| TreeError::lookup(format!("node {id} is not in the tree")))
    }

    pub fn leaf(&self, id: NodeId) -> Result<&LeafNode, TreeError> {
        let node = self.node(id)?;
        node.as_leaf()
            .ok_or_else(|| TreeError::NotALeaf(node.name.clone()))
    }

    /// Every leaf in pre-order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            if node.is_leaf() {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Value position `child` displays within `parent`'s value.
    pub(crate) fn slot_of(&self, parent: NodeId, child: NodeId) -> Result<usize, TreeError> {
        let node = self.node(parent)?;
        let pos = node
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| TreeError::lookup(format!("{child} is not a child of {parent}")))?;
        node.kind
            .slots()
            .get(pos)
            .copied()
            .ok_or_else(|| TreeError::lookup(format!("{parent} has no slot for child {pos}")))
    }

    /// Live value of node `id`, read through its parent.
    pub fn field_value(&self, id: NodeId) -> Result<Value, TreeError> {
        match self.node(id)?.parent {
            Some(parent) => self.node(parent)?.kind.field_value(self, parent, id),
            None => Ok(self.value()),
        }
    }

    /// Hand `change`, expressed against `id`'s value, to `id`'s parent.
    pub(crate) fn forward_from(
        &self,
        id: NodeId,
        change: ChangeFn<'_>,
        mode: EditMode,
    ) -> Result<Accepted, TreeError> {
        match self.node(id)?.parent {
            Some(parent) => self.node(parent)?.kind.forward(self, parent, id, change, mode),
            None => self.commit_root(change, mode),
        }
    }

    fn commit_root(&self, change: ChangeFn<'_>, mode: EditMode) -> Result<Accepted, TreeError> {
        let value = change.apply(self.value())?;
        if mode == EditMode::Commit {
            *self.value.borrow_mut() = value.clone();
        }
        debug!(?mode, "edit reached the schemaless root");
        Ok(Accepted {
            boundary: None,
            field: None,
            value,
        })
    }

    pub(crate) fn boundary_above(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent?;
        self.get(parent)?.kind.nearest_boundary(self, parent)
    }

    /// The boundary node whose record `id` belongs to, `id` itself for a
    /// boundary. `None` below a schemaless root.
    pub fn nearest_boundary(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.kind.nearest_boundary(self, id)
    }

    /// Parse raw input for `leaf`. Does not touch the bound value.
    pub fn interpret(&self, leaf: NodeId, raw: &RawInput) -> Result<Value, TreeError> {
        self.leaf(leaf)?.interpret(raw)
    }

    /// Dry run of `leaf` taking `value`. Never mutates.
    pub fn propose_self_change(&self, leaf: NodeId, value: Value) -> Result<Accepted, TreeError> {
        self.leaf(leaf)?;
        self.forward_from(leaf, ChangeFn::set(value), EditMode::Propose)
    }

    /// Commit `value` for `leaf`. On success the leaf's displayed value is
    /// re-read from the live record; on failure nothing changes.
    pub fn self_change(&mut self, leaf: NodeId, value: Value) -> Result<Accepted, TreeError> {
        self.leaf(leaf)?;
        let accepted = self.forward_from(leaf, ChangeFn::set(value), EditMode::Commit)?;
        self.refresh(leaf)?;
        Ok(accepted)
    }

    /// Re-read the displayed value of every leaf at or below `id`.
    pub fn refresh(&mut self, id: NodeId) -> Result<(), TreeError> {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            stack.extend(node.children.iter().copied());
            if node.is_leaf() {
                let current = self.field_value(id)?;
                if let NodeKind::Leaf(leaf) = &mut self.node_mut(id)?.kind {
                    leaf.value = current;
                }
            }
        }
        Ok(())
    }

    fn insertion(
        &self,
        container: NodeId,
        at: PathStep,
        value: Value,
    ) -> Result<Insertion, TreeError> {
        let node = self.node(container)?;
        let info = node
            .as_container()
            .ok_or_else(|| TreeError::NotAContainer(node.name.clone()))?;
        match (info.kind, at) {
            (ContainerKind::List, PathStep::Index(index)) => Ok(Insertion {
                change: ChangeFn::insert_at(index, value),
                slot: index,
                name: format!("{}[{index}]", node.name),
                step: PathStep::Index(index),
            }),
            (ContainerKind::Dict, PathStep::Key(key)) => {
                let len = self
                    .field_value(container)?
                    .as_dict()
                    .map_or(0, |map| map.len());
                Ok(Insertion {
                    change: ChangeFn::insert_key(key.clone(), value),
                    slot: len,
                    name: format!("{}[{key}]", node.name),
                    step: PathStep::Key(key),
                })
            }
            (kind, step) => Err(TreeError::lookup(format!(
                "cannot insert at `{step}` into a {kind:?} container"
            ))),
        }
    }

    /// Dry run of inserting `value` into `container`.
    pub fn propose_insert(
        &self,
        container: NodeId,
        at: PathStep,
        value: Value,
    ) -> Result<Accepted, TreeError> {
        let insertion = self.insertion(container, at, value)?;
        self.forward_from(container, insertion.change, EditMode::Propose)
    }

    /// Insert `value` into a list (`PathStep::Index`) or append a new key to
    /// a dictionary (`PathStep::Key`), validated by the owning record.
    ///
    /// Returns the new element's node, or `None` if the element was left out
    /// of the tree under the skip policy.
    pub fn insert_element(
        &mut self,
        container: NodeId,
        at: PathStep,
        value: Value,
    ) -> Result<Option<NodeId>, TreeError> {
        let element_type = self
            .node(container)?
            .as_container()
            .and_then(|c| c.element.clone());
        let built = value.clone();
        let insertion = self.insertion(container, at, value)?;
        let path = self.path_of(container)?.join(insertion.step);

        // Build before committing so an unsupported element never reaches
        // the live value; roll the arena back if anything fails.
        let mark = (self.nodes.len(), self.skipped.len());
        let child = Assembler::new(
            &self.registry,
            self.config.unsupported,
            &mut self.nodes,
            &mut self.skipped,
        )
        .build(
            &built,
            insertion.name,
            Some(container),
            path,
            element_type.as_ref(),
            None,
        );
        let child = match child {
            Ok(child) => child,
            Err(err) => {
                self.nodes.truncate(mark.0);
                self.skipped.truncate(mark.1);
                return Err(err);
            }
        };
        if let Err(err) = self.forward_from(container, insertion.change, EditMode::Commit) {
            self.nodes.truncate(mark.0);
            self.skipped.truncate(mark.1);
            return Err(err);
        }

        let slot = insertion.slot;
        let node = self.node_mut(container)?;
        let shifts = matches!(node.kind, NodeKind::Container(ref c) if c.kind == ContainerKind::List);
        if let Some(slots) = node.kind.slots_mut() {
            if shifts {
                for s in slots.iter_mut().filter(|s| **s >= slot) {
                    *s += 1;
                }
            }
            let pos = slots.iter().filter(|s| **s < slot).count();
            if let Some(child) = child {
                slots.insert(pos, slot);
                node.children.insert(pos, child);
            }
        }
        self.renumber(container)?;
        if let Some(child) = child {
            self.refresh(child)?;
        }
        debug!(container = %container, slot, "element inserted");
        Ok(child)
    }

    fn removal(&self, element: NodeId) -> Result<(NodeId, usize), TreeError> {
        let parent = self
            .node(element)?
            .parent
            .ok_or_else(|| TreeError::lookup("the root cannot be removed"))?;
        let node = self.node(parent)?;
        if node.as_container().is_none() {
            return Err(TreeError::NotAContainer(node.name.clone()));
        }
        Ok((parent, self.slot_of(parent, element)?))
    }

    /// Dry run of removing `element` from its list or dictionary.
    pub fn propose_remove(&self, element: NodeId) -> Result<Accepted, TreeError> {
        let (parent, slot) = self.removal(element)?;
        self.forward_from(parent, ChangeFn::remove_at(slot), EditMode::Propose)
    }

    /// Remove `element` from its list or dictionary, validated by the owning
    /// record. Returns the removed value. The element's nodes leave the tree.
    pub fn remove_element(&mut self, element: NodeId) -> Result<Value, TreeError> {
        let (parent, slot) = self.removal(element)?;
        let removed = self.field_value(element)?;
        self.forward_from(parent, ChangeFn::remove_at(slot), EditMode::Commit)?;

        let node = self.node_mut(parent)?;
        if let Some(pos) = node.children.iter().position(|c| *c == element) {
            node.children.remove(pos);
            if let Some(slots) = node.kind.slots_mut() {
                slots.remove(pos);
                for s in slots.iter_mut().filter(|s| **s > slot) {
                    *s -= 1;
                }
            }
        }
        self.discard(element);
        self.renumber(parent)?;
        debug!(container = %parent, slot, "element removed");
        Ok(removed)
    }

    /// Clear the slots of `id` and its descendants.
    ///
    /// Slots are emptied, never compacted or reused: a removed id stays
    /// dead and the arena only grows for the lifetime of the tree.
    /// `Binding::bind` starts over with a fresh arena.
    fn discard(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(id.index()).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
    }

    /// Rename list elements after their positions moved.
    fn renumber(&mut self, container: NodeId) -> Result<(), TreeError> {
        let node = self.node(container)?;
        if !matches!(node.kind, NodeKind::Container(ref c) if c.kind == ContainerKind::List) {
            return Ok(());
        }
        let renames: Vec<(NodeId, String)> = node
            .children
            .iter()
            .zip(node.kind.slots())
            .map(|(child, slot)| (*child, format!("{}[{slot}]", node.name)))
            .collect();
        for (child, name) in renames {
            self.node_mut(child)?.name = name;
        }
        Ok(())
    }

    /// Path step from `parent` to `child`.
    pub fn step_of(&self, parent: NodeId, child: NodeId) -> Result<PathStep, TreeError> {
        let slot = self.slot_of(parent, child)?;
        let node = self.node(parent)?;
        match &node.kind {
            NodeKind::Boundary(boundary) => boundary
                .field_name(self, parent, child)
                .map(PathStep::Field),
            NodeKind::Container(container) => match container.kind {
                ContainerKind::List => Ok(PathStep::Index(slot)),
                ContainerKind::Dict => self
                    .field_value(parent)?
                    .as_dict()
                    .and_then(|map| map.get_index(slot))
                    .map(|(key, _)| PathStep::Key(key.clone()))
                    .ok_or_else(|| TreeError::lookup(format!("no dictionary key at {slot}"))),
            },
            NodeKind::Leaf(_) => Err(TreeError::NotAContainer(node.name.clone())),
        }
    }

    /// Current path of `id` from the root.
    pub fn path_of(&self, id: NodeId) -> Result<Path, TreeError> {
        let mut steps = Vec::new();
        let mut current = id;
        while let Some(parent) = self.node(current)?.parent {
            steps.push(self.step_of(parent, current)?);
            current = parent;
        }
        steps.reverse();
        Ok(Path::from(steps))
    }

    /// Resolve a pointer such as `/cars/0/price` to a node. Record fields
    /// match by name or alias.
    pub fn find(&self, pointer: &str) -> Result<NodeId, TreeError> {
        let components = parse_pointer(pointer)?;
        let mut current = self.root;
        for component in &components {
            let node = self.node(current)?;
            let is_record = node.as_boundary().is_some();
            let mut next = None;
            for &child in &node.children {
                let by_alias = is_record && self.node(child)?.name == *component;
                if by_alias || self.step_of(current, child)?.matches(component) {
                    next = Some(child);
                    break;
                }
            }
            current = next.ok_or_else(|| TreeError::NodeNotFound(pointer.to_string()))?;
        }
        Ok(current)
    }

    /// Indented listing of the tree: name, value, type hint, description.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            let _ = write!(out, "{:indent$}{}", "", node.name, indent = depth * 2);
            if let Some(leaf) = node.as_leaf() {
                let _ = write!(out, " = {}", leaf.value.render());
            }
            let _ = write!(out, "  {}", node.typehint);
            if let Some(description) = &node.description {
                let _ = write!(out, "  # {description}");
            }
            out.push('\n');
            stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
        }
        out
    }
}
