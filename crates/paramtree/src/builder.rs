//! Tree builder: walks a value and the registry to produce a node tree
//! mirroring its shape.
//!
//! Dispatch order is record, list, dictionary, then primitive. Record fields
//! carry their declared type down, so leaves inside a record pick their
//! handler from the field table; everything else goes through the primitive
//! table.

use std::fmt;
use std::rc::Rc;

use paramtree_path::{Path, PathStep};
use paramtree_schema::{FieldDescriptor, FieldType, SchemaValidator, Validator, Value, ValueKind};
use tracing::{debug, trace, warn};

use crate::config::{TreeConfig, UnsupportedPolicy};
use crate::error::TreeError;
use crate::node::{BoundaryNode, ContainerKind, ContainerNode, LeafNode, Node, NodeId, NodeKind};
use crate::registry::Registry;
use crate::tree::Tree;

/// A value left out of the tree under [`UnsupportedPolicy::Skip`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedField {
    pub path: Path,
    pub kind: ValueKind,
}

/// Builds [`Tree`]s. Holds everything a tree needs besides the value, so one
/// builder can bind many values.
#[derive(Clone)]
pub struct TreeBuilder {
    registry: Registry,
    config: TreeConfig,
    validator: Rc<dyn Validator>,
}

impl fmt::Debug for TreeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Standard registry, default config, [`SchemaValidator`] with default
    /// options.
    pub fn new() -> Self {
        Self {
            registry: Registry::standard(),
            config: TreeConfig::default(),
            validator: Rc::new(SchemaValidator::default()),
        }
    }

    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Rc::new(validator);
        self
    }

    pub fn get_config(&self) -> &TreeConfig {
        &self.config
    }

    /// Build the node tree for `value`.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnsupportedType`] when a value matches no registry entry
    /// and the policy is [`UnsupportedPolicy::Abort`], or when the root
    /// itself is unsupported.
    pub fn build(&self, value: Value) -> Result<Tree, TreeError> {
        let mut nodes = Vec::new();
        let mut skipped = Vec::new();
        let root = Assembler::new(&self.registry, self.config.unsupported, &mut nodes, &mut skipped)
            .build(&value, self.config.root_name.clone(), None, Path::root(), None, None)?;
        let root = root.ok_or_else(|| TreeError::UnsupportedType {
            path: self.config.root_name.clone(),
            kind: value.kind(),
        })?;
        debug!(
            root = %self.config.root_name,
            nodes = nodes.len(),
            skipped = skipped.len(),
            "tree built"
        );
        Ok(Tree::from_parts(
            nodes,
            root,
            value,
            self.registry.clone(),
            self.validator.clone(),
            self.config.clone(),
            skipped,
        ))
    }
}

/// Recursive construction into an existing arena. Nodes are pushed but the
/// returned root is not attached to `parent`'s children; the caller decides
/// where it goes.
pub(crate) struct Assembler<'a> {
    registry: &'a Registry,
    policy: UnsupportedPolicy,
    nodes: &'a mut Vec<Option<Node>>,
    skipped: &'a mut Vec<SkippedField>,
}

impl<'a> Assembler<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        policy: UnsupportedPolicy,
        nodes: &'a mut Vec<Option<Node>>,
        skipped: &'a mut Vec<SkippedField>,
    ) -> Self {
        Self {
            registry,
            policy,
            nodes,
            skipped,
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, slot: usize) {
        if let Some(Some(node)) = self.nodes.get_mut(parent.index()) {
            node.children.push(child);
            if let Some(slots) = node.kind.slots_mut() {
                slots.push(slot);
            }
        }
    }

    /// Build the subtree for `value`. `declared` is the declared type when
    /// the value sits in a record field or a typed container, `field` the
    /// descriptor when it is a record field itself.
    pub(crate) fn build(
        &mut self,
        value: &Value,
        name: String,
        parent: Option<NodeId>,
        path: Path,
        declared: Option<&FieldType>,
        field: Option<&FieldDescriptor>,
    ) -> Result<Option<NodeId>, TreeError> {
        let description = field.and_then(|f| f.description.clone());
        match value {
            Value::Record(record) => {
                let (schema, fields) = {
                    let record = record.borrow();
                    (record.schema().clone(), record.fields().clone())
                };
                trace!(record = %schema.name, %path, "building boundary");
                let id = self.push(Node {
                    name,
                    description: description.or_else(|| schema.description.clone()),
                    typehint: schema.typehint(),
                    parent,
                    children: Vec::new(),
                    kind: NodeKind::Boundary(BoundaryNode::new(record.clone())),
                });
                for descriptor in &schema.fields {
                    let Some((pos, _, field_value)) = fields.get_full(&descriptor.name) else {
                        continue;
                    };
                    let child = self.build(
                        field_value,
                        descriptor.display_name().to_string(),
                        Some(id),
                        path.join(PathStep::Field(descriptor.name.clone())),
                        Some(&descriptor.type_),
                        Some(descriptor),
                    )?;
                    if let Some(child) = child {
                        self.attach(id, child, pos);
                    }
                }
                Ok(Some(id))
            }

            Value::List(items) => {
                let element = declared.and_then(|t| match t.unwrap_optional() {
                    FieldType::List { item, .. } => Some((**item).clone()),
                    _ => None,
                });
                let id = self.push(Node {
                    name: name.clone(),
                    description,
                    typehint: "<list>".to_string(),
                    parent,
                    children: Vec::new(),
                    kind: NodeKind::Container(ContainerNode::new(ContainerKind::List, element.clone())),
                });
                for (i, item) in items.iter().enumerate() {
                    let child = self.build(
                        item,
                        format!("{name}[{i}]"),
                        Some(id),
                        path.join(PathStep::Index(i)),
                        element.as_ref(),
                        None,
                    )?;
                    if let Some(child) = child {
                        self.attach(id, child, i);
                    }
                }
                Ok(Some(id))
            }

            Value::Dict(map) => {
                let element = declared.and_then(|t| match t.unwrap_optional() {
                    FieldType::Dict { value } => Some((**value).clone()),
                    _ => None,
                });
                let id = self.push(Node {
                    name: name.clone(),
                    description,
                    typehint: "<dict>".to_string(),
                    parent,
                    children: Vec::new(),
                    kind: NodeKind::Container(ContainerNode::new(ContainerKind::Dict, element.clone())),
                });
                for (i, (key, item)) in map.iter().enumerate() {
                    let child = self.build(
                        item,
                        format!("{name}[{key}]"),
                        Some(id),
                        path.join(PathStep::Key(key.clone())),
                        element.as_ref(),
                        None,
                    )?;
                    if let Some(child) = child {
                        self.attach(id, child, i);
                    }
                }
                Ok(Some(id))
            }

            primitive => {
                let handler = match declared {
                    Some(declared) => self.registry.field_handler(declared, primitive),
                    None => self.registry.primitive_handler(primitive.kind()),
                };
                let Some(handler) = handler else {
                    return self.unsupported(path, primitive.kind());
                };
                trace!(%path, kind = %handler.kind, "building leaf");
                let typehint = match field {
                    Some(field) => field.typehint(),
                    None => handler.kind.name().to_string(),
                };
                let id = self.push(Node {
                    name,
                    description,
                    typehint,
                    parent,
                    children: Vec::new(),
                    kind: NodeKind::Leaf(LeafNode::new(handler.clone(), primitive.clone())),
                });
                Ok(Some(id))
            }
        }
    }

    fn unsupported(&mut self, path: Path, kind: ValueKind) -> Result<Option<NodeId>, TreeError> {
        match self.policy {
            UnsupportedPolicy::Abort => Err(TreeError::UnsupportedType {
                path: path.to_string(),
                kind,
            }),
            UnsupportedPolicy::Skip => {
                warn!(%path, %kind, "no handler for value, leaving it out of the tree");
                self.skipped.push(SkippedField { path, kind });
                Ok(None)
            }
        }
    }
}
