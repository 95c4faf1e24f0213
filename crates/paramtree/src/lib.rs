//! `paramtree` — editable trees over schema-bearing records.
//!
//! A bound value (a record, list, dictionary or primitive) is mirrored by a
//! tree of nodes. Leaves originate edits as change functions; containers
//! compose and forward them; the boundary node owning the nearest record
//! validates the full candidate record and only then writes the one changed
//! field. A rejected edit leaves the live object untouched.
//!
//! # Example
//!
//! ```
//! use paramtree::{Binding, TreeBuilder};
//! use paramtree_schema::{instantiate, FieldType, NumSchema, RecordSchema, Value};
//!
//! let car = RecordSchema::builder("Car")
//!     .field("price", FieldType::Float(NumSchema::new().gt(0.0).lt(100000.0)), Value::Float(3000.1))
//!     .build();
//! let record = instantiate(&car, Vec::<(String, Value)>::new()).unwrap();
//! let mut binding = Binding::new(TreeBuilder::new(), Value::Record(record.clone())).unwrap();
//!
//! let price = binding.tree().find("/price").unwrap();
//! binding.edit(price, "420").unwrap();
//! assert_eq!(record.borrow().get("price"), Some(&Value::Float(420.0)));
//!
//! assert!(binding.edit(price, "-5").is_err());
//! assert_eq!(record.borrow().get("price"), Some(&Value::Float(420.0)));
//! ```

pub mod binding;
pub mod builder;
pub mod change;
pub mod config;
pub mod error;
pub mod node;
pub mod registry;
pub mod tree;

pub use binding::{Binding, DisplayControl, RawInput, TextControl, TreeEvent};
pub use builder::{SkippedField, TreeBuilder};
pub use change::{Accepted, ChangeFn, EditMode};
pub use config::{ConfigError, TreeConfig, UnsupportedPolicy};
pub use error::TreeError;
pub use node::{
    BoundaryNode, ContainerKind, ContainerNode, Forward, LeafNode, Node, NodeId, NodeKind,
};
pub use registry::{LeafHandler, LeafKind, Registry, WidgetHint};
pub use tree::Tree;
