//! Format interoperability for loom trees
//!
//!     A loom tree is a tree of generated-text branches: every node holds a piece of text and
//!     its children are the alternative continuations of that text. Different tools store such
//!     trees in different JSON shapes. This crate converts between them through one canonical
//!     in-memory tree, [`LoomTree`].
//!
//!     This is a pure lib: it powers loom-cli but is shell agnostic, so no code here reads
//!     files, env vars or writes to stdout. Logging goes through `tracing` and is silent unless
//!     the caller installs a subscriber.
//!
//! Architecture
//!
//!     Every format converts to and from [`LoomTree`] only; formats never talk to each other.
//!     Converting A to B is always parse(A) followed by serialize(B).
//!
//!     .
//!     ├── error.rs                # FormatError
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery, detection and conversion
//!     ├── transforms.rs           # functional helpers over the default registry
//!     ├── tree.rs                 # LoomTree, the canonical model
//!     └── formats
//!         ├── common              # JSON, options, ids and timestamps shared by formats
//!         ├── nested              # {root: {id, text, children}}
//!         ├── flatmap             # {nodes: {id: {text, parentId, ...}}}
//!         ├── graph               # {nodes: [...], edges: [...]}
//!         └── treeviz             # outline rendering, output only
//!
//! Formats
//!
//!     - nested: recursive objects. Lossless, the only exact round trip.
//!     - flatmap: a map of records linked by parentId. Ids are regenerated on encode.
//!     - graph: node and edge lists plus metadata. Ids are kept; edges are the source of truth.
//!     - treeviz: a human-readable outline for inspection.
//!
//!     Each external format is a set of serde record types, so field names and types are
//!     checked when a document is read instead of when a field is first touched.
//!
//! Errors
//!
//!     Anything wrong with an input document (bad JSON, missing field, dangling id, cycle)
//!     is a [`FormatError::MalformedInput`] naming the offending field or id. Conversions
//!     either succeed completely or return no output.
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod transforms;
pub mod tree;

pub use error::FormatError;
pub use format::Format;
pub use registry::FormatRegistry;
pub use tree::LoomTree;
