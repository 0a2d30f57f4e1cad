//! Translate a MongoDB oplog stream into relational SQL.
//!
//! The [`Translator`] consumes decoded oplog entries one at a time and
//! emits ordered batches of DDL/DML statements, inferring a relational
//! schema as documents are observed. Nested documents and arrays of
//! documents are split off into child tables linked back to the parent
//! row. [`pipeline::Pipeline`] wires a translator between a record
//! [`pipeline::Source`] and a statement [`pipeline::Sink`].
//!
//! ```
//! use oplog2sql_core::translator::Translator;
//!
//! let mut translator = Translator::new(Box::new(|| "id-1".to_owned()));
//! let batch = translator
//!     .process_batch(r#"[{"op":"d","ns":"app.users","o":{"_id":"u1"}}]"#)
//!     .unwrap();
//! assert_eq!(batch, ["DELETE FROM app.users WHERE _id = 'u1';"]);
//! ```

pub mod catalog;
pub mod error;
pub mod oplog;
pub mod pipeline;
pub mod sqlgen;
pub mod translator;

pub use translator::{IdGenerator, Translator};

pub mod prelude {
    pub use crate::error::{TranslateError, TranslateResult};
    pub use crate::oplog::{MatchKey, Namespace, Oplog};
    pub use crate::pipeline::{BoxError, Pipeline, PipelineError, Sink, Source};
    pub use crate::translator::{IdGenerator, Translator};
}
