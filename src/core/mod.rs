pub mod declaration;
pub mod destructor;
pub mod engine;
pub mod flatten;
pub mod header;
pub mod initializer;
pub mod lexer;
pub mod view;

pub use crate::domain::model::{ReshapeReport, SourceBundle};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
