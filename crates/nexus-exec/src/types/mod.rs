//! Values, data types and schemas.
//!
//! `Value` is the closed runtime value domain. `DataType` names the declared
//! types and owns the conversion routines between them. `Schema` describes
//! the columns a plan node produces.

mod data_type;
mod schema;
mod value;

pub use data_type::*;
pub use schema::*;
pub use value::*;
