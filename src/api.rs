mod capture;
mod core;
mod field;
mod parameter;
mod validate;

pub use self::core::*;
pub use capture::*;
pub use field::*;
pub use parameter::Param;
pub use validate::*;

pub(crate) use parameter::FieldBox;
