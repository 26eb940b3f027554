use thiserror::Error;

use crate::model::Arity;

/// Marker trait for field types that can formulate an option in the Cli.
pub trait OptionField {}

/// Marker trait for field types that can formulate an argument in the Cli.
pub trait ArgumentField {}

/// Behaviour to capture an explicit generic type T from an input `&str`.
///
/// We use this at the bottom of the command line parser object graph so the compiler can maintain each field's type.
#[doc(hidden)]
pub trait Capturable<'a, T> {
    /// Declare that the parameter has been matched.
    fn matched(&mut self);

    /// Capture a value into the generic type T for this parameter.
    fn capture(&mut self, token: &str) -> Result<(), CaptureError>;

    /// Get the `Arity` for this implementation.
    fn arity(&self) -> Arity;
}

#[derive(Debug, Error)]
#[doc(hidden)]
pub enum CaptureError {
    #[error("cannot convert '{token}' to {type_name}.")]
    Conversion {
        token: String,
        type_name: &'static str,
    },
    // Carries the validator's message verbatim; the Cli layer surfaces it to the user as-is.
    #[error("{message}")]
    Rejected { message: String },
}
