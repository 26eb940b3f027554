use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;
use std::str::FromStr;

use crate::api::capture::*;
use crate::api::validate::Validate;
use crate::collection::Gatherable;
use crate::model::Arity;

/// A parameter field that takes a single value (precisely 1).
pub struct Value<'a, T> {
    variable: Rc<RefCell<&'a mut T>>,
}

impl<'a, T> OptionField for Value<'a, T> {}
impl<'a, T> ArgumentField for Value<'a, T> {}

impl<'a, T> Value<'a, T> {
    /// Create a single-value field.
    pub fn new(variable: &'a mut T) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
        }
    }
}

impl<'a, T> Capturable<'a, T> for Value<'a, T>
where
    T: FromStr,
{
    fn matched(&mut self) {
        // Do nothing.
    }

    fn capture(&mut self, token: &str) -> Result<(), CaptureError> {
        let value = T::from_str(token).map_err(|_| CaptureError::Conversion {
            token: token.to_string(),
            type_name: std::any::type_name::<T>(),
        })?;
        **self.variable.borrow_mut() = value;
        Ok(())
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(1)
    }
}

/// An option field that takes no values (precisely 0).
pub struct Toggle<'a, T> {
    variable: Rc<RefCell<&'a mut T>>,
    target: Option<T>,
}

impl<'a, T> OptionField for Toggle<'a, T> {}

impl<'a, T> Toggle<'a, T> {
    /// Create a toggle field; `target` is stored when the flag is matched.
    pub fn new(variable: &'a mut T, target: T) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
            target: Some(target),
        }
    }
}

impl<'a, T> Capturable<'a, T> for Toggle<'a, T> {
    fn matched(&mut self) {
        **self.variable.borrow_mut() = self
            .target
            .take()
            .expect("internal error - must be able to take the Toggle#target");
    }

    fn capture(&mut self, _token: &str) -> Result<(), CaptureError> {
        unreachable!("internal error - must not capture on a Toggle");
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(0)
    }
}

/// An option field that maps down to [`Option`], taking a single value (precisely 1).
pub struct OptValue<'a, T> {
    variable: Rc<RefCell<&'a mut Option<T>>>,
}

impl<'a, T> OptionField for OptValue<'a, T> {}

impl<'a, T> OptValue<'a, T> {
    /// Create an optional field.
    pub fn new(variable: &'a mut Option<T>) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
        }
    }
}

impl<'a, T> Capturable<'a, T> for OptValue<'a, T>
where
    T: FromStr,
{
    fn matched(&mut self) {
        // Do nothing.
    }

    fn capture(&mut self, token: &str) -> Result<(), CaptureError> {
        let value = T::from_str(token).map_err(|_| CaptureError::Conversion {
            token: token.to_string(),
            type_name: std::any::type_name::<T>(),
        })?;
        self.variable.borrow_mut().replace(value);
        Ok(())
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(1)
    }
}

/// A parameter field that takes multiple values (specifiable [`Arity`]).
pub struct Gather<'a, C, T>
where
    C: 'a + Gatherable<T>,
{
    variable: Rc<RefCell<&'a mut C>>,
    arity: Arity,
    _phantom: PhantomData<T>,
}

impl<'a, C, T> OptionField for Gather<'a, C, T> where C: 'a + Gatherable<T> {}
impl<'a, C, T> ArgumentField for Gather<'a, C, T> where C: 'a + Gatherable<T> {}

impl<'a, C, T> Gather<'a, C, T>
where
    C: 'a + Gatherable<T>,
{
    /// Create a gathering field.
    pub fn new(variable: &'a mut C, arity: Arity) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
            arity,
            _phantom: PhantomData,
        }
    }
}

impl<'a, C, T> Capturable<'a, T> for Gather<'a, C, T>
where
    T: FromStr,
    C: 'a + Gatherable<T>,
{
    fn matched(&mut self) {
        // Do nothing.
    }

    fn capture(&mut self, token: &str) -> Result<(), CaptureError> {
        let value = T::from_str(token).map_err(|_| CaptureError::Conversion {
            token: token.to_string(),
            type_name: std::any::type_name::<T>(),
        })?;
        (**self.variable.borrow_mut()).gather(value);
        Ok(())
    }

    fn arity(&self) -> Arity {
        self.arity
    }
}

/// A parameter field backed by a [`Validate`] implementation, taking a single value (precisely 1).
///
/// This is how the custom validators attach to a parameter: the validator converts and
/// constrains the raw token, and its message is surfaced verbatim on rejection.
///
/// ### Example
/// ```
/// use exarg::{BoundedInt, Checked, CommandParser, Param};
///
/// let mut threads: i64 = 1;
/// let parser = CommandParser::new("program")
///     .add(Param::option(
///         Checked::new(&mut threads, BoundedInt::new(1, 16).unwrap()),
///         "threads",
///         Some('t'),
///     ))
///     .build();
/// parser.parse_tokens(vec!["--threads", "8"].as_slice()).unwrap();
/// assert_eq!(threads, 8);
/// ```
pub struct Checked<'a, V>
where
    V: Validate,
{
    variable: Rc<RefCell<&'a mut V::Output>>,
    validator: V,
}

impl<'a, V: Validate> OptionField for Checked<'a, V> {}
impl<'a, V: Validate> ArgumentField for Checked<'a, V> {}

impl<'a, V> Checked<'a, V>
where
    V: Validate,
{
    /// Create a validator-backed field.
    pub fn new(variable: &'a mut V::Output, validator: V) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
            validator,
        }
    }
}

impl<'a, V> Capturable<'a, V::Output> for Checked<'a, V>
where
    V: Validate,
{
    fn matched(&mut self) {
        // Do nothing.
    }

    fn capture(&mut self, token: &str) -> Result<(), CaptureError> {
        let value = self
            .validator
            .validate(token)
            .map_err(|error| CaptureError::Rejected {
                message: error.to_string(),
            })?;
        **self.variable.borrow_mut() = value;
        Ok(())
    }

    fn arity(&self) -> Arity {
        Arity::Exactly(1)
    }
}
