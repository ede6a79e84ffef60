use std::any::Any;
use std::time::SystemTime;

use crate::api::{Binding, Primitive, Value};
use crate::convert::{format_time, parse_time, TimeLayout};
use crate::error::ValueError;

/// A flag that holds a single value of a [`Primitive`] type.
pub struct Scalar<T> {
    variable: Binding<T>,
}

impl<T> Scalar<T> {
    /// Create a scalar value over `variable`.
    pub fn new(variable: Binding<T>) -> Self {
        Self { variable }
    }
}

impl<T: Primitive> Value for Scalar<T> {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        let value = T::parse(raw)?;
        self.variable.replace(value);
        Ok(())
    }

    fn format(&self) -> String {
        self.variable.borrow().format()
    }

    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }

    fn get(&self) -> Option<Box<dyn Any>> {
        Some(Box::new(self.variable.get()))
    }
}

/// A boolean flag, satisfied by its presence alone.
///
/// Setting the empty string stores `true`.
pub struct Switch {
    variable: Binding<bool>,
}

impl Switch {
    /// Create a switch value over `variable`.
    pub fn new(variable: Binding<bool>) -> Self {
        Self { variable }
    }
}

impl Value for Switch {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        let value = if raw.is_empty() {
            true
        } else {
            bool::parse(raw)?
        };
        self.variable.replace(value);
        Ok(())
    }

    fn format(&self) -> String {
        self.variable.borrow().format()
    }

    fn type_name(&self) -> &str {
        bool::TYPE_NAME
    }

    fn is_bool_flag(&self) -> bool {
        true
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn get(&self) -> Option<Box<dyn Any>> {
        Some(Box::new(self.variable.get()))
    }
}

/// A flag counting its occurrences (ex: `-vvv`).
///
/// Setting the empty string increments; anything else is parsed as the new count.
pub struct Counter {
    variable: Binding<isize>,
}

impl Counter {
    /// Create a counter value over `variable`.
    pub fn new(variable: Binding<isize>) -> Self {
        Self { variable }
    }
}

impl Value for Counter {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        if raw.is_empty() {
            *self.variable.borrow_mut() += 1;
        } else {
            self.variable.replace(isize::parse(raw)?);
        }

        Ok(())
    }

    fn format(&self) -> String {
        self.variable.borrow().format()
    }

    fn type_name(&self) -> &str {
        "count"
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn get(&self) -> Option<Box<dyn Any>> {
        Some(Box::new(self.variable.get()))
    }
}

/// A flag that hands every occurrence to a closure instead of storing it.
pub struct Callback<F> {
    callback: F,
}

impl<F> Callback<F>
where
    F: FnMut(&str) -> Result<(), ValueError>,
{
    /// Create a callback value.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Value for Callback<F>
where
    F: FnMut(&str) -> Result<(), ValueError>,
{
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        (self.callback)(raw)
    }

    fn format(&self) -> String {
        String::default()
    }

    fn type_name(&self) -> &str {
        String::TYPE_NAME
    }
}

/// A timestamp flag accepting any of a list of layouts.
pub struct TimeField {
    variable: Binding<SystemTime>,
    layouts: Vec<TimeLayout>,
}

impl TimeField {
    /// Create a time value over `variable`, parsed with the first matching layout.
    pub fn new(variable: Binding<SystemTime>, layouts: Vec<TimeLayout>) -> Self {
        Self { variable, layouts }
    }
}

impl Value for TimeField {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        let value = parse_time(raw, &self.layouts)?;
        self.variable.replace(value);
        Ok(())
    }

    fn format(&self) -> String {
        format_time(&self.variable.borrow())
    }

    fn type_name(&self) -> &str {
        "time"
    }

    fn get(&self) -> Option<Box<dyn Any>> {
        Some(Box::new(self.variable.get()))
    }
}
