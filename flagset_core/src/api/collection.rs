use std::any::Any;
use std::collections::BTreeMap;

use crate::api::{Binding, Primitive, SliceValue, Value};
use crate::error::ValueError;

/// A flag accumulating every occurrence into a `Vec`.
///
/// The first [`Value::set`] discards the default contents; later ones append.
pub struct Collection<T> {
    variable: Binding<Vec<T>>,
    touched: bool,
}

impl<T> Collection<T> {
    /// Create a collection value over `variable`.
    pub fn new(variable: Binding<Vec<T>>) -> Self {
        Self {
            variable,
            touched: false,
        }
    }
}

impl<T: Primitive> Value for Collection<T> {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        let item = T::parse(raw)?;
        let mut variable = self.variable.borrow_mut();

        if !self.touched {
            variable.clear();
            self.touched = true;
        }

        variable.push(item);
        Ok(())
    }

    fn format(&self) -> String {
        format!("[{}]", self.get_slice().join(" "))
    }

    fn type_name(&self) -> &str {
        T::SLICE_NAME
    }

    fn get(&self) -> Option<Box<dyn Any>> {
        Some(Box::new(self.variable.get()))
    }

    fn as_slice_value(&mut self) -> Option<&mut dyn SliceValue> {
        Some(self)
    }
}

impl<T: Primitive> SliceValue for Collection<T> {
    fn append(&mut self, raw: &str) -> Result<(), ValueError> {
        let item = T::parse(raw)?;
        self.variable.borrow_mut().push(item);
        Ok(())
    }

    fn replace(&mut self, raws: &[String]) -> Result<(), ValueError> {
        let items = raws
            .iter()
            .map(|raw| T::parse(raw))
            .collect::<Result<Vec<T>, ValueError>>()?;
        self.variable.replace(items);
        Ok(())
    }

    fn get_slice(&self) -> Vec<String> {
        self.variable.borrow().iter().map(T::format).collect()
    }
}

/// The type tag of a map flag with values of type `V` (ex: `stringToInt64`).
pub(crate) fn map_type_name<V: Primitive>() -> String {
    let mut chars = V::TYPE_NAME.chars();

    match chars.next() {
        Some(first) => format!("stringTo{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "stringTo".to_string(),
    }
}

/// A flag accumulating `key=value` occurrences into a `BTreeMap`.
///
/// The first [`Value::set`] discards the default contents; later ones insert.
pub struct Mapping<V> {
    variable: Binding<BTreeMap<String, V>>,
    type_name: String,
    touched: bool,
    optional_entries: bool,
}

impl<V: Primitive> Mapping<V> {
    /// Create a map value over `variable`.
    pub fn new(variable: Binding<BTreeMap<String, V>>) -> Self {
        Self {
            variable,
            type_name: map_type_name::<V>(),
            touched: false,
            optional_entries: false,
        }
    }
}

impl<V: Primitive> Value for Mapping<V> {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        let (key, value) = match raw.split_once('=') {
            Some(pair) => pair,
            None if self.optional_entries => (raw, ""),
            None if V::TYPE_NAME == String::TYPE_NAME => {
                return Err(ValueError::Message(format!(
                    "{raw:?} must be formatted as key=value"
                )))
            }
            None => {
                return Err(ValueError::Message(format!(
                    "{raw} must be formatted as key=value"
                )))
            }
        };
        let value = V::parse_entry(value)?;
        let mut variable = self.variable.borrow_mut();

        if !self.touched {
            variable.clear();
            self.touched = true;
        }

        variable.insert(key.to_string(), value);
        Ok(())
    }

    fn format(&self) -> String {
        let entries = self
            .variable
            .borrow()
            .iter()
            .map(|(key, value)| format!("{key}={}", value.format_entry()))
            .collect::<Vec<String>>();
        format!("[{}]", entries.join(" "))
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get(&self) -> Option<Box<dyn Any>> {
        Some(Box::new(self.variable.get()))
    }

    fn enable_optional_entries(&mut self) -> bool {
        // Only text values have a meaningful empty form.
        if V::TYPE_NAME == String::TYPE_NAME {
            self.optional_entries = true;
        }

        self.optional_entries
    }
}
