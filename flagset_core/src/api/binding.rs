use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A shared cell holding the live value of a flag.
///
/// The caller keeps one handle and the flag keeps another; whatever the parser stores is visible
/// through both.
///
/// ### Example
/// ```
/// # use flagset_core as flagset;
/// use flagset::{Binding, ErrorHandling, FlagSet};
///
/// let mut flags = FlagSet::new("program", ErrorHandling::ContinueOnError);
/// let port = Binding::new(0u16);
/// flags.uint16_var(&port, "port", 8080, "port to listen on", &[]);
/// assert_eq!(port.get(), 8080);
///
/// flags.parse(&["--port=9000"]).unwrap();
/// assert_eq!(port.get(), 9000);
/// ```
pub struct Binding<T>(Rc<RefCell<T>>);

impl<T> Binding<T> {
    /// Wrap `value` in a new cell.
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Store `value`, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }

    /// Borrow the current value.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutably borrow the current value.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T: Clone> Binding<T> {
    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Binding<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&*self.0.borrow()).finish()
    }
}
