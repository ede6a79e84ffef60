/// Destination for everything a [`FlagSet`](crate::FlagSet) writes: usage, warnings, and errors.
///
/// Messages are passed through as is; callers include their own line endings.
pub trait UserInterface {
    /// Write regular output.
    fn print(&self, message: String);

    /// Write diagnostic output (usage, deprecation warnings, parse errors).
    fn print_error(&self, message: String);
}

/// Writes to stdout and stderr.
pub struct ConsoleInterface {}

impl Default for ConsoleInterface {
    fn default() -> Self {
        Self {}
    }
}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        print!("{message}");
    }

    fn print_error(&self, message: String) {
        eprint!("{message}");
    }
}
