use crate::api::FlagSet;
use crate::error::ParseError;
use crate::model::ErrorHandling;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

impl FlagSet {
    /// Settle the outcome of a parse according to the error handling mode.
    pub(crate) fn conclude(&mut self, result: Result<(), ParseError>) -> Result<(), ParseError> {
        let error = match result {
            Ok(()) => {
                self.parsed = true;
                return Ok(());
            }
            Err(error) => error,
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Parse of '{}' failed ({}): {error}.",
                self.name, self.error_handling
            );
        }

        match self.error_handling {
            ErrorHandling::ContinueOnError => {}
            ErrorHandling::ExitOnError => {
                // Help has already shown the usage.
                if matches!(error, ParseError::HelpRequested) {
                    (self.exit)(0);
                } else {
                    self.usage();
                    self.user_interface.print_error(format!("\n{error}\n"));
                    (self.exit)(2);
                }
            }
            ErrorHandling::PanicOnError => panic!("{error}"),
        }

        Err(error)
    }
}
