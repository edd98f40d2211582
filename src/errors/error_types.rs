/// Enum representing the different types of errors that can occur in the map viewer.
///
/// ### Error Codes:
/// - **100–199**: Errors in the `point_source` module.
/// - **200–299**: Errors in the `geolocation` module.
/// - **300–399**: Errors in the `map` module (controller and widgets).
/// - **400–499**: Errors in the `settings` module.
/// - **600–699**: Errors in the `ui` module.
///
/// Each error is represented by:
/// - `code` (`i32`): The unique error code.
/// - `message` (`String`): A detailed error message.
#[derive(PartialEq, Clone)]
pub enum ErrorTypes {
    /// Represents an error with a specific code and message.
    Error { code: i32, message: String },
}

impl ErrorTypes {
    /// Creates a new `ErrorTypes::Error` instance.
    ///
    /// # Arguments:
    /// - `code`: The error code associated with this error.
    /// - `message`: A descriptive message explaining the error.
    ///
    /// # Returns:
    /// A new `ErrorTypes` instance.
    pub fn new(code: i32, message: String) -> Self {
        ErrorTypes::Error { code, message }
    }

    /// Returns the error code.
    pub fn code(&self) -> i32 {
        match self {
            ErrorTypes::Error { code, .. } => *code,
        }
    }
}

impl std::fmt::Debug for ErrorTypes {
    /// Formats the error information for debugging purposes.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTypes::Error { code, message } => {
                write!(f, "An error has occured: {:?}, code: [{:?}]", message, code)
            }
        }
    }
}

impl std::fmt::Display for ErrorTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTypes::Error { code, message } => write!(f, "[{}] {}", code, message),
        }
    }
}

impl std::error::Error for ErrorTypes {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_code_and_display() {
        let error = ErrorTypes::new(301, "Map is not initialized".to_string());
        assert_eq!(error.code(), 301);
        assert_eq!(error.to_string(), "[301] Map is not initialized");
    }
}
