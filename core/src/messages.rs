//! Maps API error codes to the Spanish messages shown in toasts.
//!
//! Matching is by substring and the first rule wins, so several server codes
//! can share one message. Anything unmatched is `Internal`.

use crate::error::{ApiError, ClientError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DuplicateEmail,
    Validation,
    InvalidCredentials,
    InvalidContent,
    NotFound,
    Internal,
}

const RULES: &[(&str, ErrorKind)] = &[
    ("email_already_exists", ErrorKind::DuplicateEmail),
    ("validation_error", ErrorKind::Validation),
    ("invalid_credentials", ErrorKind::InvalidCredentials),
    ("invalid_content", ErrorKind::InvalidContent),
    ("not_found", ErrorKind::NotFound),
];

impl ErrorKind {
    pub fn classify(code: &str) -> Self {
        RULES
            .iter()
            .find(|(needle, _)| code.contains(needle))
            .map(|&(_, kind)| kind)
            .unwrap_or(ErrorKind::Internal)
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::DuplicateEmail => "Ese correo ya está registrado",
            ErrorKind::Validation => "Datos inválidos",
            ErrorKind::InvalidCredentials => "Credenciales inválidas",
            ErrorKind::InvalidContent => {
                "El mensaje no puede estar vacío ni superar 500 caracteres"
            }
            ErrorKind::NotFound => "Recurso no encontrado",
            ErrorKind::Internal => "Error interno",
        }
    }
}

impl From<&ApiError> for ErrorKind {
    fn from(err: &ApiError) -> Self {
        ErrorKind::classify(err.code().unwrap_or(&err.message))
    }
}

impl From<&ClientError> for ErrorKind {
    fn from(err: &ClientError) -> Self {
        err.as_api().map(ErrorKind::from).unwrap_or(ErrorKind::Internal)
    }
}

/// The toast text for a failed call.
pub fn error_message(err: &ClientError) -> &'static str {
    ErrorKind::from(err).message()
}
