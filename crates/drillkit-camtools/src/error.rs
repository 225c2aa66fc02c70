//! Error types for the CAM tools crate.
//!
//! This module provides structured error types for drill job loading,
//! drilling parameter validation and G-code generation.

use std::io;
use thiserror::Error;

/// Errors that can occur during CAM tool operations.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// The drill job itself is unusable.
    #[error("Invalid drill job: {0}")]
    InvalidJob(String),

    /// The requested file format is not supported.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// G-code generation failed.
    #[error("G-code generation failed: {0}")]
    GenerationFailed(String),

    /// Path optimization rejected its input.
    #[error(transparent)]
    Optimizer(#[from] drillkit_core::Error),

    /// I/O error during file operations.
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error(transparent)]
    SerializationError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error(transparent)]
    TomlError(#[from] toml::de::Error),

    /// A parameter validation error occurred.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

/// Errors related to drilling parameter validation.
#[derive(Error, Debug, PartialEq)]
pub enum ParameterError {
    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Parameters are mutually incompatible.
    #[error("Incompatible parameters: {0}")]
    Incompatible(String),
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;
