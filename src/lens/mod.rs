//! Lens module
//!
//! This module provides high-level "lens" abstractions that combine business logic
//! with output formatting. Lenses are designed to be reusable across different
//! interfaces (CLI, tests, embedding applications).
//!
//! # Architecture
//!
//! Each lens module exports:
//! - A **Lens struct** (e.g., `GeoLens`) - the main entry point for all operations
//! - **Args structs** - input arguments for lens methods
//! - **Output types** - return types and the collaborators results are written to
//!
//! # Usage
//!
//! ```rust,ignore
//! use iptracker::lens::geo::{GeoLens, GeoLookupArgs, ViewModel};
//! use iptracker::lens::utils::OutputFormat;
//! ```

// =============================================================================
// Utility module
// =============================================================================
pub mod utils;

// =============================================================================
// Lenses
// =============================================================================

// GeoLens - IP/domain geolocation lookup
pub mod geo;
