//! Type definitions for the Gemsrack console
//!
//! This module contains all the data types used throughout the application,
//! including wire types for the Gemsrack API and derived view models.

pub mod gem;
pub mod session;
pub mod table;
pub mod usage;

pub use gem::*;
pub use session::*;
pub use table::*;
pub use usage::*;
