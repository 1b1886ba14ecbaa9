//! Gaze Coding Agreement Library
//!
//! Compares two independent codings of where a subject was looking during a trial,
//! typically one from a human coder and one from an automated gaze classifier, and
//! reports how often they agree.
//!
//! # Architecture
//!
//! The library is a small pipeline:
//! - [`parser`] reads annotation files into raw [`AnnotationMark`] records and locates
//!   the `codingactive` window
//! - [`normalize`] turns raw records into a sorted list of gaze state changes, folding
//!   out-of-frame intervals into `away`
//! - [`densify`] expands that list into one [`GazeState`] per millisecond
//! - [`agreement`] compares two streams block by block
//!
//! The library does NOT:
//! - Read participant rosters or write spreadsheets
//! - Run the automated gaze classifier
//! - Print anything
//!
//! All of that lives in the application layer (gaze-agreement-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use gaze_agreement::{compare_files, AgreementConfig};
//! use std::path::Path;
//!
//! let config = AgreementConfig::new().with_block_size(1000);
//!
//! match compare_files(Path::new("human.txt"), Path::new("auto.txt"), &config) {
//!     Ok(stats) => {
//!         println!("Raw agreement: {:.2}%", stats.raw_agreement * 100.0);
//!         println!("Left/right agreement: {:.2}%", stats.lr_agreement * 100.0);
//!     }
//!     Err(e) => eprintln!("Comparison failed: {}", e),
//! }
//! ```

// Public modules
pub mod agreement;
pub mod config;
pub mod densify;
pub mod normalize;
pub mod parser;
pub mod types;

// Re-export main types for convenience
pub use agreement::{compare_files, compare_normalized, compare_streams, AgreementStats};
pub use config::AgreementConfig;
pub use densify::{looking_array, LookingStateArray};
pub use normalize::{normalize, NormalizedMarkList};
pub use parser::AnnotationStream;
pub use types::{
    ActiveWindow, AgreementError, AnnotationMark, GazeState, MarkLabel, Millis, Result,
    StateMark,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
