//! # U-Cutlist CLI
//!
//! Reads JSON nesting jobs, runs the guillotine nester and writes layouts
//! plus a utilization report.
//!
//! A job file looks like:
//!
//! ```json
//! {
//!   "boards": [{ "material": "mdf-18", "width": 2750, "height": 1830, "kerf": 3.2 }],
//!   "pieces": [
//!     { "module": "base-600", "name": "side", "material": "mdf-18",
//!       "nominal_width": 720, "nominal_height": 560, "quantity": 2,
//!       "edges": { "top": 1 }, "grain": "along-height" }
//!   ],
//!   "config": { "board_selection": "all_open" }
//! }
//! ```

pub mod job;

pub use job::{CheckReport, NestOutput, NestingJob};
