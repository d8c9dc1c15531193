//! catalog - category hierarchy toolkit
//!
//! Builds the nested category menu of the marketplace from the flat list the
//! category service returns, and checks that list for inconsistencies.
//!
//! ## Quick Start
//!
//! ```bash
//! # Render a category dump as an indented tree
//! catalog tree --input categories.json
//!
//! # Keep a snapshot and render it later
//! catalog import categories.json --label nightly
//! catalog tree --latest --format markdown
//!
//! # Report dangling parents, duplicates and cycles
//! catalog check --input categories.json
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
