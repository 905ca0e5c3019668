//! # CLI Module
//!
//! Command-line front end over the document generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate the merged Swagger document for a host description:
//!
//! ```bash
//! odata-swagger generate --host host.yaml --root-url http://localhost:5000/
//! ```
//!
//! Options:
//! - `--host <FILE>` - Host description: route table and controllers (required)
//! - `--conventional <FILE>` - Conventional API descriptions to merge with
//! - `--settings <FILE>` - Settings file with versions and type mappings
//! - `--api-version <VERSION>` - Version to document (default: v1)
//! - `--format <json|yaml>` - Output format (default: json)
//! - `--output <FILE>` - Write to a file instead of stdout
//! - `--watch` - Regenerate the output file whenever the host file changes
//!
//! ### `inspect`
//!
//! Show every OData path candidate and the controller action it resolves to,
//! or why it was left out:
//!
//! ```bash
//! odata-swagger inspect --host host.yaml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use odata_swagger::cli::{run, Cli};
//! use clap::Parser;
//!
//! run(Cli::parse())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands, OutputFormat};
