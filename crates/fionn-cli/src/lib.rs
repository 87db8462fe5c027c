// SPDX-License-Identifier: MIT OR Apache-2.0
//! # fionn-cli
//!
//! Command-line interface for fionn: flatten, infer schema, prune, and
//! rewrite JSON from the shell.
//!
//! ## Usage
//!
//! ```bash
//! fionn -f data.json                       # flatten (default mode)
//! fionn -s data.json                       # infer a Draft-07 schema
//! fionn -e -n data.json                    # remove empty strings and nulls
//! fionn -r '^old_' '' data.json             # rewrite keys
//! fionn -v 'red' 'blue' data.json           # rewrite string values
//! fionn -s -t 0 -p data.json                # schema, auto-parallel, pretty
//! ```
//!
//! Mode flags (`-f`/`-s`/`-e`/`-n`/`-r`/`-v`) are mutually exclusive;
//! when more than one is given, the last one on the command line wins.
//! Input is a positional file path, or stdin when omitted or `-`.
//!
//! ## Library usage
//!
//! This crate is primarily a CLI binary. For programmatic access, use
//! the [`fionn`](https://docs.rs/fionn) crate directly.

#![doc(html_root_url = "https://docs.rs/fionn-cli/0.1.0")]
#![warn(missing_docs)]

/// Re-export of `fionn-core` for the shared error/result types.
pub use fionn_core as core;
