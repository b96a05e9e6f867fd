// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Scroll-triggered entrance animations and micro-interactions for
//! rendered landing pages.
//!
//! Glint decorates an already rendered page: sections fade in on a
//! stagger, cards cascade their parts into place when they scroll into
//! view, buttons get a press pulse and a ripple, cards lift on hover or
//! touch, and chevrons slide next to their buttons. Every optional host
//! primitive (intersection observation, element animation, computed style)
//! degrades to an immediate end state when missing.
//!
//! # Key entry points
//!
//! - [`engine::GlintEngine`] - binds all behaviors to one document
//! - [`dom::Document`] - the host abstraction the engine drives
//! - [`dom::MemoryDocument`] - in-memory host for tests and headless use
//! - [`options::Options`] - timings, thresholds, classes, and selectors
//!   (TOML)
//!
//! # Architecture
//!
//! The engine never reads a clock. Hosts pass the current time into
//! [`engine::GlintEngine::init`], [`engine::GlintEngine::handle_event`]
//! and [`engine::GlintEngine::advance`]; deferred work (stagger reveals,
//! press release, touch release) lives in an
//! [`animation::TimerQueue`] the host polls through
//! [`engine::GlintEngine::next_deadline`]. With the `web` feature,
//! `web::mount` wires all of this to a browser page.

pub mod animation;
pub mod dom;
pub mod engine;
pub mod entrance;
pub mod error;
pub mod interaction;
pub mod options;
pub mod visibility;
#[cfg(feature = "web")]
pub mod web;

pub use engine::GlintEngine;
pub use error::GlintError;
pub use options::Options;
