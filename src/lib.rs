//! # simplify - selective-translation script converter
//!
//! `simplify` converts traditional Chinese text to simplified Chinese and,
//! where it is safe to do so, machine-translates embedded English fragments
//! to simplified Chinese. It works on single files or whole directory trees.
//!
//! ## Features
//!
//! - **Fragment-aware**: Android-style `<string name="...">` resources are
//!   split so only the values are touched; markup is copied verbatim
//! - **Placeholder guard**: fragments with `%s`, `{name}`, `@string/x`,
//!   escapes or URLs are never sent to a translator
//! - **Backend fallback**: the offline Argos Translate client first, an
//!   OpenAI-compatible endpoint second, the source text as a last resort
//! - **Caching**: successful translations are kept in `SQLite`
//!
//! ## Quick Start
//!
//! ```bash
//! # Convert one file next to itself (notes_simplified.txt)
//! simplify ./notes.txt
//!
//! # Convert an Android resource tree into ./res_simplified
//! simplify ./res
//!
//! # Script conversion only
//! simplify --no-translate ./docs ./docs-hans
//! ```
//!
//! ## Configuration
//!
//! Settings are read from `~/.config/simplify/config.toml`:
//!
//! ```toml
//! [simplify]
//! provider = "openai"
//! jobs = 4
//!
//! [offline]
//! command = "argos-translate-cli"
//!
//! [providers.openai]
//! endpoint = "https://api.openai.com"
//! api_key_env = "OPENAI_API_KEY"
//! models = ["gpt-4o-mini"]
//! ```

/// Directory and single-file conversion driver.
pub mod batch;

/// Translation cache management using `SQLite`.
pub mod cache;

/// Translation backends and PDF extraction probed at startup.
pub mod capability;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// Documents, fragment extraction and reassembly.
pub mod document;

/// File system utilities.
pub mod fs;

/// Placeholder detection for fragments that must not be translated.
pub mod guard;

/// Input classification, discovery and PDF extraction.
pub mod input;

/// Global output configuration (quiet mode, colors, stderr routing).
pub mod output;

/// XDG-style path utilities for configuration and cache.
pub mod paths;

/// Per-document orchestration of guard, translation and conversion.
pub mod pipeline;

/// Traditional to simplified Chinese script conversion.
pub mod script;

/// Translation providers and the fallback chain.
pub mod translation;

/// Terminal UI components (progress bar, colors).
pub mod ui;
