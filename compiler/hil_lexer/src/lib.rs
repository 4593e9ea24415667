//! Interpolation scanning and literal decoding for HCL string and heredoc text.
//!
//! Two independent engines live here:
//!
//! - [`interpolation_spans`] locates every `${ ... }` region in a piece of
//!   literal text, resynchronizing past text that is not an interpolation.
//! - [`decode`] / [`safe_decode`] turn raw literal text into its logical value
//!   together with a decoded-offset to source-offset table.
//!
//! On top of them, [`text_fragments`] splits a literal into plain runs,
//! escapes and interpolation islands, and the [`injection`] functions decide
//! where embedded languages go inside string and heredoc hosts.
//!
//! All offsets are UTF-8 byte offsets relative to the text passed in.

pub mod fragments;
pub mod injection;
pub mod interpolation;
pub mod unescape;

pub use fragments::{text_fragments, TextFragment};
pub use hil_ir::Span;
pub use injection::{
    heredoc_injections, heredoc_language, interpolation_places, EmbeddedLanguage, FileContext,
    HeredocInjection, LiteralHost,
};
pub use interpolation::{
    find_interpolation_start, interpolation_spans, InterpolationScanner, ScanConfig,
};
pub use unescape::{decode, safe_decode, DecodeError, DecodeOutcome, DecodedString};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=hil_lexer=debug` or `RUST_LOG=hil_lexer=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
