//! # CLI Module
//!
//! User-facing entry point of `scfetch`. The binary parses its arguments,
//! acquires a client id and hands the link over to [`download`], which
//! classifies it and runs the matching download flow:
//!
//! ```bash
//! scfetch https://soundcloud.com/artist/track-name      # one track into the output dir
//! scfetch https://soundcloud.com/artist/sets/some-set   # a playlist into ./some-set/
//! scfetch https://soundcloud.com/artist                 # all uploads into ./artist/
//! ```
//!
//! Everything after start-up is best effort: failures are printed as
//! warnings and the process still exits successfully.

mod download;

pub use download::download;
