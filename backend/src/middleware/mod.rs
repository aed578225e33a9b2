//! Actix middleware wrapping every foodgram route.

pub mod trace;

pub use trace::Trace;
