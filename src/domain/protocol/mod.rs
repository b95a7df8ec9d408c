//! Protocol constants and height-gated rule table.
//!
//! Every behaviour that changed at some block height is a `ProtocolRule`;
//! callers never compare heights themselves.

pub mod constants;
pub mod rules;

pub use rules::{Activation, Network, ProtocolChange, ProtocolParams, ProtocolRule};
