//! Application layer containing the submission orchestration.
//!
//! This module defines the `PaymentFlowController`, the single owner of
//! transient checkout state. It drives the tokenize → create-intent →
//! confirm-challenge sequence against the domain ports.

pub mod controller;
