//! Inputs handed to the external PDF toolkit: page geometry and page selections.
//!
//! Document construction itself happens elsewhere.

pub(crate) mod geometry;
pub(crate) mod pages;
