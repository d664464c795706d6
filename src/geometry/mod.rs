//! Rigid periodic transforms.

pub mod periodic;
