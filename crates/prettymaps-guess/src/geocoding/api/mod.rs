mod client;
mod model;

pub(crate) use client::*;
