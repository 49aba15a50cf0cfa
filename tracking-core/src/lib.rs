#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Domain types and pure simulation math for the vessel tracking engine:
//! geodesy, biofouling growth, route definitions and the shared vessel state
//! store. Contains no scheduling or I/O.

mod domain;
mod error;
mod geodesy;
mod store;

pub use domain::*;
pub use error::*;
pub use geodesy::*;
pub use store::*;
