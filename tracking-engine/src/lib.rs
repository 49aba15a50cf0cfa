#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Implements the vessel tracking simulation engine: one independent periodic
//! task per tracked vessel advancing its position along a cyclic route and
//! growing its hull fouling, with concurrent status queries over a shared
//! state store.

pub mod error;
pub mod scheduler;
pub mod settings;
pub mod startup;
pub mod updater;
