mod biofouling;
mod routes;
mod vessels;

pub use biofouling::*;
pub use routes::*;
pub use vessels::*;
