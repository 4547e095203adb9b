// Domain layer: the Booking record and the repository port the backend store implements.

pub mod model;
pub mod ports;
