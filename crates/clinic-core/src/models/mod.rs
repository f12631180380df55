//! Domain types for the reservation engine.

mod actor;
mod appointment;
mod doctor;
mod requests;

pub use actor::{Actor, Role};
pub use appointment::Appointment;
pub use doctor::{Doctor, SlotMap};
pub use requests::{BookAppointmentRequest, OrderHandle, ValidationError};
