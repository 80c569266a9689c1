mod booking_queries;
mod booking_service;
mod errors;
pub mod validation;

pub use booking_queries::{
    count_bookings_by_status, get_booking, list_bookings_for_business, list_bookings_for_customer,
    list_bookings_for_staff,
};
pub use booking_service::{
    ServiceDependencies, cancel_booking, complete_booking, confirm_booking, create_booking,
    update_booking,
};
pub use errors::{BookingApplicationError, ErrorKind, Result};
