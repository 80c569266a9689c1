pub mod booking_repository;
pub mod customer_service;
pub mod slot_service;
pub mod staff_service;

pub use booking_repository::BookingRepository;
pub use customer_service::CustomerService;
pub use slot_service::{SlotService, SlotView};
pub use staff_service::StaffService;
