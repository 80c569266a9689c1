pub mod booking_repository;
pub mod directory;
pub mod slot_service;

// パブリックに型を再エクスポート
pub use booking_repository::BookingRepository as PostgresBookingRepository;
pub use directory::{
    CustomerService as PostgresCustomerService, StaffService as PostgresStaffService,
};
pub use slot_service::SlotService as PostgresSlotService;
