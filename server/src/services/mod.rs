pub mod admin;
pub mod booking;
pub mod pricing;
pub mod pro_validation;

pub use admin::AccountService;
pub use booking::BookingService;
pub use pricing::PricingService;
pub use pro_validation::ProValidationService;
