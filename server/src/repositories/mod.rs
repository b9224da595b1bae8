//! Row-level access to the marketplace tables. Each repo owns a pool handle;
//! operations that must share a transaction take a `&mut PgConnection`.

pub mod availability;
pub mod bookings;
pub mod content;
pub mod courses;
pub mod pricing;
pub mod pro_requests;
pub mod profiles;
pub mod settings;

pub use availability::AvailabilityRepo;
pub use bookings::BookingRepo;
pub use content::ContentRepo;
pub use courses::CourseRepo;
pub use pricing::PricingRepo;
pub use pro_requests::ProRequestRepo;
pub use profiles::ProfileRepo;
pub use settings::SettingsRepo;
