use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::repositories::{
    AvailabilityRepo, ContentRepo, CourseRepo, PricingRepo, ProfileRepo, SettingsRepo,
};
use crate::services::{AccountService, BookingService, PricingService, ProValidationService};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    config: Arc<Config>,
    jwt: JwtVerifier,
    pricing: PricingService,
    bookings: BookingService,
    accounts: AccountService,
    pro_validation: ProValidationService,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        let jwt = JwtVerifier::new(&config.jwt_secret, &config.jwt_audience);
        let pricing = PricingService::new(db.clone(), config.default_commission_rate);
        let bookings = BookingService::new(db.clone(), pricing.clone());

        Self {
            jwt,
            bookings,
            pricing,
            accounts: AccountService::new(db.clone()),
            pro_validation: ProValidationService::new(db.clone()),
            config: Arc::new(config),
            db,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn jwt(&self) -> &JwtVerifier {
        &self.jwt
    }

    pub fn pricing(&self) -> &PricingService {
        &self.pricing
    }

    pub fn bookings(&self) -> &BookingService {
        &self.bookings
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn pro_validation(&self) -> &ProValidationService {
        &self.pro_validation
    }

    pub fn profiles(&self) -> ProfileRepo {
        ProfileRepo::new(self.db.clone())
    }

    pub fn courses(&self) -> CourseRepo {
        CourseRepo::new(self.db.clone())
    }

    pub fn availability(&self) -> AvailabilityRepo {
        AvailabilityRepo::new(self.db.clone())
    }

    pub fn pricing_rows(&self) -> PricingRepo {
        PricingRepo::new(self.db.clone())
    }

    pub fn content(&self) -> ContentRepo {
        ContentRepo::new(self.db.clone())
    }

    pub fn settings(&self) -> SettingsRepo {
        SettingsRepo::new(self.db.clone())
    }
}
