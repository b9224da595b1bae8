use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::auth::permissions::has_permission;
use crate::models::availability::ProAvailability;
use crate::models::booking::{
    Booking, BookingStatus, CreateBookingRequest, PaymentOutcome, PaymentStatus,
    PaymentWebhookEvent,
};
use crate::models::profile::{AdminPermission, Profile};
use crate::repositories::{AvailabilityRepo, BookingRepo, CourseRepo, ProfileRepo};
use crate::services::pricing::PricingService;
use crate::utils::{AppError, AppResult};

/// How a status change moves the places a booking holds on its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatChange {
    Reserve,
    Release,
    Keep,
}

pub fn seat_change(from: BookingStatus, to: BookingStatus) -> SeatChange {
    match (from.holds_places(), to.holds_places()) {
        (true, false) => SeatChange::Release,
        (false, true) => SeatChange::Reserve,
        _ => SeatChange::Keep,
    }
}

/// A slot picked for a booking must be the pro's, on that course and day.
pub fn ensure_slot_matches(
    slot: &ProAvailability,
    request: &CreateBookingRequest,
) -> AppResult<()> {
    if slot.pro_id != request.pro_id
        || slot.golf_course_id != request.golf_course_id
        || slot.date != request.booking_date
    {
        return Err(AppError::ValidationError(
            "The selected slot does not match this pro, course and date".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct BookingService {
    pool: PgPool,
    bookings: BookingRepo,
    availability: AvailabilityRepo,
    courses: CourseRepo,
    profiles: ProfileRepo,
    pricing: PricingService,
}

impl BookingService {
    pub fn new(pool: PgPool, pricing: PricingService) -> Self {
        Self {
            bookings: BookingRepo::new(pool.clone()),
            availability: AvailabilityRepo::new(pool.clone()),
            courses: CourseRepo::new(pool.clone()),
            profiles: ProfileRepo::new(pool.clone()),
            pricing,
            pool,
        }
    }

    /// Prices the lesson, takes the places and writes a `pending` booking.
    /// Place reservation and insert share one transaction.
    pub async fn create(
        &self,
        amateur: &Profile,
        request: &CreateBookingRequest,
        today: NaiveDate,
    ) -> AppResult<Booking> {
        request.validate(today)?;

        if amateur.id == request.pro_id {
            return Err(AppError::ValidationError(
                "You cannot book a lesson with yourself".to_string(),
            ));
        }

        self.profiles
            .get_by_id(request.pro_id)
            .await?
            .filter(|pro| pro.is_pro() && !pro.is_suspended())
            .ok_or_else(|| AppError::NotFound("Pro not found".to_string()))?;

        if self.courses.get_by_id(request.golf_course_id).await?.is_none() {
            return Err(AppError::NotFound("Course not found".to_string()));
        }

        let slot = match request.availability_id {
            Some(slot_id) => {
                let slot = self
                    .availability
                    .get_by_id(slot_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Slot not found".to_string()))?;
                ensure_slot_matches(&slot, request)?;
                slot.ensure_capacity(request.number_of_players)?;
                Some(slot)
            }
            None => None,
        };

        let quote = self
            .pricing
            .quote(request.pro_id, request.holes, request.number_of_players)
            .await?;

        let mut tx = self.pool.begin().await?;

        let start_time = match &slot {
            Some(slot) => {
                AvailabilityRepo::reserve_places(&mut tx, slot.id, request.number_of_players)
                    .await?
                    .ok_or(AppError::CapacityExceeded)?;
                Some(slot.start_time)
            }
            None => None,
        };

        let booking = BookingRepo::insert(&mut tx, amateur.id, request, start_time, &quote).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            pro_id = %booking.pro_id,
            players = booking.number_of_players,
            total = %booking.total_amount,
            "Booking created"
        );
        Ok(booking)
    }

    pub async fn get_for(&self, caller: &Profile, id: Uuid) -> AppResult<Booking> {
        let booking = self
            .bookings
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if booking.involves(caller.id) || has_permission(caller, AdminPermission::ManageBookings) {
            Ok(booking)
        } else {
            Err(AppError::NotFound("Booking not found".to_string()))
        }
    }

    /// Pros see the lessons they give, everybody else the lessons they booked.
    pub async fn list_for(&self, caller: &Profile) -> AppResult<Vec<Booking>> {
        let bookings = if caller.is_pro() {
            self.bookings.list_for_pro(caller.id).await?
        } else {
            self.bookings.list_for_amateur(caller.id).await?
        };
        Ok(bookings)
    }

    pub async fn list_all(&self, status: Option<BookingStatus>) -> AppResult<Vec<Booking>> {
        Ok(self.bookings.list_all(status).await?)
    }

    pub async fn cancel(&self, caller: &Profile, id: Uuid) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;
        let booking = lock_booking(&mut tx, id).await?;

        if !booking.involves(caller.id)
            && !has_permission(caller, AdminPermission::ManageBookings)
        {
            return Err(AppError::Forbidden(
                "You cannot cancel this booking".to_string(),
            ));
        }
        if !booking.status.is_cancellable() {
            return Err(AppError::Conflict(
                "This booking can no longer be cancelled".to_string(),
            ));
        }

        move_places(&mut tx, &booking, BookingStatus::Cancelled).await?;
        let booking = BookingRepo::set_status(&mut tx, id, BookingStatus::Cancelled).await?;
        tx.commit().await?;

        info!(booking_id = %id, cancelled_by = %caller.id, "Booking cancelled");
        Ok(booking)
    }

    /// Manual status change from the back-office.
    pub async fn override_status(
        &self,
        admin: &Profile,
        id: Uuid,
        status: BookingStatus,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;
        let booking = lock_booking(&mut tx, id).await?;

        if booking.status == status {
            return Ok(booking);
        }

        move_places(&mut tx, &booking, status).await?;
        let updated = BookingRepo::set_status(&mut tx, id, status).await?;
        tx.commit().await?;

        info!(
            booking_id = %id,
            admin_id = %admin.id,
            from = ?booking.status,
            to = ?status,
            "Booking status overridden"
        );
        Ok(updated)
    }

    pub async fn delete(&self, admin: &Profile, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        let booking = lock_booking(&mut tx, id).await?;

        move_places(&mut tx, &booking, BookingStatus::Cancelled).await?;
        BookingRepo::delete(&mut tx, id).await?;
        tx.commit().await?;

        info!(booking_id = %id, admin_id = %admin.id, "Booking deleted");
        Ok(())
    }

    /// Applies the payment provider's verdict. Replays are no-ops.
    pub async fn apply_payment(&self, event: &PaymentWebhookEvent) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;
        let booking = lock_booking(&mut tx, event.booking_id).await?;

        let (status, payment_status) = match event.outcome {
            PaymentOutcome::Succeeded => (BookingStatus::Confirmed, PaymentStatus::Paid),
            PaymentOutcome::Failed => (BookingStatus::Cancelled, PaymentStatus::Failed),
        };

        if booking.payment_status == payment_status
            && booking.payment_intent_id.as_deref() == Some(event.payment_intent_id.as_str())
        {
            return Ok(booking);
        }
        if booking.status != BookingStatus::Pending
            || booking.payment_status != PaymentStatus::Pending
        {
            return Err(AppError::Conflict(
                "This booking is not awaiting payment".to_string(),
            ));
        }

        move_places(&mut tx, &booking, status).await?;
        let updated = BookingRepo::set_payment(
            &mut tx,
            booking.id,
            status,
            payment_status,
            &event.payment_intent_id,
        )
        .await?;
        tx.commit().await?;

        info!(
            booking_id = %updated.id,
            outcome = ?event.outcome,
            "Payment applied to booking"
        );
        Ok(updated)
    }
}

async fn lock_booking(conn: &mut PgConnection, id: Uuid) -> AppResult<Booking> {
    BookingRepo::lock_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

async fn move_places(
    conn: &mut PgConnection,
    booking: &Booking,
    to: BookingStatus,
) -> AppResult<()> {
    let Some(slot_id) = booking.availability_id else {
        return Ok(());
    };

    match seat_change(booking.status, to) {
        SeatChange::Release => {
            AvailabilityRepo::release_places(conn, slot_id, booking.number_of_players).await?;
        }
        SeatChange::Reserve => {
            AvailabilityRepo::reserve_places(conn, slot_id, booking.number_of_players)
                .await?
                .ok_or(AppError::CapacityExceeded)?;
        }
        SeatChange::Keep => {}
    }
    Ok(())
}
