//! Reservation scheduler: interval validation, availability checks, and the
//! admit/reschedule/delete flows.
//!
//! Two reservations of the same classroom and date conflict iff their
//! half-open intervals intersect: `a.start < b.end && a.end > b.start`.
//! Touching endpoints (`a.end == b.start`) do not conflict.
//!
//! A request is either admitted (stored) or rejected with a [`CoreError`];
//! an admitted reservation can be rescheduled any number of times, then
//! deleted. Only admitted reservations exist in storage.

use std::sync::Arc;

use crate::authorization::{authorize, Action, Identity};
use crate::error::CoreError;
use crate::model::{NewReservation, Reservation, ReservationSchedule};
use crate::store::{ClassroomStore, ReservationStore};
use crate::types::{CalendarDate, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Intervals
// ---------------------------------------------------------------------------

/// A non-empty half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: Timestamp,
    end: Timestamp,
}

impl Interval {
    /// Fails with [`CoreError::InvalidInput`] unless `start < end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, CoreError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(CoreError::InvalidInput(
                "startTime must be before endTime".into(),
            ))
        }
    }

    /// Interval of an already-admitted reservation.
    pub fn of(reservation: &Reservation) -> Self {
        Self {
            start: reservation.start_time,
            end: reservation.end_time,
        }
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// UTC calendar day the interval starts on.
    pub fn start_date(&self) -> CalendarDate {
        self.start.date_naive()
    }
}

/// Enforce `date == calendarDay(start)` so the `date` scan key can never
/// drift from the interval it indexes.
pub fn validate_schedule(date: CalendarDate, interval: &Interval) -> Result<(), CoreError> {
    if date == interval.start_date() {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "date {date} does not match the day of startTime ({})",
            interval.start_date()
        )))
    }
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    /// At least one existing reservation collides; this is one of them.
    Conflict(Reservation),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// First reservation in `candidates` that collides with `interval` on the
/// same classroom and date, skipping `exclude_id`.
pub fn find_conflict<'a>(
    candidates: &'a [Reservation],
    classroom_id: DbId,
    date: CalendarDate,
    interval: &Interval,
    exclude_id: Option<DbId>,
) -> Option<&'a Reservation> {
    candidates.iter().find(|r| {
        r.classroom_id == classroom_id
            && r.date == date
            && Some(r.id) != exclude_id
            && Interval::of(r).overlaps(interval)
    })
}

fn conflict_error(existing: &Reservation) -> CoreError {
    CoreError::Conflict(format!(
        "Time slot already reserved (reservation {} from {} to {})",
        existing.id,
        existing.start_time.format("%H:%M"),
        existing.end_time.format("%H:%M"),
    ))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A complete request to book a classroom.
#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub classroom_id: DbId,
    pub date: CalendarDate,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub purpose: Option<String>,
}

/// A partial change to an existing reservation. `None` keeps the stored
/// value, except that an omitted `date` follows a changed `start_time`.
#[derive(Debug, Clone, Default)]
pub struct ReservationPatch {
    pub date: Option<CalendarDate>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub purpose: Option<String>,
}

impl ReservationPatch {
    /// Merge onto the stored reservation.
    pub fn apply_to(&self, existing: &Reservation) -> ReservationSchedule {
        let start_time = self.start_time.unwrap_or(existing.start_time);
        let date = match (self.date, self.start_time) {
            (Some(date), _) => date,
            (None, Some(start)) => start.date_naive(),
            (None, None) => existing.date,
        };
        ReservationSchedule {
            date,
            start_time,
            end_time: self.end_time.unwrap_or(existing.end_time),
            purpose: self.purpose.clone().or_else(|| existing.purpose.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Admits, reschedules, and deletes reservations.
///
/// Holds no state of its own; cloning is cheap.
#[derive(Clone)]
pub struct ReservationScheduler {
    reservations: Arc<dyn ReservationStore>,
    classrooms: Arc<dyn ClassroomStore>,
}

impl ReservationScheduler {
    pub fn new(
        reservations: Arc<dyn ReservationStore>,
        classrooms: Arc<dyn ClassroomStore>,
    ) -> Self {
        Self {
            reservations,
            classrooms,
        }
    }

    /// Check whether `interval` is free in `classroom_id` on `date`.
    ///
    /// The verdict is only valid at the moment of the call; the store's own
    /// overlap guard decides the subsequent write.
    pub async fn check_availability(
        &self,
        classroom_id: DbId,
        date: CalendarDate,
        interval: &Interval,
        exclude_id: Option<DbId>,
    ) -> Result<Availability, CoreError> {
        let candidates = self
            .reservations
            .find_by_classroom_and_date(classroom_id, date, exclude_id)
            .await?;

        Ok(
            match find_conflict(&candidates, classroom_id, date, interval, exclude_id) {
                Some(existing) => Availability::Conflict(existing.clone()),
                None => Availability::Available,
            },
        )
    }

    /// Admit a new reservation owned by `identity`.
    ///
    /// Order: role, classroom existence, input shape, overlap.
    pub async fn create(
        &self,
        identity: &Identity,
        request: ReservationRequest,
    ) -> Result<Reservation, CoreError> {
        authorize(identity, Action::CreateReservation, None)?;

        if !self.classrooms.exists(request.classroom_id).await? {
            return Err(CoreError::not_found("Classroom", request.classroom_id));
        }

        let interval = Interval::new(request.start_time, request.end_time)?;
        validate_schedule(request.date, &interval)?;

        if let Availability::Conflict(existing) = self
            .check_availability(request.classroom_id, request.date, &interval, None)
            .await?
        {
            return Err(conflict_error(&existing));
        }

        self.reservations
            .create(&NewReservation {
                classroom_id: request.classroom_id,
                user_id: identity.subject_id,
                date: request.date,
                start_time: interval.start(),
                end_time: interval.end(),
                purpose: request.purpose,
            })
            .await
    }

    /// Run the gate for `action` on reservation `id`, passing the stored
    /// owner when the row exists.
    ///
    /// Returns the row (if any) so callers can continue without a second
    /// lookup. A missing row is not an error here: the gate decides first.
    pub async fn authorize_existing(
        &self,
        identity: &Identity,
        action: Action,
        id: DbId,
    ) -> Result<Option<Reservation>, CoreError> {
        let existing = self.reservations.find_by_id(id).await?;
        authorize(identity, action, existing.as_ref().map(|r| r.user_id))?;
        Ok(existing)
    }

    /// Reschedule (or re-purpose) reservation `id`.
    ///
    /// Order: role and ownership, existence, input shape, overlap excluding
    /// the reservation itself.
    pub async fn update(
        &self,
        identity: &Identity,
        id: DbId,
        patch: ReservationPatch,
    ) -> Result<Reservation, CoreError> {
        let existing = self
            .authorize_existing(identity, Action::UpdateReservation, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Reservation", id))?;

        let schedule = patch.apply_to(&existing);
        let interval = Interval::new(schedule.start_time, schedule.end_time)?;
        validate_schedule(schedule.date, &interval)?;

        if let Availability::Conflict(other) = self
            .check_availability(existing.classroom_id, schedule.date, &interval, Some(id))
            .await?
        {
            return Err(conflict_error(&other));
        }

        self.reservations
            .update(id, &schedule)
            .await?
            .ok_or_else(|| CoreError::not_found("Reservation", id))
    }

    /// Delete reservation `id`, returning the removed row.
    pub async fn delete(&self, identity: &Identity, id: DbId) -> Result<Reservation, CoreError> {
        let existing = self
            .authorize_existing(identity, Action::DeleteReservation, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Reservation", id))?;

        if self.reservations.delete(id).await? {
            Ok(existing)
        } else {
            Err(CoreError::not_found("Reservation", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::model::{NewClassroom, NewUser};
    use crate::roles::Role;
    use crate::store::memory::MemoryStore;
    use crate::store::{ClassroomStore, UserStore};

    fn day() -> CalendarDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn at(hour: u32, minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
    }

    fn interval(from: (u32, u32), to: (u32, u32)) -> Interval {
        Interval::new(at(from.0, from.1), at(to.0, to.1)).unwrap()
    }

    fn request(classroom_id: DbId, from: (u32, u32), to: (u32, u32)) -> ReservationRequest {
        ReservationRequest {
            classroom_id,
            date: day(),
            start_time: at(from.0, from.1),
            end_time: at(to.0, to.1),
            purpose: Some("Lecture".into()),
        }
    }

    struct Fixture {
        scheduler: ReservationScheduler,
        classroom_id: DbId,
        admin: Identity,
        teacher: Identity,
        other_teacher: Identity,
        student: Identity,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let classroom = ClassroomStore::create(
            &store,
            &NewClassroom {
                name: "A1".into(),
                building: "Main".into(),
                floor: 1,
                capacity: 30,
                image: None,
                description: None,
            },
        )
        .await
        .unwrap();

        let mut ids = Vec::new();
        for (email, role) in [
            ("admin@uni.test", Role::Admin),
            ("teacher@uni.test", Role::Nastavnik),
            ("other@uni.test", Role::Nastavnik),
            ("student@uni.test", Role::Student),
        ] {
            let user = UserStore::create(
                &store,
                &NewUser {
                    first_name: "Test".into(),
                    last_name: "User".into(),
                    email: email.into(),
                    password_hash: "x".into(),
                    role,
                },
            )
            .await
            .unwrap();
            ids.push(Identity::new(user.id, role));
        }

        let store = Arc::new(store);
        Fixture {
            scheduler: ReservationScheduler::new(store.clone(), store),
            classroom_id: classroom.id,
            admin: ids[0],
            teacher: ids[1],
            other_teacher: ids[2],
            student: ids[3],
        }
    }

    // -----------------------------------------------------------------------
    // Interval arithmetic
    // -----------------------------------------------------------------------

    #[test]
    fn overlap_matches_half_open_formula_and_is_symmetric() {
        let points = [(9, 0), (10, 0), (10, 30), (11, 0), (12, 0)];
        for a1 in points {
            for a2 in points {
                for b1 in points {
                    for b2 in points {
                        let (Ok(a), Ok(b)) = (
                            Interval::new(at(a1.0, a1.1), at(a2.0, a2.1)),
                            Interval::new(at(b1.0, b1.1), at(b2.0, b2.1)),
                        ) else {
                            continue;
                        };
                        let expected = a.start() < b.end() && a.end() > b.start();
                        assert_eq!(a.overlaps(&b), expected);
                        assert_eq!(a.overlaps(&b), b.overlaps(&a));
                    }
                }
            }
        }
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!interval((10, 0), (11, 0)).overlaps(&interval((11, 0), (12, 0))));
    }

    #[test]
    fn empty_or_inverted_interval_is_invalid_input() {
        assert_matches!(Interval::new(at(10, 0), at(10, 0)), Err(CoreError::InvalidInput(_)));
        assert_matches!(Interval::new(at(11, 0), at(10, 0)), Err(CoreError::InvalidInput(_)));
    }

    #[test]
    fn date_must_match_start_day() {
        let next_day = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert!(validate_schedule(day(), &interval((10, 0), (11, 0))).is_ok());
        assert_matches!(
            validate_schedule(next_day, &interval((10, 0), (11, 0))),
            Err(CoreError::InvalidInput(_))
        );
    }

    // -----------------------------------------------------------------------
    // Availability
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn adjacent_slot_is_available() {
        let f = fixture().await;
        f.scheduler
            .create(&f.teacher, request(f.classroom_id, (10, 0), (11, 0)))
            .await
            .unwrap();

        let verdict = f
            .scheduler
            .check_availability(f.classroom_id, day(), &interval((11, 0), (12, 0)), None)
            .await
            .unwrap();
        assert_eq!(verdict, Availability::Available);
    }

    #[tokio::test]
    async fn nested_slot_conflicts() {
        let f = fixture().await;
        let existing = f
            .scheduler
            .create(&f.teacher, request(f.classroom_id, (10, 0), (11, 0)))
            .await
            .unwrap();

        let verdict = f
            .scheduler
            .check_availability(f.classroom_id, day(), &interval((10, 30), (10, 45)), None)
            .await
            .unwrap();
        assert_eq!(verdict, Availability::Conflict(existing));
    }

    #[tokio::test]
    async fn repeated_check_gives_same_verdict() {
        let f = fixture().await;
        f.scheduler
            .create(&f.teacher, request(f.classroom_id, (10, 0), (11, 0)))
            .await
            .unwrap();

        let probe = interval((10, 30), (11, 30));
        let first = f
            .scheduler
            .check_availability(f.classroom_id, day(), &probe, None)
            .await
            .unwrap();
        let second = f
            .scheduler
            .check_availability(f.classroom_id, day(), &probe, None)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert!(!first.is_available());
    }

    #[tokio::test]
    async fn other_classroom_or_day_does_not_conflict() {
        let f = fixture().await;
        f.scheduler
            .create(&f.teacher, request(f.classroom_id, (10, 0), (11, 0)))
            .await
            .unwrap();

        let other_day = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let probe = interval((10, 0), (11, 0));
        assert!(f
            .scheduler
            .check_availability(f.classroom_id + 1, day(), &probe, None)
            .await
            .unwrap()
            .is_available());
        assert!(f
            .scheduler
            .check_availability(f.classroom_id, other_day, &probe, None)
            .await
            .unwrap()
            .is_available());
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn create_records_caller_as_owner() {
        let f = fixture().await;
        let reservation = f
            .scheduler
            .create(&f.teacher, request(f.classroom_id, (8, 0), (9, 30)))
            .await
            .unwrap();
        assert_eq!(reservation.user_id, f.teacher.subject_id);
        assert_eq!(reservation.date, day());
        assert_eq!(reservation.purpose.as_deref(), Some("Lecture"));
    }

    #[tokio::test]
    async fn overlapping_create_is_conflict() {
        let f = fixture().await;
        f.scheduler
            .create(&f.teacher, request(f.classroom_id, (10, 0), (11, 0)))
            .await
            .unwrap();

        let result = f
            .scheduler
            .create(&f.admin, request(f.classroom_id, (10, 30), (10, 45)))
            .await;
        assert_matches!(result, Err(CoreError::Conflict(msg)) if msg.contains("already reserved"));
    }

    #[tokio::test]
    async fn student_create_is_forbidden() {
        let f = fixture().await;
        let result = f
            .scheduler
            .create(&f.student, request(f.classroom_id, (10, 0), (11, 0)))
            .await;
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn missing_classroom_is_not_found_before_conflict_scan() {
        let f = fixture().await;
        let result = f
            .scheduler
            .create(&f.teacher, request(9_999, (10, 0), (11, 0)))
            .await;
        assert_matches!(
            result,
            Err(CoreError::NotFound { entity: "Classroom", id: 9_999 })
        );
    }

    #[tokio::test]
    async fn missing_classroom_wins_over_inverted_interval() {
        let f = fixture().await;
        let result = f
            .scheduler
            .create(&f.teacher, request(9_999, (11, 0), (10, 0)))
            .await;
        assert_matches!(
            result,
            Err(CoreError::NotFound { entity: "Classroom", id: 9_999 })
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_for_one_slot_admit_exactly_one() {
        let f = fixture().await;
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let scheduler = f.scheduler.clone();
                let teacher = f.teacher;
                let req = request(f.classroom_id, (10, 0), (11, 0));
                tokio::spawn(async move { scheduler.create(&teacher, req).await })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(err) => assert_matches!(err, CoreError::Conflict(_)),
            }
        }
        assert_eq!(admitted, 1);
    }

    #[tokio::test]
    async fn create_with_mismatched_date_is_invalid() {
        let f = fixture().await;
        let mut req = request(f.classroom_id, (10, 0), (11, 0));
        req.date = NaiveDate::from_ymd_opt(2025, 3, 13).unwrap();
        assert_matches!(
            f.scheduler.create(&f.teacher, req).await,
            Err(CoreError::InvalidInput(_))
        );
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn reschedule_does_not_conflict_with_itself() {
        let f = fixture().await;
        let existing = f
            .scheduler
            .create(&f.teacher, request(f.classroom_id, (10, 0), (11, 0)))
            .await
            .unwrap();

        let updated = f
            .scheduler
            .update(
                &f.teacher,
                existing.id,
                ReservationPatch {
                    end_time: Some(at(11, 30)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.start_time, at(10, 0));
        assert_eq!(updated.end_time, at(11, 30));
        assert_eq!(updated.purpose.as_deref(), Some("Lecture"));
    }

    #[tokio::test]
    async fn reschedule_onto_other_reservation_conflicts() {
        let f = fixture().await;
        f.scheduler
            .create(&f.teacher, request(f.classroom_id, (10, 0), (11, 0)))
            .await
            .unwrap();
        let second = f
            .scheduler
            .create(&f.teacher, request(f.classroom_id, (12, 0), (13, 0)))
            .await
            .unwrap();

        let result = f
            .scheduler
            .update(
                &f.teacher,
                second.id,
                ReservationPatch {
                    start_time: Some(at(10, 45)),
                    ..Default::default()
                },
            )
            .await;
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn nastavnik_cannot_update_others_reservation() {
        let f = fixture().await;
        let theirs = f
            .scheduler
            .create(&f.other_teacher, request(f.classroom_id, (10, 0), (11, 0)))
            .await
            .unwrap();

        let result = f
            .scheduler
            .update(&f.teacher, theirs.id, ReservationPatch::default())
            .await;
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn admin_can_update_anyones_reservation() {
        let f = fixture().await;
        let theirs = f
            .scheduler
            .create(&f.teacher, request(f.classroom_id, (10, 0), (11, 0)))
            .await
            .unwrap();

        let updated = f
            .scheduler
            .update(
                &f.admin,
                theirs.id,
                ReservationPatch {
                    purpose: Some("Exam".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.purpose.as_deref(), Some("Exam"));
        assert_eq!(updated.user_id, f.teacher.subject_id);
    }

    #[tokio::test]
    async fn forbidden_wins_over_not_found_for_nastavnik() {
        let f = fixture().await;
        assert_matches!(
            f.scheduler
                .update(&f.teacher, 4_242, ReservationPatch::default())
                .await,
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            f.scheduler.delete(&f.teacher, 4_242).await,
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            f.scheduler.delete(&f.admin, 4_242).await,
            Err(CoreError::NotFound { entity: "Reservation", .. })
        );
    }

    #[test]
    fn patch_date_follows_changed_start() {
        let existing = Reservation {
            id: 1,
            classroom_id: 1,
            user_id: 1,
            date: day(),
            start_time: at(10, 0),
            end_time: at(11, 0),
            purpose: None,
            created_at: at(0, 0),
        };
        let next_start = Utc.with_ymd_and_hms(2025, 3, 16, 9, 0, 0).unwrap();
        let schedule = ReservationPatch {
            start_time: Some(next_start),
            ..Default::default()
        }
        .apply_to(&existing);
        assert_eq!(schedule.date, next_start.date_naive());
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn owner_can_delete_and_slot_frees_up() {
        let f = fixture().await;
        let mine = f
            .scheduler
            .create(&f.teacher, request(f.classroom_id, (10, 0), (11, 0)))
            .await
            .unwrap();

        let removed = f.scheduler.delete(&f.teacher, mine.id).await.unwrap();
        assert_eq!(removed.id, mine.id);
        assert!(f
            .scheduler
            .check_availability(f.classroom_id, day(), &interval((10, 0), (11, 0)), None)
            .await
            .unwrap()
            .is_available());
    }

    #[tokio::test]
    async fn student_delete_is_forbidden_even_for_existing() {
        let f = fixture().await;
        let r = f
            .scheduler
            .create(&f.teacher, request(f.classroom_id, (10, 0), (11, 0)))
            .await
            .unwrap();
        assert_matches!(
            f.scheduler.delete(&f.student, r.id).await,
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            f.scheduler.delete(&f.other_teacher, r.id).await,
            Err(CoreError::Forbidden(_))
        );
    }
}
