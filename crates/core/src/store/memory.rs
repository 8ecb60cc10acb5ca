//! In-memory implementation of every store trait.
//!
//! Used by unit and HTTP-level tests. It enforces the same integrity rules as
//! the PostgreSQL schema: unique emails, existing foreign keys, the interval
//! and date check constraints, cascading deletes, and the per-classroom
//! no-overlap guard. The overlap guard runs under the write lock, so two
//! concurrent writers can never both admit overlapping reservations.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{ClassroomStore, ReservationStore, UserStore};
use crate::error::CoreError;
use crate::model::{
    Classroom, ClassroomChanges, NewClassroom, NewReservation, NewUser, Reservation,
    ReservationSchedule, User, UserChanges,
};
use crate::scheduling::Interval;
use crate::types::{CalendarDate, DbId, Timestamp};

#[derive(Debug, Default)]
struct Tables {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    classrooms: BTreeMap<DbId, Classroom>,
    reservations: BTreeMap<DbId, Reservation>,
}

impl Tables {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn check_reservation(
        &self,
        classroom_id: DbId,
        date: CalendarDate,
        start_time: Timestamp,
        end_time: Timestamp,
        exclude_id: Option<DbId>,
    ) -> Result<(), CoreError> {
        let interval = Interval::new(start_time, end_time)?;
        if date != interval.start_date() {
            return Err(CoreError::InvalidInput(
                "date must equal the calendar day of startTime".into(),
            ));
        }
        let overlapping = self.reservations.values().any(|r| {
            r.classroom_id == classroom_id
                && Some(r.id) != exclude_id
                && Interval::of(r).overlaps(&interval)
        });
        if overlapping {
            return Err(CoreError::Conflict("Time slot already reserved".into()));
        }
        Ok(())
    }

    fn email_taken(&self, email: &str, except: Option<DbId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// Newest first, ties broken by id so the order is total.
fn newest_first<T>(
    rows: impl Iterator<Item = T>,
    key: impl Fn(&T) -> (Timestamp, DbId),
) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

/// Shared in-process store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, CoreError> {
        self.tables
            .read()
            .map_err(|_| CoreError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, CoreError> {
        self.tables
            .write()
            .map_err(|_| CoreError::Internal("memory store lock poisoned".into()))
    }
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Reservation>, CoreError> {
        let tables = self.read()?;
        Ok(newest_first(tables.reservations.values().cloned(), |r| {
            (r.created_at, r.id)
        }))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Reservation>, CoreError> {
        Ok(self.read()?.reservations.get(&id).cloned())
    }

    async fn find_by_classroom_and_date(
        &self,
        classroom_id: DbId,
        date: CalendarDate,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<Reservation>, CoreError> {
        Ok(self
            .read()?
            .reservations
            .values()
            .filter(|r| r.classroom_id == classroom_id && r.date == date)
            .filter(|r| Some(r.id) != exclude_id)
            .cloned()
            .collect())
    }

    async fn create(&self, input: &NewReservation) -> Result<Reservation, CoreError> {
        let mut tables = self.write()?;
        if !tables.classrooms.contains_key(&input.classroom_id)
            || !tables.users.contains_key(&input.user_id)
        {
            return Err(CoreError::InvalidInput(
                "Referenced classroom or user does not exist".into(),
            ));
        }
        tables.check_reservation(
            input.classroom_id,
            input.date,
            input.start_time,
            input.end_time,
            None,
        )?;

        let id = tables.allocate_id();
        let reservation = Reservation {
            id,
            classroom_id: input.classroom_id,
            user_id: input.user_id,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            purpose: input.purpose.clone(),
            created_at: Utc::now(),
        };
        tables.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn update(
        &self,
        id: DbId,
        input: &ReservationSchedule,
    ) -> Result<Option<Reservation>, CoreError> {
        let mut tables = self.write()?;
        let Some(classroom_id) = tables.reservations.get(&id).map(|r| r.classroom_id) else {
            return Ok(None);
        };
        tables.check_reservation(
            classroom_id,
            input.date,
            input.start_time,
            input.end_time,
            Some(id),
        )?;

        let Some(row) = tables.reservations.get_mut(&id) else {
            return Ok(None);
        };
        row.date = input.date;
        row.start_time = input.start_time;
        row.end_time = input.end_time;
        row.purpose = input.purpose.clone();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.write()?.reservations.remove(&id).is_some())
    }
}

// ---------------------------------------------------------------------------
// Classrooms
// ---------------------------------------------------------------------------

#[async_trait]
impl ClassroomStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Classroom>, CoreError> {
        let tables = self.read()?;
        Ok(newest_first(tables.classrooms.values().cloned(), |c| {
            (c.created_at, c.id)
        }))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Classroom>, CoreError> {
        Ok(self.read()?.classrooms.get(&id).cloned())
    }

    async fn create(&self, input: &NewClassroom) -> Result<Classroom, CoreError> {
        let mut tables = self.write()?;
        let id = tables.allocate_id();
        let classroom = Classroom {
            id,
            name: input.name.clone(),
            building: input.building.clone(),
            floor: input.floor,
            capacity: input.capacity,
            image: input.image.clone(),
            description: input.description.clone(),
            created_at: Utc::now(),
        };
        tables.classrooms.insert(id, classroom.clone());
        Ok(classroom)
    }

    async fn update(
        &self,
        id: DbId,
        input: &ClassroomChanges,
    ) -> Result<Option<Classroom>, CoreError> {
        let mut tables = self.write()?;
        let Some(row) = tables.classrooms.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            row.name = name.clone();
        }
        if let Some(building) = &input.building {
            row.building = building.clone();
        }
        if let Some(floor) = input.floor {
            row.floor = floor;
        }
        if let Some(capacity) = input.capacity {
            row.capacity = capacity;
        }
        if input.image.is_some() {
            row.image = input.image.clone();
        }
        if input.description.is_some() {
            row.description = input.description.clone();
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        let mut tables = self.write()?;
        if tables.classrooms.remove(&id).is_none() {
            return Ok(false);
        }
        tables.reservations.retain(|_, r| r.classroom_id != id);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, CoreError> {
        let tables = self.read()?;
        Ok(newest_first(tables.users.values().cloned(), |u| {
            (u.created_at, u.id)
        }))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, CoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, input: &NewUser) -> Result<User, CoreError> {
        let mut tables = self.write()?;
        if tables.email_taken(&input.email, None) {
            return Err(CoreError::Conflict("Email already exists".into()));
        }
        let id = tables.allocate_id();
        let user = User {
            id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: DbId, input: &UserChanges) -> Result<Option<User>, CoreError> {
        let mut tables = self.write()?;
        if let Some(email) = &input.email {
            if tables.email_taken(email, Some(id)) {
                return Err(CoreError::Conflict("Email already exists".into()));
            }
        }
        let Some(row) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(first_name) = &input.first_name {
            row.first_name = first_name.clone();
        }
        if let Some(last_name) = &input.last_name {
            row.last_name = last_name.clone();
        }
        if let Some(email) = &input.email {
            row.email = email.clone();
        }
        if let Some(password_hash) = &input.password_hash {
            row.password_hash = password_hash.clone();
        }
        if let Some(role) = input.role {
            row.role = role;
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        let mut tables = self.write()?;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.reservations.retain(|_, r| r.user_id != id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::roles::Role;

    async fn seeded() -> (MemoryStore, DbId, DbId) {
        let store = MemoryStore::new();
        let classroom = ClassroomStore::create(
            &store,
            &NewClassroom {
                name: "B2".into(),
                building: "Annex".into(),
                floor: 2,
                capacity: 20,
                image: None,
                description: Some("Lab".into()),
            },
        )
        .await
        .unwrap();
        let user = UserStore::create(
            &store,
            &NewUser {
                first_name: "Ana".into(),
                last_name: "Kovač".into(),
                email: "ana@uni.test".into(),
                password_hash: "hash".into(),
                role: Role::Nastavnik,
            },
        )
        .await
        .unwrap();
        (store, classroom.id, user.id)
    }

    fn booking(classroom_id: DbId, user_id: DbId, from: u32, to: u32) -> NewReservation {
        NewReservation {
            classroom_id,
            user_id,
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            start_time: Utc.with_ymd_and_hms(2025, 5, 1, from, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 5, 1, to, 0, 0).unwrap(),
            purpose: None,
        }
    }

    #[tokio::test]
    async fn write_guard_rejects_overlap_even_without_prior_check() {
        let (store, classroom, user) = seeded().await;
        ReservationStore::create(&store, &booking(classroom, user, 9, 11))
            .await
            .unwrap();
        assert_matches!(
            ReservationStore::create(&store, &booking(classroom, user, 10, 12)).await,
            Err(CoreError::Conflict(_))
        );
        assert!(ReservationStore::create(&store, &booking(classroom, user, 11, 12))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let (store, _, _) = seeded().await;
        let result = UserStore::create(
            &store,
            &NewUser {
                first_name: "Other".into(),
                last_name: "Person".into(),
                email: "ana@uni.test".into(),
                password_hash: "hash".into(),
                role: Role::Student,
            },
        )
        .await;
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_classroom_cascades_to_reservations() {
        let (store, classroom, user) = seeded().await;
        let r = ReservationStore::create(&store, &booking(classroom, user, 9, 10))
            .await
            .unwrap();
        assert!(ClassroomStore::delete(&store, classroom).await.unwrap());
        assert!(ReservationStore::find_by_id(&store, r.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unknown_classroom_is_rejected() {
        let (store, _, user) = seeded().await;
        assert_matches!(
            ReservationStore::create(&store, &booking(999, user, 9, 10)).await,
            Err(CoreError::InvalidInput(_))
        );
    }

    #[tokio::test]
    async fn candidate_scan_honours_exclusion() {
        let (store, classroom, user) = seeded().await;
        let r = ReservationStore::create(&store, &booking(classroom, user, 9, 10))
            .await
            .unwrap();
        let date = r.date;
        let all = store
            .find_by_classroom_and_date(classroom, date, None)
            .await
            .unwrap();
        let without = store
            .find_by_classroom_and_date(classroom, date, Some(r.id))
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert!(without.is_empty());
    }

    #[tokio::test]
    async fn write_guard_catches_overlap_across_midnight() {
        let (store, classroom, user) = seeded().await;
        let late = NewReservation {
            classroom_id: classroom,
            user_id: user,
            date: NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
            start_time: Utc.with_ymd_and_hms(2025, 5, 20, 23, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 5, 21, 2, 0, 0).unwrap(),
            purpose: Some("Night session".into()),
        };
        ReservationStore::create(&store, &late).await.unwrap();

        // The date scan for the 21st does not see the booking above.
        let next_day = NaiveDate::from_ymd_opt(2025, 5, 21).unwrap();
        assert!(store
            .find_by_classroom_and_date(classroom, next_day, None)
            .await
            .unwrap()
            .is_empty());

        let early = NewReservation {
            date: next_day,
            start_time: Utc.with_ymd_and_hms(2025, 5, 21, 1, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 5, 21, 3, 0, 0).unwrap(),
            purpose: None,
            ..late
        };
        assert_matches!(
            ReservationStore::create(&store, &early).await,
            Err(CoreError::Conflict(_))
        );
    }
}
