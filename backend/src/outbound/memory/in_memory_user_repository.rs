//! `UserRepository` backed by an ordered map behind a mutex.
//!
//! Email uniqueness is checked under the same lock as the write, mirroring
//! the unique index of the relational store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId};

#[derive(Debug)]
struct Store {
    users: BTreeMap<UserId, User>,
    next_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Store {
    fn email_owner(&self, email: &str) -> Option<UserId> {
        self.users
            .values()
            .find(|user| user.email().as_ref() == email)
            .map(User::id)
    }

    fn filtered(&self, predicate: impl Fn(&User) -> bool) -> Vec<User> {
        self.users
            .values()
            .filter(|user| predicate(user))
            .cloned()
            .collect()
    }
}

/// In-memory implementation of the `UserRepository` port.
///
/// # Examples
/// ```
/// use userbase::outbound::memory::InMemoryUserRepository;
///
/// let repository = InMemoryUserRepository::new();
/// # let _ = repository;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: Mutex<Store>,
}

impl InMemoryUserRepository {
    /// Create an empty repository whose first id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // A panicked writer cannot leave a half-applied mutation behind.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn as_count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.lock().filtered(|_| true))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let store = self.lock();
        Ok(store
            .email_owner(email)
            .and_then(|id| store.users.get(&id).cloned()))
    }

    async fn find_by_name_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .lock()
            .filtered(|user| user.name().as_ref().to_lowercase().contains(&needle)))
    }

    async fn find_by_age_range(
        &self,
        min: i32,
        max: i32,
    ) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.lock().filtered(|user| {
            user.age()
                .is_some_and(|age| (min..=max).contains(&age.get()))
        }))
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        Ok(as_count(self.lock().users.len()))
    }

    async fn count_by_age_greater_than(&self, age: i32) -> Result<u64, UserPersistenceError> {
        let store = self.lock();
        let older = store
            .users
            .values()
            .filter(|user| user.age().is_some_and(|known| known.get() > age))
            .count();
        Ok(as_count(older))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut store = self.lock();
        if store.email_owner(user.email.as_ref()).is_some() {
            return Err(UserPersistenceError::duplicate(&user.email));
        }

        let id = UserId::new(store.next_id);
        store.next_id += 1;
        let stored = User::from_new(id, user.clone());
        store.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut store = self.lock();
        if !store.users.contains_key(&user.id()) {
            return Err(UserPersistenceError::not_found(user.id().get()));
        }
        if store
            .email_owner(user.email().as_ref())
            .is_some_and(|owner| owner != user.id())
        {
            return Err(UserPersistenceError::duplicate(user.email()));
        }

        store.users.insert(user.id(), user.clone());
        Ok(user.clone())
    }

    async fn exists_by_id(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.lock().users.contains_key(&id))
    }

    async fn delete_by_id(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.lock().users.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Age, EmailAddress, UserName};
    use rstest::{fixture, rstest};

    fn new_user(name: &str, email: &str, age: Option<i32>) -> NewUser {
        NewUser {
            name: UserName::new(name).expect("valid name"),
            email: EmailAddress::new(email).expect("valid email"),
            age: age.map(|raw| Age::new(raw).expect("valid age")),
        }
    }

    #[fixture]
    async fn seeded() -> InMemoryUserRepository {
        let repo = InMemoryUserRepository::new();
        for (name, email, age) in [
            ("Alice", "alice@example.com", Some(30)),
            ("Bob", "bob@example.com", Some(17)),
            ("Malia", "malia@example.com", None),
            ("Al_ex", "alex@example.com", Some(18)),
        ] {
            repo.insert(&new_user(name, email, age))
                .await
                .expect("seed insert");
        }
        repo
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().map(|user| user.name().as_ref()).collect()
    }

    #[rstest]
    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();
        let first = repo
            .insert(&new_user("A", "a@example.com", None))
            .await
            .expect("insert");
        let second = repo
            .insert(&new_user("B", "b@example.com", None))
            .await
            .expect("insert");

        assert_eq!(first.id(), UserId::new(1));
        assert_eq!(second.id(), UserId::new(2));
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::new();
        let first = repo
            .insert(&new_user("A", "a@example.com", None))
            .await
            .expect("insert");
        assert!(repo.delete_by_id(first.id()).await.expect("delete"));

        let second = repo
            .insert(&new_user("B", "b@example.com", None))
            .await
            .expect("insert");
        assert_eq!(second.id(), UserId::new(2));
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_duplicate_email(#[future] seeded: InMemoryUserRepository) {
        let repo = seeded.await;
        let err = repo
            .insert(&new_user("Other", "alice@example.com", None))
            .await
            .expect_err("duplicate");

        assert_eq!(err, UserPersistenceError::duplicate_email("alice@example.com"));
        assert_eq!(repo.count().await.expect("count"), 4);
    }

    #[rstest]
    #[tokio::test]
    async fn name_search_ignores_case_and_treats_wildcards_literally(
        #[future] seeded: InMemoryUserRepository,
    ) {
        let repo = seeded.await;

        let matches = repo.find_by_name_containing("AL").await.expect("search");
        assert_eq!(names(&matches), ["Alice", "Malia", "Al_ex"]);

        let literal = repo.find_by_name_containing("_").await.expect("search");
        assert_eq!(names(&literal), ["Al_ex"]);
    }

    #[rstest]
    #[tokio::test]
    async fn age_range_is_inclusive_and_skips_unknown(#[future] seeded: InMemoryUserRepository) {
        let repo = seeded.await;

        let teens = repo.find_by_age_range(17, 18).await.expect("range");
        assert_eq!(names(&teens), ["Bob", "Al_ex"]);

        let everyone = repo.find_by_age_range(0, i32::MAX).await.expect("range");
        assert_eq!(everyone.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn counts_strictly_older_users(#[future] seeded: InMemoryUserRepository) {
        let repo = seeded.await;

        assert_eq!(repo.count().await.expect("count"), 4);
        assert_eq!(repo.count_by_age_greater_than(17).await.expect("count"), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn update_rejects_email_of_other_user(#[future] seeded: InMemoryUserRepository) {
        let repo = seeded.await;
        let bob = repo
            .find_by_id(UserId::new(2))
            .await
            .expect("lookup")
            .expect("bob stored");

        let err = repo
            .update(&bob.with_email(EmailAddress::new("alice@example.com").expect("valid")))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_user_reports_not_found() {
        let repo = InMemoryUserRepository::new();
        let ghost = User::try_from_parts(7, "Ghost".into(), "ghost@example.com".into(), None)
            .expect("valid parts");

        let err = repo.update(&ghost).await.expect_err("missing");
        assert_eq!(err, UserPersistenceError::not_found(7_i64));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_reports_whether_row_existed(#[future] seeded: InMemoryUserRepository) {
        let repo = seeded.await;

        assert!(repo.delete_by_id(UserId::new(1)).await.expect("delete"));
        assert!(!repo.delete_by_id(UserId::new(1)).await.expect("delete"));
        assert!(!repo.exists_by_id(UserId::new(1)).await.expect("exists"));
    }
}
