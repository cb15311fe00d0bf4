use super::test_util;
use crate::domain::task::driven_ports::{TaskReader, TaskWriter};
use crate::domain::task::{NewTask, UpdateTask};
use crate::domain::user::driven_ports::{DetectUser, InsertUserError, UserReader, UserWriter};
use crate::domain::user::driving_ports::{CreateUserError, UserPort};
use crate::domain::user::{CreateUser, UserService};
use crate::external_connections::{Transactable, TransactionHandle};
use crate::persistence::ExternalConnectivity;
use crate::persistence::db_task_driven_ports::{DbTaskReader, DbTaskWriter};
use crate::persistence::db_user_driven_ports::{DbDetectUser, DbReadUsers, DbWriteUsers};
use speculoos::prelude::*;

async fn insert_user(id: &str, email: Option<&str>, ext_cxn: &mut ExternalConnectivity) {
    DbWriteUsers
        .create_user(
            &CreateUser {
                id: id.to_owned(),
                email: email.map(str::to_owned),
                username: None,
            },
            ext_cxn,
        )
        .await
        .expect("inserting a user should succeed");
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn users_round_trip() {
    test_util::prepare_db_and_test(|pool| async move {
        let mut ext_cxn = ExternalConnectivity::new(pool);
        insert_user("user-1", Some("first.last@example.com"), &mut ext_cxn).await;

        let exists = DbDetectUser.user_exists("user-1", &mut ext_cxn).await;
        assert_that!(exists).is_ok_containing(true);
        let email_taken = DbDetectUser
            .user_with_email_exists("first.last@example.com", &mut ext_cxn)
            .await;
        assert_that!(email_taken).is_ok_containing(true);

        let user = DbReadUsers
            .get_by_id("user-1", &mut ext_cxn)
            .await
            .expect("reading a user should succeed")
            .expect("user-1 should exist");
        assert_eq!(Some("first.last@example.com"), user.email.as_deref());
        assert!(user.created_at.is_some());
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn duplicate_inserts_are_told_apart() {
    test_util::prepare_db_and_test(|pool| async move {
        let mut ext_cxn = ExternalConnectivity::new(pool);
        insert_user("user-1", Some("same@example.com"), &mut ext_cxn).await;

        let same_id = DbWriteUsers
            .create_user(
                &CreateUser {
                    id: "user-1".to_owned(),
                    email: None,
                    username: None,
                },
                &mut ext_cxn,
            )
            .await;
        assert!(matches!(same_id, Err(InsertUserError::DuplicateId)));

        let same_email = DbWriteUsers
            .create_user(
                &CreateUser {
                    id: "user-2".to_owned(),
                    email: Some("same@example.com".to_owned()),
                    username: None,
                },
                &mut ext_cxn,
            )
            .await;
        assert!(matches!(same_email, Err(InsertUserError::DuplicateEmail)));
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn concurrent_creates_of_one_user_conflict_instead_of_failing() {
    test_util::prepare_db_and_test(|pool| async move {
        let attempts = (0..4).map(|_| {
            let ext_cxn = ExternalConnectivity::new(pool.clone());
            async move {
                let new_user = CreateUser {
                    id: "dup-1".to_owned(),
                    email: None,
                    username: None,
                };
                let mut txn = ext_cxn
                    .start_transaction()
                    .await
                    .expect("starting a transaction should succeed");
                let result = UserService
                    .create_user(&new_user, &mut txn, &DbWriteUsers, &DbDetectUser)
                    .await;
                if result.is_ok() {
                    txn.commit().await.expect("commit should succeed");
                }
                result
            }
        });
        let handles: Vec<_> = attempts.map(tokio::spawn).collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.expect("create task should not panic") {
                Ok(_) => created += 1,
                Err(CreateUserError::UserAlreadyExists(id)) => assert_eq!("dup-1", id),
                Err(other) => panic!("expected a conflict, got {other:?}"),
            }
        }
        assert_eq!(1, created);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn task_lifecycle() {
    test_util::prepare_db_and_test(|pool| async move {
        let mut ext_cxn = ExternalConnectivity::new(pool);
        insert_user("user-1", None, &mut ext_cxn).await;
        insert_user("user-2", None, &mut ext_cxn).await;

        let task_id = DbTaskWriter
            .create_task_for_user(
                "user-1",
                &NewTask {
                    title: "Buy milk".to_owned(),
                    description: Some("Two litres".to_owned()),
                },
                &mut ext_cxn,
            )
            .await
            .expect("creating a task should succeed");

        let created = DbTaskReader
            .user_task_by_id("user-1", task_id, &mut ext_cxn)
            .await
            .expect("reading the task should succeed")
            .expect("the new task should be readable");
        assert!(!created.completed);
        assert_eq!("Buy milk", created.title);

        let other_owner = DbTaskReader
            .user_task_by_id("user-2", task_id, &mut ext_cxn)
            .await;
        assert_that!(other_owner).is_ok().is_none();

        let toggled = DbTaskWriter
            .toggle_completed("user-1", task_id, &mut ext_cxn)
            .await;
        assert_that!(toggled).is_ok().is_some().is_true();

        let updated = DbTaskWriter
            .update_task(
                "user-1",
                task_id,
                &UpdateTask {
                    title: Some("Buy oat milk".to_owned()),
                    description: None,
                },
                &mut ext_cxn,
            )
            .await;
        assert_that!(updated).is_ok_containing(true);

        let after_update = DbTaskReader
            .user_task_by_id("user-1", task_id, &mut ext_cxn)
            .await
            .expect("reading the task should succeed")
            .expect("the task should still exist");
        assert_eq!("Buy oat milk", after_update.title);
        assert_eq!(Some("Two litres"), after_update.description.as_deref());
        assert!(after_update.completed);
        assert!(after_update.updated_at >= created.updated_at);

        let foreign_delete = DbTaskWriter
            .delete_task("user-2", task_id, &mut ext_cxn)
            .await;
        assert_that!(foreign_delete).is_ok_containing(false);

        let deleted = DbTaskWriter
            .delete_task("user-1", task_id, &mut ext_cxn)
            .await;
        assert_that!(deleted).is_ok_containing(true);

        let remaining = DbTaskReader
            .tasks_for_user("user-1", &mut ext_cxn)
            .await
            .expect("listing tasks should succeed");
        assert!(remaining.is_empty());
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn tasks_require_an_existing_owner() {
    test_util::prepare_db_and_test(|pool| async move {
        let mut ext_cxn = ExternalConnectivity::new(pool);

        let orphan = DbTaskWriter
            .create_task_for_user(
                "ghost",
                &NewTask {
                    title: "Nobody's task".to_owned(),
                    description: None,
                },
                &mut ext_cxn,
            )
            .await;
        assert!(orphan.is_err());
    });
}
