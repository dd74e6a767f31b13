use dynasty_core::{
    Command, DocumentSession, HistoryError, ParentRole, PartialDate, PersistenceError, Person,
    Repository,
};

fn session() -> DocumentSession {
    DocumentSession::untitled().unwrap()
}

fn anna() -> Person {
    let mut person = Person::new("Anna", "Smith");
    person.birth = Some(PartialDate::year_only(1700));
    person
}

fn add_person(session: &mut DocumentSession, first: &str, last: &str) -> i64 {
    session
        .execute(Command::add_person(Person::new(first, last)))
        .unwrap();
    session.people().get_by_name(first, last).unwrap()[0]
        .id
        .unwrap()
}

#[test]
fn add_undo_redo_preserves_identity_and_fields() {
    let mut session = session();
    session.execute(Command::add_person(anna())).unwrap();

    let all = session.people().get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].full_name(), "Anna Smith");
    let after_execute = all[0].clone();
    let id = after_execute.id.unwrap();

    assert!(session.undo().unwrap());
    assert!(session.people().get_all().unwrap().is_empty());

    assert!(session.redo().unwrap());
    let all = session.people().get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, Some(id));
    assert_eq!(all[0], after_execute);
}

#[test]
fn assign_father_undo_restores_no_father() {
    let mut session = session();
    let father = add_person(&mut session, "John", "Smith");
    let child = add_person(&mut session, "Anna", "Smith");

    session
        .execute(Command::assign_parent(child, ParentRole::Father, father))
        .unwrap();
    assert_eq!(
        session.people().get_by_id(child).unwrap().unwrap().father_id,
        Some(father)
    );

    session.undo().unwrap();
    assert_eq!(
        session.people().get_by_id(child).unwrap().unwrap().father_id,
        None
    );
}

#[test]
fn reassigning_parent_restores_previous_parent() {
    let mut session = session();
    let first = add_person(&mut session, "John", "Smith");
    let second = add_person(&mut session, "Jacob", "Smith");
    let child = add_person(&mut session, "Anna", "Smith");

    session
        .execute(Command::assign_parent(child, ParentRole::Father, first))
        .unwrap();
    session
        .execute(Command::assign_parent(child, ParentRole::Father, second))
        .unwrap();
    session.undo().unwrap();
    assert_eq!(
        session.people().get_by_id(child).unwrap().unwrap().father_id,
        Some(first)
    );

    session
        .execute(Command::unassign_parent(child, ParentRole::Father))
        .unwrap();
    assert_eq!(
        session.people().get_by_id(child).unwrap().unwrap().father_id,
        None
    );
    session.undo().unwrap();
    assert_eq!(
        session.people().get_by_id(child).unwrap().unwrap().father_id,
        Some(first)
    );
}

#[test]
fn undo_undo_redo_reapplies_only_the_latest_undone() {
    let mut session = session();
    session
        .execute(Command::add_person(Person::new("Ann", "Able")))
        .unwrap();
    session
        .execute(Command::add_person(Person::new("Bob", "Baker")))
        .unwrap();

    session.undo().unwrap();
    session.undo().unwrap();
    session.redo().unwrap();

    let names: Vec<_> = session
        .people()
        .get_all()
        .unwrap()
        .iter()
        .map(Person::full_name)
        .collect();
    assert_eq!(names, vec!["Ann Able"]);
    assert!(session.can_redo());
    assert_eq!(
        session.redo_description().as_deref(),
        Some("Add Person: Bob Baker")
    );
}

#[test]
fn new_execute_clears_redo() {
    let mut session = session();
    session
        .execute(Command::add_person(Person::new("Ann", "Able")))
        .unwrap();
    session.undo().unwrap();
    assert!(session.can_redo());

    session
        .execute(Command::add_person(Person::new("Bob", "Baker")))
        .unwrap();
    assert!(!session.can_redo());
    assert!(!session.redo().unwrap());
}

#[test]
fn edit_undo_restores_exact_prior_values() {
    let mut session = session();
    session.execute(Command::add_person(anna())).unwrap();
    let before = session.people().get_all().unwrap()[0].clone();

    let mut edited = before.clone();
    edited.nickname = "Annie".to_string();
    session.execute(Command::edit_person(edited.clone())).unwrap();
    assert_eq!(
        session
            .people()
            .get_by_id(before.id.unwrap())
            .unwrap()
            .unwrap(),
        edited
    );

    session.undo().unwrap();
    assert_eq!(
        session
            .people()
            .get_by_id(before.id.unwrap())
            .unwrap()
            .unwrap(),
        before
    );
}

#[test]
fn repeated_redo_of_edit_produces_identical_record() {
    let mut session = session();
    session.execute(Command::add_person(anna())).unwrap();
    let id = session.people().get_all().unwrap()[0].id.unwrap();

    let mut edited = session.people().get_by_id(id).unwrap().unwrap();
    edited.death = Some(PartialDate::year_only(1760));
    session.execute(Command::edit_person(edited)).unwrap();
    let first_apply = session.people().get_by_id(id).unwrap().unwrap();

    for _ in 0..3 {
        session.undo().unwrap();
        session.redo().unwrap();
        assert_eq!(session.people().get_by_id(id).unwrap().unwrap(), first_apply);
    }
}

#[test]
fn failed_execute_is_recoverable() {
    let mut session = session();
    session.execute(Command::add_person(anna())).unwrap();

    let err = session
        .execute(Command::assign_parent(999, ParentRole::Father, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        HistoryError::Persistence(PersistenceError::NotFound { .. })
    ));
    assert!(!err.is_corruption());
    assert_eq!(session.history().undo_len(), 1);
    assert!(!session.history().is_corrupted());
}

#[test]
fn failed_undo_is_reported_as_corruption() {
    let mut session = session();
    session.execute(Command::add_person(anna())).unwrap();
    let id = session.people().get_all().unwrap()[0].id.unwrap();
    session.people().delete(id).unwrap();

    let err = session.undo().unwrap_err();
    assert!(err.is_corruption());
    assert!(session.history().is_corrupted());
    assert!(!session.can_undo());
    assert!(!session.can_redo());
}

#[test]
fn failed_redo_is_reported_as_corruption() {
    let mut session = session();
    session.execute(Command::add_person(anna())).unwrap();
    let id = session.people().get_all().unwrap()[0].id.unwrap();
    session.undo().unwrap();

    let mut squatter = Person::new("Other", "Person");
    squatter.id = Some(id);
    session.people().insert_with_id(&squatter).unwrap();

    match session.redo().unwrap_err() {
        HistoryError::Corrupted {
            command, source, ..
        } => {
            assert_eq!(command, "Add Person: Anna Smith");
            assert!(matches!(source, PersistenceError::IdentityOccupied { .. }));
        }
        other => panic!("expected corruption, got {other:?}"),
    }
    assert!(session.history().is_corrupted());
}

#[test]
fn dirty_flag_tracks_history_and_save_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dirty.dyn");
    let mut session = DocumentSession::create(&path).unwrap();
    assert!(!session.is_dirty());

    session.execute(Command::add_person(anna())).unwrap();
    assert!(session.is_dirty());

    session.save().unwrap();
    assert!(!session.is_dirty());

    session.undo().unwrap();
    assert!(session.is_dirty());

    session.save().unwrap();
    let err = session.execute(Command::edit_person(Person::new("Nobody", "Here")));
    assert!(err.is_err());
    assert!(!session.is_dirty());
}

fn insert_out_of_order_row(session: &DocumentSession) -> i64 {
    // Older files can hold a death year before the birth year.
    let conn = session.store().conn().unwrap();
    conn.execute(
        "INSERT INTO Person (first_name, last_name, birth_year, death_year)
         VALUES ('Old', 'Row', 1800, 1750);",
        [],
    )
    .unwrap();
    conn.last_insert_rowid()
}

#[test]
fn delete_undo_restores_row_stored_before_date_rules() {
    let mut session = session();
    let id = insert_out_of_order_row(&session);
    let stored = session.people().get_by_id(id).unwrap().unwrap();

    session.execute(Command::delete_person(id)).unwrap();
    assert!(session.people().get_by_id(id).unwrap().is_none());

    assert!(session.undo().unwrap());
    assert!(!session.history().is_corrupted());
    assert_eq!(session.people().get_by_id(id).unwrap().unwrap(), stored);

    assert!(session.redo().unwrap());
    assert!(session.people().get_by_id(id).unwrap().is_none());
}

#[test]
fn edit_undo_restores_row_stored_before_date_rules() {
    let mut session = session();
    let id = insert_out_of_order_row(&session);
    let stored = session.people().get_by_id(id).unwrap().unwrap();

    let mut fixed = stored.clone();
    fixed.death = Some(PartialDate::year_only(1850));
    session.execute(Command::edit_person(fixed.clone())).unwrap();
    assert_eq!(session.people().get_by_id(id).unwrap().unwrap(), fixed);

    assert!(session.undo().unwrap());
    assert!(!session.history().is_corrupted());
    assert_eq!(session.people().get_by_id(id).unwrap().unwrap(), stored);
}
