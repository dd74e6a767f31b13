use dynasty_core::{
    Command, DocumentSession, Event, Family, Marriage, ParentRole, PartialDate, Person,
    PersonPosition, Portrait, Repository,
};

fn session() -> DocumentSession {
    DocumentSession::untitled().unwrap()
}

fn insert(session: &DocumentSession, first: &str, last: &str) -> i64 {
    session.people().insert(&Person::new(first, last)).unwrap()
}

#[test]
fn delete_person_undo_restores_dependents() {
    let mut session = session();
    let john = insert(&session, "John", "Smith");
    let mary = insert(&session, "Mary", "Jones");
    let anna = insert(&session, "Anna", "Smith");
    session
        .people()
        .set_parent(anna, ParentRole::Father, Some(john))
        .unwrap();
    let event_id = session
        .events()
        .insert(&Event::new(john, "Job", "Blacksmith"))
        .unwrap();
    let portrait_id = session
        .portraits()
        .insert(&Portrait::new(john, "john.png"))
        .unwrap();
    session
        .positions()
        .upsert(&PersonPosition::new(john, "tree", 3.0, 4.0))
        .unwrap();
    let marriage_id = session
        .marriages()
        .insert(&Marriage::new(john, mary))
        .unwrap();

    let john_before = session.people().get_by_id(john).unwrap().unwrap();
    let event_before = session.events().get_by_id(event_id).unwrap().unwrap();
    let portrait_before = session.portraits().get_by_id(portrait_id).unwrap().unwrap();
    let marriage_before = session.marriages().get_by_id(marriage_id).unwrap().unwrap();

    session.execute(Command::delete_person(john)).unwrap();
    assert_eq!(
        session.undo_description().as_deref(),
        Some("Delete Person: John Smith")
    );
    assert_eq!(session.people().get_by_id(john).unwrap(), None);
    assert!(session.events().get_all().unwrap().is_empty());
    assert_eq!(
        session.people().get_by_id(anna).unwrap().unwrap().father_id,
        None
    );

    session.undo().unwrap();
    assert_eq!(session.people().get_by_id(john).unwrap(), Some(john_before));
    assert_eq!(session.events().get_by_id(event_id).unwrap(), Some(event_before));
    assert_eq!(
        session.portraits().get_by_id(portrait_id).unwrap(),
        Some(portrait_before)
    );
    assert_eq!(
        session.positions().get(john).unwrap(),
        Some(PersonPosition::new(john, "tree", 3.0, 4.0))
    );
    assert_eq!(
        session.people().get_by_id(anna).unwrap().unwrap().father_id,
        Some(john)
    );
    assert_eq!(
        session.marriages().get_by_id(marriage_id).unwrap(),
        Some(marriage_before)
    );

    session.redo().unwrap();
    assert_eq!(session.people().get_by_id(john).unwrap(), None);
    assert_eq!(
        session.marriages().get_by_id(marriage_id).unwrap().unwrap().spouse1_id,
        None
    );
}

#[test]
fn delete_family_undo_relinks_members() {
    let mut session = session();
    let family_id = session.families().insert(&Family::new("Smith")).unwrap();
    let anna = insert(&session, "Anna", "Smith");
    let mut anna_record = session.people().get_by_id(anna).unwrap().unwrap();
    anna_record.family_id = Some(family_id);
    session.people().update(&anna_record).unwrap();

    session.execute(Command::delete_family(family_id)).unwrap();
    assert_eq!(session.families().get_by_id(family_id).unwrap(), None);
    assert_eq!(
        session.people().get_by_id(anna).unwrap().unwrap().family_id,
        None
    );

    session.undo().unwrap();
    assert!(session.families().exists(family_id).unwrap());
    assert_eq!(
        session.people().members_of_family(family_id).unwrap()[0].id,
        Some(anna)
    );
}

#[test]
fn create_child_links_both_parents_and_undoes_as_one_step() {
    let mut session = session();
    let john = insert(&session, "John", "Smith");
    let mary = insert(&session, "Mary", "Smith");

    session
        .execute(Command::create_child(
            Person::new("Anna", "Smith"),
            Some(john),
            Some(mary),
        ))
        .unwrap();
    let child = session.people().get_by_name("Anna", "Smith").unwrap()[0].clone();
    assert_eq!(child.father_id, Some(john));
    assert_eq!(child.mother_id, Some(mary));

    session.undo().unwrap();
    assert!(session.people().get_by_name("Anna", "Smith").unwrap().is_empty());

    session.redo().unwrap();
    let redone = session.people().get_by_name("Anna", "Smith").unwrap()[0].clone();
    assert_eq!(redone, child);
}

#[test]
fn create_child_with_missing_parent_leaves_nothing_behind() {
    let mut session = session();
    let john = insert(&session, "John", "Smith");
    session.store().mark_clean();

    let result = session.execute(Command::create_child(
        Person::new("Anna", "Smith"),
        Some(john),
        Some(404),
    ));
    assert!(result.is_err());
    assert!(session.people().get_by_name("Anna", "Smith").unwrap().is_empty());
    assert!(!session.can_undo());
    assert!(!session.is_dirty());
}

#[test]
fn end_marriage_undo_restores_active_marriage() {
    let mut session = session();
    let john = insert(&session, "John", "Smith");
    let mary = insert(&session, "Mary", "Jones");
    let id = session
        .marriages()
        .insert(&Marriage::new(john, mary))
        .unwrap();

    session
        .execute(Command::end_marriage(
            id,
            PartialDate::year_only(1730),
            Some("Divorce".to_string()),
        ))
        .unwrap();
    assert!(session.marriages().get_active_for_person(john).unwrap().is_empty());

    session.undo().unwrap();
    let marriage = session.marriages().get_by_id(id).unwrap().unwrap();
    assert!(marriage.is_active());
    assert_eq!(marriage.dissolution_reason, None);
}

#[test]
fn move_person_undo_removes_or_restores_position() {
    let mut session = session();
    let anna = insert(&session, "Anna", "Smith");

    session
        .execute(Command::move_person(PersonPosition::new(anna, "tree", 1.0, 1.0)))
        .unwrap();
    session
        .execute(Command::move_person(PersonPosition::new(anna, "tree", 9.0, 9.0)))
        .unwrap();

    session.undo().unwrap();
    assert_eq!(
        session.positions().get(anna).unwrap(),
        Some(PersonPosition::new(anna, "tree", 1.0, 1.0))
    );
    session.undo().unwrap();
    assert_eq!(session.positions().get(anna).unwrap(), None);
}

#[test]
fn batch_is_one_undo_step() {
    let mut session = session();
    let anna = insert(&session, "Anna", "Smith");
    let mut edited = session.people().get_by_id(anna).unwrap().unwrap();
    edited.notes = "Baker".to_string();

    session
        .execute(Command::batch(
            "Edit Person Details",
            vec![
                Command::edit_person(edited),
                Command::add_event(Event::new(anna, "Job", "Baker")),
            ],
        ))
        .unwrap();
    assert_eq!(session.history().undo_len(), 1);
    assert_eq!(
        session.undo_description().as_deref(),
        Some("Edit Person Details")
    );
    assert_eq!(session.events().get_by_person(anna).unwrap().len(), 1);

    session.undo().unwrap();
    assert!(session.events().get_by_person(anna).unwrap().is_empty());
    assert_eq!(
        session.people().get_by_id(anna).unwrap().unwrap().notes,
        ""
    );
}

#[test]
fn failing_batch_rolls_back_earlier_steps() {
    let mut session = session();
    let anna = insert(&session, "Anna", "Smith");

    let result = session.execute(Command::batch(
        "Broken",
        vec![
            Command::add_event(Event::new(anna, "Job", "Baker")),
            Command::delete_event(12345),
        ],
    ));
    assert!(result.is_err());
    assert!(session.events().get_all().unwrap().is_empty());
}
