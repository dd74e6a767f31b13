use dynasty_core::db::open_db_in_memory;
use dynasty_core::repo::event_repo::EventRepository;
use dynasty_core::repo::family_repo::FamilyRepository;
use dynasty_core::repo::major_event_repo::MajorEventRepository;
use dynasty_core::repo::marriage_repo::MarriageRepository;
use dynasty_core::repo::person_repo::PersonRepository;
use dynasty_core::repo::portrait_repo::PortraitRepository;
use dynasty_core::repo::position_repo::PositionRepository;
use dynasty_core::repo::settings_repo::SettingsRepository;
use dynasty_core::{
    Event, Family, Gender, MajorEvent, Marriage, ParentRole, PartialDate, PersistenceError,
    Person, PersonPosition, Portrait, RecordValidationError, Repository, Store,
};

fn store() -> Store {
    Store::new(open_db_in_memory().unwrap())
}

fn person(first: &str, last: &str, birth_year: Option<i32>) -> Person {
    let mut person = Person::new(first, last);
    person.birth = birth_year.map(PartialDate::year_only);
    person
}

#[test]
fn insert_and_get_roundtrip_keeps_every_field() {
    let store = store();
    let families = FamilyRepository::new(&store);
    let family_id = families.insert(&Family::new("Smith")).unwrap();

    let people = PersonRepository::new(&store);
    let mut anna = Person::new("Anna", "Smith");
    anna.middle_name = "Maria".to_string();
    anna.maiden_name = Some("Jones".to_string());
    anna.nickname = "Annie".to_string();
    anna.gender = Some(Gender::Female);
    anna.birth = Some(PartialDate::ymd(1700, 3, 9).unwrap());
    anna.death = Some(PartialDate::year_month(1760, 11).unwrap());
    anna.arrival = Some(PartialDate::year_only(1720));
    anna.family_id = Some(family_id);
    anna.is_founder = true;
    anna.education = 2;
    anna.is_favorite = true;
    anna.notes = "Arrived by ship".to_string();

    let id = people.insert(&anna).unwrap();
    anna.id = Some(id);

    assert_eq!(people.get_by_id(id).unwrap(), Some(anna));
    assert!(people.exists(id).unwrap());
    assert_eq!(people.get_by_id(id + 100).unwrap(), None);
}

#[test]
fn insert_rejects_record_with_identity() {
    let store = store();
    let mut anna = person("Anna", "Smith", None);
    anna.id = Some(7);

    let err = PersonRepository::new(&store).insert(&anna).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::UnexpectedIdentity {
            entity: "Person",
            id: 7
        }
    ));
    assert!(!store.is_dirty());
}

#[test]
fn insert_with_id_reuses_identity_and_rejects_occupied() {
    let store = store();
    let people = PersonRepository::new(&store);

    let mut anna = person("Anna", "Smith", Some(1700));
    anna.id = Some(42);
    people.insert_with_id(&anna).unwrap();
    assert_eq!(people.get_by_id(42).unwrap(), Some(anna.clone()));

    let err = people.insert_with_id(&anna).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::IdentityOccupied {
            entity: "Person",
            id: 42
        }
    ));

    let err = people
        .insert_with_id(&person("Ben", "Smith", None))
        .unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::MissingIdentity { entity: "Person" }
    ));
}

#[test]
fn update_and_delete_report_missing_rows() {
    let store = store();
    let people = PersonRepository::new(&store);

    let mut ghost = person("Ghost", "Smith", None);
    ghost.id = Some(99);
    assert!(matches!(
        people.update(&ghost).unwrap_err(),
        PersistenceError::NotFound {
            entity: "Person",
            id: 99
        }
    ));
    assert!(matches!(
        people.delete(99).unwrap_err(),
        PersistenceError::NotFound {
            entity: "Person",
            id: 99
        }
    ));
    assert!(!store.is_dirty());
}

#[test]
fn update_replaces_all_fields() {
    let store = store();
    let people = PersonRepository::new(&store);
    let id = people.insert(&person("Anna", "Smith", Some(1700))).unwrap();

    let mut edited = people.get_by_id(id).unwrap().unwrap();
    edited.first_name = "Anne".to_string();
    edited.birth = None;
    people.update(&edited).unwrap();

    let loaded = people.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.first_name, "Anne");
    assert_eq!(loaded.birth, None);
    assert_eq!(loaded.last_name, "Smith");
}

#[test]
fn invalid_records_never_reach_the_store() {
    let store = store();
    let people = PersonRepository::new(&store);

    let err = people.insert(&person(" ", "Smith", None)).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Validation(RecordValidationError::BlankField {
            entity: "Person",
            field: "first_name"
        })
    ));
    assert!(people.get_all().unwrap().is_empty());
    assert!(!store.is_dirty());
}

#[test]
fn dangling_reference_is_a_constraint_violation() {
    let store = store();
    let err = EventRepository::new(&store)
        .insert(&Event::new(404, "Birth", "Born"))
        .unwrap_err();
    assert!(matches!(err, PersistenceError::ConstraintViolation(_)));
    assert!(!store.is_dirty());
}

#[test]
fn get_all_orders_people_by_last_then_first_name() {
    let store = store();
    let people = PersonRepository::new(&store);
    people.insert(&person("Carl", "Smith", None)).unwrap();
    people.insert(&person("Anna", "Smith", None)).unwrap();
    people.insert(&person("Zoe", "Adams", None)).unwrap();

    let names: Vec<String> = people
        .get_all()
        .unwrap()
        .iter()
        .map(Person::full_name)
        .collect();
    assert_eq!(names, vec!["Zoe Adams", "Anna Smith", "Carl Smith"]);
}

#[test]
fn lineage_queries() {
    let store = store();
    let people = PersonRepository::new(&store);
    let father = people.insert(&person("John", "Smith", Some(1670))).unwrap();
    let mother = people.insert(&person("Mary", "Smith", Some(1675))).unwrap();
    let child = people.insert(&person("Anna", "Smith", Some(1700))).unwrap();
    people.insert(&person("Undated", "Smith", None)).unwrap();

    people
        .set_parent(child, ParentRole::Father, Some(father))
        .unwrap();
    people
        .set_parent(child, ParentRole::Mother, Some(mother))
        .unwrap();

    let children = people.get_children(father).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, Some(child));
    assert_eq!(people.get_children(mother).unwrap().len(), 1);

    let alive: Vec<_> = people
        .get_alive_in_year(1672)
        .unwrap()
        .into_iter()
        .filter_map(|person| person.id)
        .collect();
    assert_eq!(alive, vec![father]);

    assert_eq!(people.get_by_name("Anna", "Smith").unwrap().len(), 1);
    assert!(people.get_by_name("Anna", "Jones").unwrap().is_empty());
}

#[test]
fn set_parent_rejects_self_reference() {
    let store = store();
    let people = PersonRepository::new(&store);
    let id = people.insert(&person("Anna", "Smith", None)).unwrap();

    let err = people
        .set_parent(id, ParentRole::Father, Some(id))
        .unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Validation(RecordValidationError::SelfParent(_))
    ));
}

#[test]
fn deleting_person_cascades_owned_rows_and_nulls_references() {
    let store = store();
    let people = PersonRepository::new(&store);
    let parent = people.insert(&person("John", "Smith", None)).unwrap();
    let child = people.insert(&person("Anna", "Smith", None)).unwrap();
    let spouse = people.insert(&person("Mary", "Jones", None)).unwrap();
    people
        .set_parent(child, ParentRole::Father, Some(parent))
        .unwrap();

    let events = EventRepository::new(&store);
    events.insert(&Event::new(parent, "Job", "Smith")).unwrap();
    PortraitRepository::new(&store)
        .insert(&Portrait::new(parent, "john.png"))
        .unwrap();
    PositionRepository::new(&store)
        .upsert(&PersonPosition::new(parent, "tree", 10.0, 20.0))
        .unwrap();
    let marriages = MarriageRepository::new(&store);
    let marriage = marriages.insert(&Marriage::new(parent, spouse)).unwrap();

    people.delete(parent).unwrap();

    assert!(events.get_by_person(parent).unwrap().is_empty());
    assert!(PortraitRepository::new(&store)
        .get_by_person(parent)
        .unwrap()
        .is_empty());
    assert_eq!(PositionRepository::new(&store).get(parent).unwrap(), None);
    assert_eq!(people.get_by_id(child).unwrap().unwrap().father_id, None);
    let marriage = marriages.get_by_id(marriage).unwrap().unwrap();
    assert_eq!(marriage.spouse1_id, None);
    assert_eq!(marriage.spouse2_id, Some(spouse));
}

#[test]
fn marriage_queries() {
    let store = store();
    let people = PersonRepository::new(&store);
    let anna = people.insert(&person("Anna", "Smith", None)).unwrap();
    let ben = people.insert(&person("Ben", "Jones", None)).unwrap();
    let carl = people.insert(&person("Carl", "Brown", None)).unwrap();

    let marriages = MarriageRepository::new(&store);
    let mut first = Marriage::new(anna, ben);
    first.married = Some(PartialDate::year_only(1720));
    first.dissolved = Some(PartialDate::year_only(1725));
    first.dissolution_reason = Some("Death".to_string());
    marriages.insert(&first).unwrap();
    let mut second = Marriage::new(carl, anna);
    second.married = Some(PartialDate::year_only(1727));
    let second_id = marriages.insert(&second).unwrap();

    assert_eq!(marriages.get_by_person(anna).unwrap().len(), 2);
    let active = marriages.get_active_for_person(anna).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, Some(second_id));
    assert_eq!(marriages.spouse_of(anna).unwrap(), vec![ben, carl]);
}

#[test]
fn major_events_and_families_order_naturally() {
    let store = store();
    let events = MajorEventRepository::new(&store);
    events
        .insert(&MajorEvent::new("Plague", "Disaster", PartialDate::year_only(1710)))
        .unwrap();
    events
        .insert(&MajorEvent::new("War", "Conflict", PartialDate::year_only(1701)))
        .unwrap();
    let names: Vec<_> = events
        .get_all()
        .unwrap()
        .into_iter()
        .map(|event| event.event_name)
        .collect();
    assert_eq!(names, vec!["War", "Plague"]);

    let families = FamilyRepository::new(&store);
    families.insert(&Family::new("Smith")).unwrap();
    families.insert(&Family::new("Brown")).unwrap();
    let surnames: Vec<_> = families
        .get_all()
        .unwrap()
        .into_iter()
        .map(|family| family.surname)
        .collect();
    assert_eq!(surnames, vec!["Brown", "Smith"]);
}

#[test]
fn positions_upsert_and_remove() {
    let store = store();
    let id = PersonRepository::new(&store)
        .insert(&person("Anna", "Smith", None))
        .unwrap();
    let positions = PositionRepository::new(&store);

    positions
        .upsert(&PersonPosition::new(id, "tree", 1.0, 2.0))
        .unwrap();
    positions
        .upsert(&PersonPosition::new(id, "tree", 5.5, -3.0))
        .unwrap();
    assert_eq!(
        positions.get(id).unwrap(),
        Some(PersonPosition::new(id, "tree", 5.5, -3.0))
    );
    assert!(positions.remove(id).unwrap());
    assert!(!positions.remove(id).unwrap());
}

#[test]
fn settings_roundtrip() {
    let store = store();
    let settings = SettingsRepository::new(&store);
    settings.set("tree.zoom", "1.5").unwrap();
    settings.set("theme", "parchment").unwrap();
    settings.set("tree.zoom", "2").unwrap();

    assert_eq!(settings.get("tree.zoom").unwrap().as_deref(), Some("2"));
    assert_eq!(
        settings.list().unwrap(),
        vec![
            ("theme".to_string(), "parchment".to_string()),
            ("tree.zoom".to_string(), "2".to_string()),
        ]
    );
    assert!(settings.remove("theme").unwrap());
    assert_eq!(settings.get("theme").unwrap(), None);
}

#[test]
fn legacy_text_months_are_read_as_numbers() {
    let store = store();
    store
        .conn()
        .unwrap()
        .execute(
            "INSERT INTO Person (id, first_name, last_name, birth_year, birth_month)
             VALUES (3, 'Anna', 'Smith', 1700, 'Mar');",
            [],
        )
        .unwrap();

    let anna = PersonRepository::new(&store).get_by_id(3).unwrap().unwrap();
    assert_eq!(anna.birth, Some(PartialDate::year_month(1700, 3).unwrap()));
}

#[test]
fn mutations_mark_dirty_and_failures_do_not() {
    let store = store();
    let people = PersonRepository::new(&store);
    assert!(!store.is_dirty());

    let id = people.insert(&person("Anna", "Smith", None)).unwrap();
    assert!(store.is_dirty());

    store.mark_clean();
    assert!(people.delete(id + 1).is_err());
    assert!(!store.is_dirty());

    people.delete(id).unwrap();
    assert!(store.is_dirty());
}

#[test]
fn closed_store_fails_every_call() {
    let mut document = dynasty_core::Document::untitled().unwrap();
    document.close();
    let people = PersonRepository::new(document.store());
    assert!(matches!(
        people.get_all().unwrap_err(),
        PersistenceError::StoreClosed
    ));
    assert!(matches!(
        people.insert(&person("Anna", "Smith", None)).unwrap_err(),
        PersistenceError::StoreClosed
    ));
}

#[test]
fn set_family_with_unknown_member_changes_nothing() {
    let store = store();
    let family_id = FamilyRepository::new(&store)
        .insert(&Family::new("Smith"))
        .unwrap();
    let people = PersonRepository::new(&store);
    let anna = people.insert(&Person::new("Anna", "Smith")).unwrap();
    store.mark_clean();

    let err = people
        .set_family(&[anna, 999], Some(family_id))
        .unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::NotFound {
            entity: "Person",
            id: 999
        }
    ));
    assert_eq!(people.get_by_id(anna).unwrap().unwrap().family_id, None);
    assert!(!store.is_dirty());

    people.set_family(&[anna], Some(family_id)).unwrap();
    assert_eq!(
        people.get_by_id(anna).unwrap().unwrap().family_id,
        Some(family_id)
    );
    assert!(store.is_dirty());
}
