//! Roster mutations against the in-memory record store

use orgchart_common::normalize::to_store_row;
use orgchart_common::roster::Roster;
use orgchart_common::store::{MemoryStore, RecordStore};
use orgchart_common::{Error, NewPerson, Person, PersonUpdate};
use serde_json::Value;

/// Store seeded from `people`, and the roster loaded back from it
async fn seeded(people: &[Person]) -> (MemoryStore, Roster) {
    let rows = people
        .iter()
        .map(|p| Value::Object(to_store_row(p)))
        .collect();
    let store = MemoryStore::with_rows(rows);
    let roster = Roster::load(&store).await.unwrap();
    (store, roster)
}

fn manager_of(roster: &Roster, name: &str) -> String {
    roster.find(name).unwrap().manager_name.clone()
}

// ============================================================================
// Edit cascade
// ============================================================================

#[tokio::test]
async fn test_rename_cascades_case_insensitively() {
    let (store, mut roster) = seeded(&[
        Person::new("B", "Gerente", ""),
        Person::new("A", "Analista", "B"),
        Person::new("C", "Analista", "b"),
        Person::new("D", "Analista", "Bob"),
    ])
    .await;

    let update = PersonUpdate {
        name: "B2".into(),
        title: "Gerente".into(),
        area: "TI".into(),
        ..Default::default()
    };
    let edited = roster.edit(&store, "B", update).await.unwrap();
    assert!(edited.is_clean());

    assert_eq!(manager_of(&roster, "A"), "B2");
    assert_eq!(manager_of(&roster, "C"), "B2");
    assert_eq!(manager_of(&roster, "D"), "Bob", "cascade uses equality");

    let stored = store.rows().await;
    let c = stored.iter().find(|r| r["nome"] == "C").unwrap();
    assert_eq!(c["gestor"], "B2");
}

#[tokio::test]
async fn test_edit_backend_failure_keeps_local_change() {
    let (store, mut roster) = seeded(&[
        Person::new("B", "Gerente", ""),
        Person::new("A", "Analista", "B"),
    ])
    .await;
    store.set_failing(true).await;

    let update = PersonUpdate {
        name: "Bea".into(),
        title: "Gerente".into(),
        area: "TI".into(),
        ..Default::default()
    };
    let edited = roster.edit(&store, "B", update).await.unwrap();
    assert_eq!(edited.backend_failures.len(), 2, "own row plus one cascade");
    assert!(roster.find("Bea").is_some());
    assert_eq!(manager_of(&roster, "A"), "Bea");
}

#[tokio::test]
async fn test_edit_keeps_unrecognised_regime_in_store() {
    let store = MemoryStore::with_rows(vec![serde_json::json!({
        "nome": "Eva",
        "cargo": "Analista",
        "area": "TI",
        "gestor": "Gi",
        "regimeContratacao": "Estágio"
    })]);
    let mut roster = Roster::load(&store).await.unwrap();
    assert_eq!(roster.find("Eva").unwrap().employment_type, None);

    let update = PersonUpdate {
        name: "Eva".into(),
        title: "Analista Jr".into(),
        area: "TI".into(),
        ..Default::default()
    };
    assert!(roster.edit(&store, "Eva", update).await.unwrap().is_clean());

    let stored = store.rows().await;
    assert_eq!(stored[0]["cargo"], "Analista Jr");
    assert_eq!(stored[0]["regimeContratacao"], "Estágio");
}

// ============================================================================
// Delete and reassignment
// ============================================================================

#[tokio::test]
async fn test_delete_refused_then_reassign_and_delete() {
    let (store, mut roster) = seeded(&[
        Person::new("Di", "Diretor", "Pat"),
        Person::new("Gi", "Gerente", "Di"),
        Person::new("X", "Analista", "Gi"),
        Person::new("Y", "Analista", "gi"),
        Person::new("Ho", "Gerente", "Di"),
    ])
    .await;
    let before = roster.people().to_vec();

    match roster.delete(&store, "Gi").await {
        Err(Error::ReassignmentRequired { name, subordinates }) => {
            assert_eq!(name, "Gi");
            assert_eq!(subordinates, vec!["X".to_string(), "Y".to_string()]);
        }
        other => panic!("expected ReassignmentRequired, got {:?}", other.map(|m| m.value)),
    }
    assert_eq!(roster.people(), before.as_slice());

    let deleted = roster.reassign_and_delete(&store, "Gi", "Ho").await.unwrap();
    assert!(deleted.is_clean());
    assert_eq!(deleted.value.name, "Gi");
    assert!(roster.find("Gi").is_none());
    assert_eq!(manager_of(&roster, "X"), "Ho");
    assert_eq!(manager_of(&roster, "Y"), "Ho");
    assert_eq!(store.fetch_all().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_reassign_and_delete_to_superstring_name() {
    let (store, mut roster) = seeded(&[
        Person::new("Ana", "Gerente", "Di"),
        Person::new("Ana Paula", "Gerente", "Di"),
        Person::new("Rui", "Analista", "Ana"),
    ])
    .await;

    let deleted = roster
        .reassign_and_delete(&store, "Ana", "Ana Paula")
        .await
        .unwrap();
    assert_eq!(deleted.value.name, "Ana");
    assert!(roster.people().iter().all(|p| p.name != "Ana"));
    assert_eq!(manager_of(&roster, "Rui"), "Ana Paula");

    let stored = store.fetch_all().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|r| r["nome"] != "Ana"));
}

#[tokio::test]
async fn test_delete_unknown_is_not_found() {
    let (store, mut roster) = seeded(&[Person::new("Di", "Diretor", "")]).await;
    assert!(matches!(
        roster.delete(&store, "Nobody").await,
        Err(Error::NotFound(_))
    ));
}

// ============================================================================
// Backend failures never roll back
// ============================================================================

#[tokio::test]
async fn test_add_and_delete_survive_backend_outage() {
    let store = MemoryStore::new();
    let mut roster = Roster::default();
    store.set_failing(true).await;

    let added = roster
        .add(
            &store,
            NewPerson {
                name: "Ana".into(),
                title: "Analista".into(),
                area: "TI".into(),
                manager_name: "Gi".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(added.backend_failures.len(), 1);
    assert_eq!(added.backend_failures[0].operation, "insert");
    assert!(added.value.id.is_none());
    assert_eq!(roster.len(), 1);

    // Local-only record: no backend call, so no failure either
    let deleted = roster.delete(&store, "ana").await.unwrap();
    assert!(deleted.is_clean());
    assert!(roster.is_empty());
}

#[tokio::test]
async fn test_delete_with_id_reports_backend_failure() {
    let (store, mut roster) = seeded(&[Person::new("Ana", "Analista", "Gi")]).await;
    store.set_failing(true).await;

    let deleted = roster.delete(&store, "Ana").await.unwrap();
    assert_eq!(deleted.backend_failures.len(), 1);
    assert!(roster.is_empty());
}

#[tokio::test]
async fn test_load_fails_when_store_down() {
    let store = MemoryStore::new();
    store.set_failing(true).await;
    assert!(matches!(
        Roster::load(&store).await,
        Err(Error::BackendUnavailable(_))
    ));
}
