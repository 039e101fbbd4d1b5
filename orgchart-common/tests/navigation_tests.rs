//! End-to-end hierarchy and navigation scenarios

use orgchart_common::config::RootConfig;
use orgchart_common::hierarchy::{direct_subordinates, next_tier};
use orgchart_common::navigation::{Navigator, View};
use orgchart_common::regime::RegimeFilter;
use orgchart_common::{classify, Level, Person, Tier};

fn pat_di_gi() -> Vec<Person> {
    vec![
        Person::new("Pat", "Presidente", ""),
        Person::new("Di", "Diretor", "Pat"),
        Person::new("Gi", "Gerente", "Di"),
    ]
}

// ============================================================================
// Root → drill → back
// ============================================================================

#[test]
fn test_root_drill_and_back() {
    let people = pat_di_gi();
    let config = RootConfig::default();
    let mut nav = Navigator::new();

    let initial = nav.root_view(&people, &config);
    assert_eq!(initial.president.as_ref().unwrap().name, "Pat");
    let directors: Vec<&str> = initial.directors.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(directors, vec!["Di"]);
    assert!(initial.vacancy.is_none());

    let di = people[1].clone();
    let view = nav.descend(&people, &di, Level::Root);
    assert_eq!(view.groups.len(), 1);
    assert_eq!(view.groups[0].tier, Tier::Manager);
    assert_eq!(view.groups[0].people[0].name, "Gi");

    match nav.ascend(&people, &config) {
        View::Root(root) => assert_eq!(root, initial),
        other => panic!("expected root view, got {:?}", other),
    }
    assert!(nav.history().is_empty());
}

#[test]
fn test_leaf_opens_empty_staff_view() {
    let people = pat_di_gi();
    let config = RootConfig::default();
    let mut nav = Navigator::new();
    nav.root_view(&people, &config);
    nav.descend(&people, &people[1], Level::Root);

    let gi = people[2].clone();
    let subs = direct_subordinates(&people, &gi);
    assert!(subs.is_empty());
    assert_eq!(next_tier(Level::Tier(Tier::Manager), &subs), Tier::Staff);

    let view = nav.descend(&people, &gi, Level::Tier(Tier::Manager));
    assert_eq!(view.person.name, "Gi");
    assert_eq!(view.level, Level::Tier(Tier::Staff));
    assert!(view.groups.is_empty());

    let trail: Vec<&str> = nav.history().iter().map(|e| e.person.name.as_str()).collect();
    assert_eq!(trail, vec!["Pat", "Di"]);
    assert_eq!(nav.current_person().unwrap().name, "Gi");

    match nav.ascend(&people, &config) {
        View::Drill(back) => assert_eq!(back.person.name, "Di"),
        other => panic!("expected drill view, got {:?}", other),
    }
}

#[test]
fn test_classifier_precedence() {
    assert_eq!(classify("Director and Coordinator"), Tier::Director);
}

#[test]
fn test_substring_false_positive() {
    let people = vec![
        Person::new("Jo", "Gerente", ""),
        Person::new("Rui", "Analista", "Joana"),
        Person::new("Ana", "Analista", "JO"),
    ];
    let subs: Vec<String> = direct_subordinates(&people, &people[0])
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(subs, vec!["Rui".to_string(), "Ana".to_string()]);
}

#[test]
fn test_filter_is_applied_before_hierarchy() {
    use orgchart_common::EmploymentType;

    let mut people = pat_di_gi();
    people[0].employment_type = Some(EmploymentType::Clt);
    people[1].employment_type = Some(EmploymentType::Pj);
    let mut st = Person::new("St", "Analista", "Gi");
    st.employment_type = Some(EmploymentType::Clt);
    people.push(st);

    let filtered = RegimeFilter::Only(EmploymentType::Clt).apply(&people);
    let config = RootConfig::default();
    let mut nav = Navigator::new();
    let root = nav.root_view(&filtered, &config);
    assert!(root.directors.is_empty(), "Di is PJ");
    assert!(
        direct_subordinates(&filtered, &filtered[0]).is_empty(),
        "St does not re-attach to Pat"
    );
}

#[test]
fn test_vacancy_is_navigable() {
    let people = pat_di_gi();
    let config = RootConfig {
        expected_directors: vec!["Di".into(), "Do".into()],
        ..Default::default()
    };
    let mut nav = Navigator::new();
    let root = nav.root_view(&people, &config);
    let vacancy = root.vacancy.expect("Do is missing");
    assert_eq!(vacancy.name, "VAGA EM ABERTO");
    assert_eq!(vacancy.manager_name, "Pat");

    let view = nav.descend(&people, &vacancy, Level::Root);
    assert!(view.person.is_vacancy);
    assert_eq!(view.level, Level::Tier(Tier::Staff));
    assert!(view.groups.is_empty());
    assert_eq!(nav.history().len(), 1);
    assert_eq!(nav.history()[0].level, Level::Root);

    match nav.current_view(&people, &config) {
        View::Drill(current) => assert_eq!(current.person.name, "VAGA EM ABERTO"),
        other => panic!("expected vacancy drill view, got {:?}", other),
    }
    assert!(matches!(nav.ascend(&people, &config), View::Root(_)));
}
