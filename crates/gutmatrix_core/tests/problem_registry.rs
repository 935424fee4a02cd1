use gutmatrix_core::db::open_db_in_memory;
use gutmatrix_core::{
    problem_id_for_name, CoreError, ErrorKind, ProblemRegistry, ReportBuilder, Role,
    SqliteProblemRepository, SqliteVoteRepository, ValidationError, VoteStore,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn registry(conn: &Connection) -> ProblemRegistry<SqliteProblemRepository<'_>> {
    ProblemRegistry::new(SqliteProblemRepository::try_new(conn).unwrap())
}

fn votes(conn: &Connection) -> VoteStore<SqliteVoteRepository<'_>> {
    VoteStore::new(SqliteVoteRepository::try_new(conn).unwrap())
}

#[test]
fn create_returns_name_derived_id() {
    let conn = setup();
    let registry = registry(&conn);

    let id = registry
        .create_or_update(Role::Admin, "Late deliveries", Some("carrier misses SLA"))
        .unwrap();
    assert_eq!(id, problem_id_for_name("late deliveries"));

    let problem = registry.get(id).unwrap().unwrap();
    assert_eq!(problem.name, "Late deliveries");
    assert_eq!(problem.description.as_deref(), Some("carrier misses SLA"));
}

#[test]
fn blank_name_is_a_validation_error() {
    let conn = setup();
    let registry = registry(&conn);

    let err = registry
        .create_or_update(Role::Admin, "   ", None)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::EmptyProblemName)
    ));
    assert!(registry.list().unwrap().is_empty());
}

#[test]
fn recreating_same_name_updates_description_but_keeps_identity_and_order() {
    let conn = setup();
    let registry = registry(&conn);

    let first = registry
        .create_or_update(Role::Admin, "Churn", Some("v1"))
        .unwrap();
    let second = registry.create_or_update(Role::Admin, "Outages", None).unwrap();
    let before = registry.get(first).unwrap().unwrap();

    let again = registry
        .create_or_update(Role::Admin, "  CHURN ", Some("v2"))
        .unwrap();
    assert_eq!(again, first);

    let after = registry.get(first).unwrap().unwrap();
    assert_eq!(after.description.as_deref(), Some("v2"));
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.position, before.position);
    assert!(after.updated_at >= before.updated_at);

    let listed: Vec<_> = registry.list().unwrap().into_iter().map(|p| p.id).collect();
    assert_eq!(listed, vec![first, second]);
}

#[test]
fn list_is_in_creation_order() {
    let conn = setup();
    let registry = registry(&conn);

    let names = ["Zeta", "Alpha", "Mid"];
    for name in names {
        registry.create_or_update(Role::Admin, name, None).unwrap();
    }

    let listed: Vec<_> = registry
        .list()
        .unwrap()
        .into_iter()
        .map(|problem| problem.name)
        .collect();
    assert_eq!(listed, names);
}

#[test]
fn remove_cascades_votes_and_blocks_new_votes() {
    let conn = setup();
    let registry = registry(&conn);
    let votes = votes(&conn);

    let id = registry.create_or_update(Role::Admin, "Outages", None).unwrap();
    for participant in ["ana", "bo", "cy"] {
        votes.upsert_vote(id, participant, 3, 3, 3).unwrap();
    }
    assert_eq!(votes.list_votes(id).unwrap().len(), 3);

    assert!(registry.remove(Role::Admin, id).unwrap());

    let remaining: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM votes WHERE problem_uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining, 0);

    let err = votes.upsert_vote(id, "ana", 5, 5, 5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let reports = ReportBuilder::new(SqliteVoteRepository::try_new(&conn).unwrap());
    assert!(matches!(
        reports.aggregate(id).unwrap_err(),
        CoreError::NotFound(missing) if missing == id
    ));
}

#[test]
fn remove_unknown_id_returns_false() {
    let conn = setup();
    let registry = registry(&conn);

    assert!(!registry
        .remove(Role::Admin, problem_id_for_name("never created"))
        .unwrap());
}

#[test]
fn participant_role_cannot_mutate_registry() {
    let conn = setup();
    let registry = registry(&conn);
    let id = registry.create_or_update(Role::Admin, "Churn", None).unwrap();

    let create_err = registry
        .create_or_update(Role::Participant, "Sneaky", None)
        .unwrap_err();
    assert!(matches!(create_err, CoreError::AdminRequired));
    assert_eq!(create_err.kind(), ErrorKind::Forbidden);

    assert!(matches!(
        registry.remove(Role::Participant, id).unwrap_err(),
        CoreError::AdminRequired
    ));
    assert!(matches!(
        registry.reset(Role::Participant).unwrap_err(),
        CoreError::AdminRequired
    ));

    assert_eq!(registry.list().unwrap().len(), 1);
}

#[test]
fn reset_clears_problems_and_votes() {
    let conn = setup();
    let registry = registry(&conn);
    let votes = votes(&conn);

    let first = registry.create_or_update(Role::Admin, "One", None).unwrap();
    let second = registry.create_or_update(Role::Admin, "Two", None).unwrap();
    votes.upsert_vote(first, "ana", 1, 2, 3).unwrap();
    votes.upsert_vote(second, "ana", 3, 2, 1).unwrap();
    votes.upsert_vote(second, "bo", 4, 4, 4).unwrap();

    let summary = registry.reset(Role::Admin).unwrap();
    assert_eq!(summary.problems_removed, 2);
    assert_eq!(summary.votes_removed, 3);
    assert!(registry.list().unwrap().is_empty());
}
