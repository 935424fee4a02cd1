use gutmatrix_core::db::open_db_in_memory;
use gutmatrix_core::{
    problem_id_for_name, Criterion, CoreError, ErrorKind, ProblemId, ProblemRegistry, Role,
    SqliteProblemRepository, SqliteVoteRepository, ValidationError, VoteStore,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn create_problem(conn: &Connection, name: &str) -> ProblemId {
    ProblemRegistry::new(SqliteProblemRepository::try_new(conn).unwrap())
        .create_or_update(Role::Admin, name, None)
        .unwrap()
}

fn store(conn: &Connection) -> VoteStore<SqliteVoteRepository<'_>> {
    VoteStore::new(SqliteVoteRepository::try_new(conn).unwrap())
}

#[test]
fn upsert_then_get_returns_latest_vote() {
    let conn = setup();
    let id = create_problem(&conn, "Outages");
    let store = store(&conn);

    let written = store.upsert_vote(id, "ana", 4, 5, 3).unwrap();
    let loaded = store.get_vote(id, "ana").unwrap().unwrap();
    assert_eq!(loaded, written);
    assert_eq!(loaded.score.gravity(), 4);
    assert_eq!(loaded.score.urgency(), 5);
    assert_eq!(loaded.score.trend(), 3);
}

#[test]
fn revote_replaces_instead_of_appending() {
    let conn = setup();
    let id = create_problem(&conn, "Outages");
    let store = store(&conn);

    store.upsert_vote(id, "ana", 1, 1, 1).unwrap();
    store.upsert_vote(id, "bo", 2, 2, 2).unwrap();
    let second = store.upsert_vote(id, "ana", 5, 4, 3).unwrap();

    let votes = store.list_votes(id).unwrap();
    assert_eq!(votes.len(), 2);
    let ana = votes
        .iter()
        .find(|vote| vote.participant_id.as_str() == "ana")
        .unwrap();
    assert_eq!(ana.score, second.score);
}

#[test]
fn participant_id_is_trimmed_before_keying() {
    let conn = setup();
    let id = create_problem(&conn, "Outages");
    let store = store(&conn);

    store.upsert_vote(id, "ana", 1, 1, 1).unwrap();
    store.upsert_vote(id, "  ana ", 2, 2, 2).unwrap();

    assert_eq!(store.list_votes(id).unwrap().len(), 1);
    assert_eq!(
        store.get_vote(id, "ana").unwrap().unwrap().score.gravity(),
        2
    );
}

#[test]
fn out_of_range_vote_is_rejected_and_previous_vote_kept() {
    let conn = setup();
    let id = create_problem(&conn, "Outages");
    let store = store(&conn);

    let original = store.upsert_vote(id, "ana", 3, 3, 3).unwrap();

    for (g, u, t, criterion) in [
        (0, 3, 3, Criterion::Gravity),
        (3, 6, 3, Criterion::Urgency),
        (3, 3, -1, Criterion::Trend),
    ] {
        let err = store.upsert_vote(id, "ana", g, u, t).unwrap_err();
        match err {
            CoreError::Validation(ValidationError::CriterionOutOfRange {
                criterion: rejected,
                ..
            }) => assert_eq!(rejected, criterion),
            other => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(store.get_vote(id, "ana").unwrap().unwrap(), original);
}

#[test]
fn blank_participant_is_rejected() {
    let conn = setup();
    let id = create_problem(&conn, "Outages");
    let store = store(&conn);

    let err = store.upsert_vote(id, "   ", 3, 3, 3).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::EmptyParticipant)
    ));
}

#[test]
fn vote_on_unknown_problem_is_not_found() {
    let conn = setup();
    let store = store(&conn);
    let missing = problem_id_for_name("ghost");

    let err = store.upsert_vote(missing, "ana", 3, 3, 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(
        store.list_votes(missing).unwrap_err(),
        CoreError::NotFound(id) if id == missing
    ));
}

#[test]
fn get_vote_for_non_voter_is_none() {
    let conn = setup();
    let id = create_problem(&conn, "Outages");
    let store = store(&conn);

    assert!(store.get_vote(id, "ana").unwrap().is_none());
}

#[test]
fn participant_ballot_pairs_every_problem_with_own_vote() {
    let conn = setup();
    let first = create_problem(&conn, "First");
    let second = create_problem(&conn, "Second");
    let store = store(&conn);

    store.upsert_vote(second, "ana", 2, 3, 4).unwrap();
    store.upsert_vote(first, "bo", 5, 5, 5).unwrap();

    let ballot = store.participant_ballot("ana").unwrap();
    assert_eq!(ballot.len(), 2);
    assert_eq!(ballot[0].problem.id, first);
    assert!(ballot[0].vote.is_none());
    assert_eq!(ballot[1].problem.id, second);
    assert_eq!(ballot[1].vote.as_ref().unwrap().score.product(), 24);
}
