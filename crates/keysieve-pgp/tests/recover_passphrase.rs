use keysieve_core::{
    run_search, CandidateSource, KeysieveError, Outcome, SearchCoordinator, SearchOptions,
};
use keysieve_pgp::{load_key_set, PgpKeyUnlocker};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn recovers_passphrase_shared_by_two_keys() {
    let keys = load_key_set(&[fixture("alice.asc"), fixture("bob.asc")]).unwrap();
    let outcome = run_search(
        PgpKeyUnlocker,
        words(&["alpha", "hunter2", "swordfish", "beta"]),
        keys,
        2,
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::Found("swordfish".into()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn keys_with_different_passphrases_are_not_found() {
    let keys = load_key_set(&[fixture("alice.asc"), fixture("carol.asc")]).unwrap();
    let coordinator =
        SearchCoordinator::new(PgpKeyUnlocker, keys, SearchOptions::default().with_concurrency(4))
            .unwrap();

    let report = coordinator
        .search(CandidateSource::new(words(&["swordfish", "hunter2", "letmein"])))
        .await
        .unwrap();

    assert_eq!(report.outcome, Outcome::NotFound { interrupted: false });
    assert_eq!(report.attempted, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn single_key_recovery() {
    let keys = load_key_set(&[fixture("carol.asc")]).unwrap();
    let outcome = run_search(PgpKeyUnlocker, words(&["swordfish", "hunter2"]), keys, 1)
        .await
        .unwrap();
    assert_eq!(outcome.passphrase(), Some("hunter2"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn recovers_passphrase_of_key_with_encryption_subkey() {
    let keys = load_key_set(&[fixture("dave.asc"), fixture("alice.asc")]).unwrap();
    let outcome = run_search(PgpKeyUnlocker, words(&["hunter2", "swordfish"]), keys, 2)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Found("swordfish".into()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn primary_passphrase_alone_is_not_a_match() {
    let keys = load_key_set(&[fixture("erin.asc")]).unwrap();
    let outcome = run_search(PgpKeyUnlocker, words(&["swordfish", "hunter2"]), keys, 2)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::NotFound { interrupted: false });
}

#[tokio::test]
async fn empty_key_list_is_a_configuration_error() {
    let keys = load_key_set::<PathBuf>(&[]).unwrap();
    let err = run_search(PgpKeyUnlocker, words(&["swordfish"]), keys, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, KeysieveError::InvalidConfig(_)));
}
