use clientbook_core::db::open_db_in_memory;
use clientbook_core::{ClientRepository, NewClient, SqliteClientRepository};
use rusqlite::Connection;
use std::collections::HashSet;

#[test]
fn income_greater_than_is_strict_and_complete() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let result = repo.find_by_income_greater_than(2000.0).unwrap();
    assert_eq!(result.len(), 10);
    assert!(result.iter().all(|client| client.income > 2000.0));

    // Completeness: every qualifying record in the full set is returned.
    let expected: HashSet<_> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .filter(|client| client.income > 2000.0)
        .map(|client| client.id)
        .collect();
    let returned: HashSet<_> = result.iter().map(|client| client.id).collect();
    assert_eq!(returned, expected);
}

#[test]
fn income_greater_than_excludes_boundary_value() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let result = repo.find_by_income_greater_than(2500.0).unwrap();
    assert!(result.iter().all(|client| client.income > 2500.0));
    assert_eq!(result.len(), 7);
}

#[test]
fn income_less_than_is_strict() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let result = repo.find_by_income_less_than(2000.0).unwrap();
    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|client| client.income < 2000.0));
}

#[test]
fn income_between_includes_both_boundaries() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let result = repo.find_by_income_between(1000.0, 3000.0).unwrap();
    assert_eq!(result.len(), 6);
    assert!(result
        .iter()
        .all(|client| client.income >= 1000.0 && client.income <= 3000.0));

    // Boundary-valued records are part of the window.
    let bounded = repo.find_by_income_between(1500.0, 2500.0).unwrap();
    assert_eq!(bounded.len(), 6);
    assert!(bounded.iter().any(|client| client.income == 1500.0));
    assert!(bounded.iter().any(|client| client.income == 2500.0));
}

#[test]
fn income_between_inverted_range_yields_empty() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let result = repo.find_by_income_between(3000.0, 1000.0).unwrap();
    assert!(result.is_empty());
}

#[test]
fn income_equal_uses_exact_double_equality() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let result = repo.find_by_income_equal(1500.0).unwrap();
    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|client| client.income == 1500.0));

    assert!(repo.find_by_income_equal(1500.01).unwrap().is_empty());
}

#[test]
fn name_exact_matches_ignoring_case() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let found = repo.find_by_name_exact("gilberto GIL").unwrap().unwrap();
    assert!(found.name.eq_ignore_ascii_case("Gilberto Gil"));
}

#[test]
fn name_exact_absent_reports_none() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_name_exact("Cricia").unwrap().is_none());
}

#[test]
fn name_contains_matches_substring_ignoring_case() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let result = repo.find_by_name_contains("Maria").unwrap();
    assert_eq!(result.len(), 2);
    let names: HashSet<_> = result.iter().map(|client| client.name.as_str()).collect();
    assert_eq!(
        names,
        HashSet::from(["Carolina Maria de Jesus", "Maria Firmina dos Reis"])
    );

    let shouted = repo.find_by_name_contains("MARIA").unwrap();
    assert_eq!(shouted.len(), 2);
}

#[test]
fn name_contains_absent_fragment_yields_empty() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_name_contains("Medeiros").unwrap().is_empty());
}

#[test]
fn name_contains_empty_fragment_matches_every_record() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let result = repo.find_by_name_contains("").unwrap();
    assert_eq!(result.len(), 13);
}

#[test]
fn birth_date_window_returns_exactly_the_enclosed_records() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let start = utc_ms(1970, 1, 1, 0, 0, 0);
    let end = utc_ms(2000, 1, 1, 0, 0, 0);
    let result = repo.find_by_birth_date_between(start, end).unwrap();

    assert_eq!(result.len(), 5);
    let names: HashSet<_> = result.iter().map(|client| client.name.as_str()).collect();
    assert_eq!(
        names,
        HashSet::from([
            "Lázaro Ramos",
            "Carolina Maria de Jesus",
            "Djamila Ribeiro",
            "Jose Saramago",
            "Silvio Almeida",
        ])
    );
}

#[test]
fn birth_date_disjoint_window_yields_empty() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let start = utc_ms(1900, 1, 1, 0, 0, 0);
    let end = utc_ms(1910, 1, 1, 0, 0, 0);
    assert!(repo.find_by_birth_date_between(start, end).unwrap().is_empty());
}

#[test]
fn birth_date_single_year_window_keeps_store_order() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let start = utc_ms(1956, 1, 1, 0, 0, 0);
    let end = utc_ms(1956, 12, 31, 23, 59, 59);
    let result = repo.find_by_birth_date_between(start, end).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].name, "Yuval Noah Harari");
    assert_eq!(result[1].name, "Chimamanda Adichie");
}

#[test]
fn birth_date_inverted_window_yields_empty() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let start = utc_ms(2000, 1, 1, 0, 0, 0);
    let end = utc_ms(1970, 1, 1, 0, 0, 0);
    assert!(repo.find_by_birth_date_between(start, end).unwrap().is_empty());
}

#[test]
fn delete_by_id_removes_one_record_and_redelete_is_noop() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let client = repo
        .find_by_name_exact("Conceição Evaristo")
        .unwrap()
        .unwrap();

    assert!(repo.delete_by_id(client.id).unwrap());
    assert!(!repo.exists(client.id).unwrap());
    assert_eq!(repo.count().unwrap(), 12);

    assert!(!repo.delete_by_id(client.id).unwrap());
    assert_eq!(repo.count().unwrap(), 12);
}

#[test]
fn queries_never_mutate_surviving_records() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let before = repo.list_all().unwrap();
    repo.find_by_income_greater_than(2000.0).unwrap();
    repo.find_by_name_contains("Maria").unwrap();
    repo.find_by_birth_date_between(0, i64::MAX).unwrap();
    let after = repo.list_all().unwrap();

    assert_eq!(before, after);
}

fn seeded_db() -> Connection {
    let conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteClientRepository::try_new(&conn).unwrap();
        for (name, income, birth_date, children) in seed_rows() {
            let mut client = NewClient::new(name, income, birth_date);
            client.children = Some(children);
            repo.insert(&client).unwrap();
        }
        assert_eq!(repo.count().unwrap(), 13);
    }
    conn
}

fn seed_rows() -> Vec<(&'static str, f64, i64, i64)> {
    vec![
        ("Conceição Evaristo", 1500.0, utc_ms(2020, 7, 13, 20, 50, 0), 2),
        ("Lázaro Ramos", 2500.0, utc_ms(1996, 12, 23, 7, 0, 0), 2),
        ("Clarice Lispector", 3800.0, utc_ms(1960, 4, 13, 7, 50, 0), 2),
        ("Carolina Maria de Jesus", 7500.0, utc_ms(1996, 12, 23, 7, 0, 0), 0),
        ("Gilberto Gil", 2500.0, utc_ms(1949, 5, 5, 7, 0, 0), 4),
        ("Djamila Ribeiro", 4500.0, utc_ms(1975, 11, 10, 7, 0, 0), 1),
        ("Jose Saramago", 5000.0, utc_ms(1996, 12, 23, 7, 0, 0), 0),
        ("Toni Morrison", 10000.0, utc_ms(1940, 2, 23, 7, 0, 0), 0),
        ("Yuval Noah Harari", 1500.0, utc_ms(1956, 12, 13, 7, 0, 0), 0),
        ("Chimamanda Adichie", 1500.0, utc_ms(1956, 10, 30, 7, 0, 0), 0),
        ("Silvio Almeida", 4500.0, utc_ms(1970, 9, 23, 7, 0, 0), 2),
        ("Jorge Amado", 2500.0, utc_ms(1918, 9, 23, 7, 0, 0), 0),
        ("Maria Firmina dos Reis", 3100.0, utc_ms(1944, 10, 11, 7, 0, 0), 0),
    ]
}

/// Converts a proleptic-Gregorian UTC datetime to Unix epoch milliseconds.
fn utc_ms(year: i64, month: i64, day: i64, hour: i64, minute: i64, second: i64) -> i64 {
    let shifted_year = if month <= 2 { year - 1 } else { year };
    let era = if shifted_year >= 0 {
        shifted_year / 400
    } else {
        (shifted_year - 399) / 400
    };
    let year_of_era = shifted_year - era * 400;
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * shifted_month + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    let days = era * 146_097 + day_of_era - 719_468;

    ((days * 24 + hour) * 60 + minute) * 60_000 + second * 1000
}
