use club_match_ingest::{
    RawRow, RowError,
    ingest::{normalize, normalize_batch, read_rows_from_reader},
    reconcile::{Snapshot, detect_new, flatten_matches, merge, rows_to_matches},
    select_most_recent,
};

fn row(match_id: &str, players: &str) -> RawRow {
    RawRow::new()
        .with("matchId", match_id)
        .with("timestamp", "T")
        .with("timeAgo", "2h")
        .with("players", players)
}

/// One club, one player with only a name and goals
#[test]
fn test_minimal_row_takes_defaults() {
    let game = normalize(&row(
        "42",
        "{'club1': {'p1': {'playername': 'Alice', 'goals': 2}}}",
    ))
    .unwrap();

    assert_eq!(game.match_id, "42");
    assert_eq!(game.club_ids(), vec!["club1"]);
    let alice = &game.players_for_club("club1")[0];
    assert_eq!(alice.player_id, "p1");
    assert_eq!(alice.player_name, "Alice");
    assert_eq!(alice.goals, 2);
    assert_eq!(alice.assists, 0);
    assert_eq!(alice.rating, 0.0);
    assert_eq!(alice.position, "Unknown");
    assert_eq!(alice.archetype_id, "0");
}

#[test]
fn test_numeric_strings_and_floats_are_coerced() {
    let game = normalize(&row(
        "1",
        r#"{"c": {"p": {"goals": "3", "assists": 2.9, "rating": "7.25", "wins": True, "saves": None}}}"#,
    ))
    .unwrap();

    let p = &game.players_for_club("c")[0];
    assert_eq!(p.goals, 3);
    assert_eq!(p.assists, 2);
    assert_eq!(p.rating, 7.25);
    assert_eq!(p.wins, 1);
    assert_eq!(p.saves, 0);
}

#[test]
fn test_missing_column_and_bad_literal_are_row_errors() {
    let no_players = RawRow::new()
        .with("matchId", "1")
        .with("timestamp", "T")
        .with("timeAgo", "now");
    assert_eq!(
        normalize(&no_players).unwrap_err(),
        RowError::missing_field("players")
    );

    assert!(matches!(
        normalize(&row("1", "[1, 2]")).unwrap_err(),
        RowError::MalformedPlayersField { .. }
    ));
}

#[test]
fn test_clubs_without_players_are_kept() {
    let game = normalize(&row("9", "{'empty': {}, 'full': {'p': {}}}")).unwrap();
    assert_eq!(game.club_ids(), vec!["empty", "full"]);
    assert!(game.players_for_club("empty").is_empty());
    assert_eq!(game.player_count(), 1);
}

#[test]
fn test_csv_input_through_merge() {
    let csv_text = "\
matchId,timestamp,timeAgo,players,extra
2,T2,1h,\"{'a': {'x': {'goals': 1}}, 'b': {'y': {}}}\",ignored
1,T1,3h,\"{'a': {'x': {'goals': 4}}}\",ignored
";
    let rows = read_rows_from_reader(csv_text.as_bytes()).unwrap();
    let outcome = normalize_batch(&rows);
    assert!(outcome.failures.is_empty());

    let previous = Snapshot::from_rows(flatten_matches(&outcome.matches[1..]));
    let detection = detect_new(&outcome.matches, Some(&previous));
    assert_eq!(detection.new_match_ids, vec!["2"]);

    let merged = merge(&outcome.matches, &previous).unwrap();
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.get("1", "x").unwrap().goals, 4);

    let rebuilt = rows_to_matches(merged.rows());
    assert_eq!(rebuilt.len(), 2);
    assert_eq!(rebuilt[0].match_id, "1");

    let recent = select_most_recent(&outcome.matches, detection.has_new()).unwrap();
    assert_eq!(recent.match_id, "2");
    assert_eq!(recent.players.len(), 2);
}
