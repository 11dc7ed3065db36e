use trellis_core::{BoardId, CardData, CardId, ColumnId, Trellis, TrellisError};

async fn board_with_columns(trellis: &Trellis, titles: &[&str]) -> (BoardId, Vec<ColumnId>) {
    let board = trellis.create_board("Scenario").await.unwrap();
    let mut ids = Vec::new();
    for title in titles {
        ids.push(trellis.columns().insert(&board.id, title, None).await.unwrap().id);
    }
    (board.id, ids)
}

async fn column_titles(trellis: &Trellis, board: &BoardId) -> Vec<(usize, String)> {
    trellis
        .columns()
        .list(board)
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.position, c.title))
        .collect()
}

async fn append_cards(trellis: &Trellis, column: &ColumnId, titles: &[&str]) -> Vec<CardId> {
    let mut ids: Vec<CardId> = Vec::new();
    for title in titles {
        let card = trellis
            .cards()
            .create_card(column, CardData::new(*title), ids.last().copied(), "alice")
            .await
            .unwrap();
        ids.push(card.id);
    }
    ids
}

async fn card_titles(trellis: &Trellis, column: &ColumnId) -> Vec<String> {
    trellis
        .cards()
        .get_column_view(column)
        .await
        .unwrap()
        .cards
        .into_iter()
        .map(|c| c.title)
        .collect()
}

#[tokio::test]
async fn swap_move_exchanges_positions() {
    let trellis = Trellis::in_memory();
    let (board, cols) = board_with_columns(&trellis, &["X", "Y", "Z"]).await;

    trellis.columns().move_column(&board, &cols[1], 2).await.unwrap();

    assert_eq!(
        column_titles(&trellis, &board).await,
        vec![
            (0, "X".to_string()),
            (1, "Z".to_string()),
            (2, "Y".to_string())
        ]
    );
}

#[tokio::test]
async fn cross_column_move_relinks_both_columns() {
    let trellis = Trellis::in_memory();
    let (_, cols) = board_with_columns(&trellis, &["A", "B"]).await;
    let a = append_cards(&trellis, &cols[0], &["c1", "c2", "c3"]).await;
    let b = append_cards(&trellis, &cols[1], &["c4"]).await;

    trellis
        .cards()
        .update_card_position(&a[1], Some(b[0]), &cols[1])
        .await
        .unwrap();

    assert_eq!(card_titles(&trellis, &cols[0]).await, vec!["c1", "c3"]);
    assert_eq!(card_titles(&trellis, &cols[1]).await, vec!["c4", "c2"]);
}

#[tokio::test]
async fn delete_restore_round_trip_returns_to_slot() {
    let trellis = Trellis::in_memory();
    let (board, cols) = board_with_columns(&trellis, &["A", "B", "C", "D"]).await;

    trellis.columns().soft_delete(&board, &cols[2]).await.unwrap();
    assert_eq!(
        column_titles(&trellis, &board).await,
        vec![
            (0, "A".to_string()),
            (1, "B".to_string()),
            (2, "D".to_string())
        ]
    );

    let restored = trellis.columns().restore(&board, &cols[2]).await.unwrap();
    assert_eq!(restored.position, 2);
    assert_eq!(
        column_titles(&trellis, &board).await,
        vec![
            (0, "A".to_string()),
            (1, "B".to_string()),
            (2, "C".to_string()),
            (3, "D".to_string())
        ]
    );
}

#[tokio::test]
async fn duplicate_title_does_not_touch_positions() {
    let trellis = Trellis::in_memory();
    let (board, _) = board_with_columns(&trellis, &["A", "B"]).await;
    let before = column_titles(&trellis, &board).await;

    let result = trellis.columns().insert(&board, "B", Some(0)).await;

    assert!(matches!(result, Err(TrellisError::DuplicateTitle { .. })));
    assert_eq!(column_titles(&trellis, &board).await, before);
}

#[tokio::test]
async fn deleted_cards_never_surface() {
    let trellis = Trellis::in_memory();
    let (_, cols) = board_with_columns(&trellis, &["A", "B"]).await;
    let a = append_cards(&trellis, &cols[0], &["c1", "c2", "c3"]).await;

    trellis.cards().delete_card(&a[0], "bob").await.unwrap();
    trellis
        .cards()
        .update_card_position(&a[2], None, &cols[1])
        .await
        .unwrap();

    assert_eq!(card_titles(&trellis, &cols[0]).await, vec!["c2"]);
    assert_eq!(card_titles(&trellis, &cols[1]).await, vec!["c3"]);
}

#[tokio::test]
async fn columns_keep_cards_through_column_moves() {
    let trellis = Trellis::in_memory();
    let (board, cols) = board_with_columns(&trellis, &["A", "B"]).await;
    append_cards(&trellis, &cols[0], &["c1", "c2"]).await;

    trellis.columns().move_column(&board, &cols[0], 1).await.unwrap();

    assert_eq!(card_titles(&trellis, &cols[0]).await, vec!["c1", "c2"]);
}

#[tokio::test]
async fn concurrent_inserts_stay_dense() {
    let trellis = Trellis::in_memory();
    let board = trellis.create_board("Busy").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let columns = trellis.columns();
        let board_id = board.id;
        handles.push(tokio::spawn(async move {
            columns
                .insert(&board_id, &format!("col-{}", i), Some(i % 3))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let positions: Vec<usize> = column_titles(&trellis, &board.id)
        .await
        .into_iter()
        .map(|(p, _)| p)
        .collect();
    assert_eq!(positions, (0..16).collect::<Vec<_>>());
}
