use chainsaw::config::StoreError;
use chainsaw::modules::trophy::crud::TrophyCrud;
use chainsaw::modules::trophy::interface::TrophyRepository;
use chainsaw::modules::trophy::model::{DisplayedTrophy, TrophyChange};

use crate::common::database::MysqlContext;

fn slots(displayed: &[DisplayedTrophy]) -> Vec<(i32, i32)> {
    displayed
        .iter()
        .map(|t| (t.trophy_id, t.display_order))
        .collect()
}

#[tokio::test]
async fn apply_changes_commits_in_order() {
    let Some(mut ctx) = MysqlContext::connect().await else {
        return;
    };
    let ids = ctx.add_trophies(2).await;
    let crud = TrophyCrud::new(ctx.db.clone());

    crud.apply_changes(
        ctx.user_id,
        &[
            TrophyChange::Insert { trophy_id: ids[0], display_order: 0 },
            TrophyChange::Insert { trophy_id: ids[1], display_order: 1 },
        ],
    )
    .await
    .unwrap();

    // Swap slots: deletes run before the inserts that reuse them
    crud.apply_changes(
        ctx.user_id,
        &[
            TrophyChange::Delete { trophy_id: ids[0] },
            TrophyChange::Delete { trophy_id: ids[1] },
            TrophyChange::Insert { trophy_id: ids[1], display_order: 0 },
            TrophyChange::Insert { trophy_id: ids[0], display_order: 1 },
        ],
    )
    .await
    .unwrap();

    let displayed = crud.displayed_trophies(ctx.user_id).await.unwrap();
    assert_eq!(slots(&displayed), vec![(ids[1], 0), (ids[0], 1)]);
    assert_eq!(displayed[0].name, "Test trophy 1");

    ctx.cleanup().await;
}

#[tokio::test]
async fn failed_insert_rolls_back_whole_batch() {
    let Some(mut ctx) = MysqlContext::connect().await else {
        return;
    };
    let ids = ctx.add_trophies(3).await;
    let crud = TrophyCrud::new(ctx.db.clone());

    crud.apply_changes(
        ctx.user_id,
        &[TrophyChange::Insert { trophy_id: ids[0], display_order: 0 }],
    )
    .await
    .unwrap();

    // Second insert collides with the first on display slot 1
    let err = crud
        .apply_changes(
            ctx.user_id,
            &[
                TrophyChange::Delete { trophy_id: ids[0] },
                TrophyChange::Insert { trophy_id: ids[1], display_order: 1 },
                TrophyChange::Insert { trophy_id: ids[2], display_order: 1 },
            ],
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.change,
        TrophyChange::Insert { trophy_id: ids[2], display_order: 1 }
    );
    assert!(matches!(err.source, StoreError::UniqueViolation));

    let displayed = crud.displayed_trophies(ctx.user_id).await.unwrap();
    assert_eq!(slots(&displayed), vec![(ids[0], 0)]);

    ctx.cleanup().await;
}

#[tokio::test]
async fn insert_of_unknown_trophy_rolls_back() {
    let Some(mut ctx) = MysqlContext::connect().await else {
        return;
    };
    let ids = ctx.add_trophies(1).await;
    let crud = TrophyCrud::new(ctx.db.clone());

    crud.apply_changes(
        ctx.user_id,
        &[TrophyChange::Insert { trophy_id: ids[0], display_order: 2 }],
    )
    .await
    .unwrap();

    let missing = i32::MAX;
    let err = crud
        .apply_changes(
            ctx.user_id,
            &[
                TrophyChange::Delete { trophy_id: ids[0] },
                TrophyChange::Insert { trophy_id: missing, display_order: 2 },
            ],
        )
        .await
        .unwrap_err();

    assert_eq!(err.change, TrophyChange::Insert { trophy_id: missing, display_order: 2 });
    assert!(matches!(err.source, StoreError::Database(_)));

    let displayed = crud.displayed_trophies(ctx.user_id).await.unwrap();
    assert_eq!(slots(&displayed), vec![(ids[0], 2)]);

    ctx.cleanup().await;
}

#[tokio::test]
async fn delete_by_display_order_counts_rows() {
    let Some(mut ctx) = MysqlContext::connect().await else {
        return;
    };
    let ids = ctx.add_trophies(1).await;
    let crud = TrophyCrud::new(ctx.db.clone());

    crud.apply_changes(
        ctx.user_id,
        &[TrophyChange::Insert { trophy_id: ids[0], display_order: 1 }],
    )
    .await
    .unwrap();

    assert_eq!(crud.delete_by_display_order(ctx.user_id, 1).await.unwrap(), 1);
    assert_eq!(crud.delete_by_display_order(ctx.user_id, 1).await.unwrap(), 0);
    assert!(crud.displayed_trophies(ctx.user_id).await.unwrap().is_empty());

    ctx.cleanup().await;
}
