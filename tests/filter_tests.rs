use axum::http::StatusCode;
use listcrate::ListOptions;

mod common;
use common::{catalog_store, get_list, ids, setup_app, users_store};

async fn item_count(app: &axum::Router, pairs: &[(&str, &str)]) -> u64 {
    let (status, body) = get_list(app, pairs).await;
    assert_eq!(status, StatusCode::OK, "{pairs:?}: {body}");
    body["pageInfo"]["itemCount"].as_u64().unwrap()
}

#[tokio::test]
async fn test_equality_filter() {
    let app = setup_app(&users_store(), "users", ListOptions::default());

    assert_eq!(item_count(&app, &[("status", "active")]).await, 8);
    assert_eq!(item_count(&app, &[("status", "active"), ("role", "admin")]).await, 0);
    assert_eq!(item_count(&app, &[("address.city", "London")]).await, 12);
}

#[tokio::test]
async fn test_equality_on_number_field() {
    let app = setup_app(&users_store(), "users", ListOptions::default());

    let (_, body) = get_list(&app, &[("age", "21")]).await;
    assert_eq!(ids(&body), vec!["u01"]);
}

#[tokio::test]
async fn test_repeated_key_keeps_last_value() {
    let app = setup_app(&users_store(), "users", ListOptions::default());

    assert_eq!(
        item_count(&app, &[("status", "banned"), ("status", "active")]).await,
        8
    );
    assert_eq!(item_count(&app, &[("role", "member"), ("role", "admin")]).await, 2);
}

#[tokio::test]
async fn test_in_list() {
    let app = setup_app(&users_store(), "users", ListOptions::default());

    assert_eq!(item_count(&app, &[("inList[status]", "active,pending")]).await, 17);
}

#[tokio::test]
async fn test_in_list_and_not_in_list_are_complementary() {
    let app = setup_app(&users_store(), "users", ListOptions::default());

    for values in ["active", "active,pending", "banned,nobody", "nobody"] {
        let matched = item_count(&app, &[("inList[status]", values)]).await;
        let excluded = item_count(&app, &[("notInList[status]", values)]).await;
        assert_eq!(matched + excluded, 25, "values={values}");
    }
}

#[tokio::test]
async fn test_not_in_list_wins_over_in_list_on_same_field() {
    let app = setup_app(&users_store(), "users", ListOptions::default());

    let count = item_count(
        &app,
        &[("inList[status]", "active"), ("notInList[status]", "active")],
    )
    .await;
    assert_eq!(count, 17);
}

#[tokio::test]
async fn test_array_of_objects_membership() {
    let app = setup_app(&catalog_store(), "orders", ListOptions::default());

    let (_, body) = get_list(&app, &[("inListArrOfObj[items.sku]", "A1,C3"), ("sort", "_id")]).await;
    assert_eq!(ids(&body), vec!["o1", "o3"]);

    // some element has a sku outside {B2}
    let (_, body) = get_list(&app, &[("notInListArrOfObj[items.sku]", "B2"), ("sort", "_id")]).await;
    assert_eq!(ids(&body), vec!["o1", "o3"]);
}

#[tokio::test]
async fn test_mongo_query_comparison() {
    let app = setup_app(&users_store(), "users", ListOptions::default());

    assert_eq!(item_count(&app, &[("mongoQuery", r#"{"age": {"$gte": 40}}"#)]).await, 6);
    assert_eq!(
        item_count(&app, &[("mongoQuery", r#"{"age": {"$gt": 30, "$lte": 35}}"#)]).await,
        5
    );
    assert_eq!(
        item_count(&app, &[("mongoQuery", r#"{"status": {"$nin": ["active", "banned"]}}"#)]).await,
        9
    );
}

#[tokio::test]
async fn test_mongo_query_logical_operators() {
    let app = setup_app(&users_store(), "users", ListOptions::default());

    let or = r#"{"$or": [{"status": "banned"}, {"role": "admin"}]}"#;
    assert_eq!(item_count(&app, &[("mongoQuery", or)]).await, 9);

    let and = r#"{"$and": [{"status": "pending"}, {"age": {"$lt": 30}}]}"#;
    // pending users below 30: u01, u04, u07
    assert_eq!(item_count(&app, &[("mongoQuery", and)]).await, 3);
}

#[tokio::test]
async fn test_mongo_query_wins_on_collision() {
    let app = setup_app(&users_store(), "users", ListOptions::default());

    let count = item_count(
        &app,
        &[
            ("inList[status]", "active"),
            ("mongoQuery", r#"{"status": "banned"}"#),
        ],
    )
    .await;
    assert_eq!(count, 8);

    let (_, body) = get_list(
        &app,
        &[("status", "active"), ("mongoQuery", r#"{"status": "pending"}"#), ("limit", "100")],
    )
    .await;
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|doc| doc["status"] == "pending")
    );
}

#[tokio::test]
async fn test_base_filter_overrides_query() {
    let options = ListOptions::default().with_base_filter("role", "member");
    let app = setup_app(&users_store(), "users", options);

    assert_eq!(item_count(&app, &[]).await, 23);
    assert_eq!(item_count(&app, &[("role", "admin")]).await, 23);
    assert_eq!(item_count(&app, &[("status", "banned")]).await, 7);
}

#[tokio::test]
async fn test_filters_combine_with_and() {
    let app = setup_app(&users_store(), "users", ListOptions::default());

    let count = item_count(
        &app,
        &[
            ("address.city", "London"),
            ("inList[status]", "active"),
            ("mongoQuery", r#"{"age": {"$gte": 30}}"#),
        ],
    )
    .await;
    // even, divisible by 3, i >= 10: u12, u18, u24
    assert_eq!(count, 3);
}
