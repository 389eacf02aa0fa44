// src/products/tests/mediator_tests.rs

use super::{test_mediator, update_command, widget_command};
use crate::common::ApiError;
use crate::products::models::*;
use uuid::Uuid;

#[tokio::test]
async fn test_create_then_get_by_id() {
    let mediator = test_mediator().await;

    let created = mediator.send(widget_command()).await.unwrap();
    let found = mediator
        .send(GetProductByIdQuery { id: created.id })
        .await
        .unwrap();

    assert_eq!(found.product.id, created.id);
    assert_eq!(found.product.name, "Widget");
    assert_eq!(found.product.version, 1);
}

#[tokio::test]
async fn test_create_invalid_persists_nothing() {
    let mediator = test_mediator().await;

    let mut command = widget_command();
    command.name = "Ab".to_string();

    let err = mediator.send(command).await.unwrap_err();
    match err {
        ApiError::ValidationError(errors) => {
            assert_eq!(errors, vec!["[Name] must be at least 3 characters long.".to_string()]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let all = mediator.send(GetAllProductsQuery::default()).await.unwrap();
    assert!(all.products.is_empty());
}

#[tokio::test]
async fn test_get_by_id_missing_is_not_found() {
    let mediator = test_mediator().await;

    let err = mediator
        .send(GetProductByIdQuery { id: Uuid::new_v4() })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_update_bumps_version() {
    let mediator = test_mediator().await;
    let created = mediator.send(widget_command()).await.unwrap();

    let updated = mediator.send(update_command(created.id, 1)).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.version, 2);

    let found = mediator
        .send(GetProductByIdQuery { id: created.id })
        .await
        .unwrap();
    assert_eq!(found.product.name, "Widget Pro");
    assert_eq!(found.product.price, 19.99);
    assert_eq!(found.product.version, 2);
}

#[tokio::test]
async fn test_update_with_stale_version_conflicts() {
    let mediator = test_mediator().await;
    let created = mediator.send(widget_command()).await.unwrap();

    mediator.send(update_command(created.id, 1)).await.unwrap();

    // A second writer still holding version 1
    let mut stale = update_command(created.id, 1);
    stale.name = "Stale Widget".to_string();
    let err = mediator.send(stale).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let found = mediator
        .send(GetProductByIdQuery { id: created.id })
        .await
        .unwrap();
    assert_eq!(found.product.name, "Widget Pro");
    assert_eq!(found.product.version, 2);
}

#[tokio::test]
async fn test_invalid_update_leaves_stored_product_unchanged() {
    let mediator = test_mediator().await;
    let created = mediator.send(widget_command()).await.unwrap();

    let mut command = update_command(created.id, 1);
    command.price = 0.0;
    command.category.clear();

    let err = mediator.send(command).await.unwrap_err();
    match err {
        ApiError::ValidationError(errors) => {
            assert_eq!(
                errors,
                vec![
                    "[Price] must be greater than or equal to 0.01.".to_string(),
                    "[Category] must contain at least one item.".to_string(),
                ]
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let found = mediator
        .send(GetProductByIdQuery { id: created.id })
        .await
        .unwrap();
    assert_eq!(found.product.name, "Widget");
    assert_eq!(found.product.version, 1);

    // The original version still applies once the fields are valid
    let updated = mediator.send(update_command(created.id, 1)).await.unwrap();
    assert_eq!(updated.version, 2);
}

#[tokio::test]
async fn test_update_missing_product_is_not_found() {
    let mediator = test_mediator().await;

    let err = mediator
        .send(update_command(Uuid::new_v4(), 1))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_update_nil_id_fails_validation_before_lookup() {
    let mediator = test_mediator().await;

    let err = mediator
        .send(update_command(Uuid::nil(), 0))
        .await
        .unwrap_err();

    match err {
        ApiError::ValidationError(errors) => {
            assert_eq!(
                errors,
                vec!["Product ID is required".to_string(), "Invalid version".to_string()]
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_removes_product() {
    let mediator = test_mediator().await;
    let created = mediator.send(widget_command()).await.unwrap();

    let deleted = mediator
        .send(DeleteProductByIdCommand { id: created.id })
        .await
        .unwrap();
    assert!(deleted.is_success);

    let err = mediator
        .send(GetProductByIdQuery { id: created.id })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = mediator
        .send(DeleteProductByIdCommand { id: created.id })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_get_by_category_matches_whole_tags() {
    let mediator = test_mediator().await;

    let tools = mediator.send(widget_command()).await.unwrap();

    let mut toy = widget_command();
    toy.name = "Yo-yo".to_string();
    toy.category = vec!["Toys".to_string()];
    mediator.send(toy).await.unwrap();

    let mut both = widget_command();
    both.name = "Toy hammer".to_string();
    both.category = vec!["Toys".to_string(), "Tools".to_string()];
    let both = mediator.send(both).await.unwrap();

    let result = mediator
        .send(GetProductsByCategoryQuery {
            category: "Tools".to_string(),
        })
        .await
        .unwrap();
    let ids: Vec<Uuid> = result.products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![tools.id, both.id]);

    let result = mediator
        .send(GetProductsByCategoryQuery {
            category: "Tool".to_string(),
        })
        .await
        .unwrap();
    assert!(result.products.is_empty());
}

#[tokio::test]
async fn test_get_all_pagination() {
    let mediator = test_mediator().await;

    for i in 0..12 {
        let mut command = widget_command();
        command.name = format!("Widget {i:02}");
        mediator.send(command).await.unwrap();
    }

    let all = mediator.send(GetAllProductsQuery::default()).await.unwrap();
    assert_eq!(all.products.len(), 12);

    // Page size defaults to 10
    let first = mediator
        .send(GetAllProductsQuery {
            page: Some(1),
            page_size: None,
        })
        .await
        .unwrap();
    assert_eq!(first.products.len(), 10);
    assert_eq!(first.products[0].name, "Widget 00");

    let second = mediator
        .send(GetAllProductsQuery {
            page: Some(2),
            page_size: Some(5),
        })
        .await
        .unwrap();
    let names: Vec<&str> = second.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Widget 05", "Widget 06", "Widget 07", "Widget 08", "Widget 09"]
    );

    // Page 0 is treated as the first page
    let zero = mediator
        .send(GetAllProductsQuery {
            page: Some(0),
            page_size: Some(3),
        })
        .await
        .unwrap();
    assert_eq!(zero.products[0].name, "Widget 00");

    let past_end = mediator
        .send(GetAllProductsQuery {
            page: Some(4),
            page_size: Some(5),
        })
        .await
        .unwrap();
    assert!(past_end.products.is_empty());
}
