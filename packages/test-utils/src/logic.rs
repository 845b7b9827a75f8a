//! CRUD and search scenarios every REST resource must satisfy
//!
//! Each function drives one scenario through a [`RestFixture`] and panics
//! on failure. [`logic_rest_integration_tests!`](crate::logic_rest_integration_tests)
//! turns the whole list into `#[tokio::test]` functions for a concrete
//! resource.

use reqwest::{header::LOCATION, Method, StatusCode};
use secrest_client::{ClientError, ClientOperation, Constraint, NameableEntity, SearchField};
use secrest_shared_config::CredentialsConfig;

use crate::entity::EntityOperations;
use crate::fixture::RestFixture;
use crate::random::{random_alphabetic, random_negative_id, random_numeric, random_positive_id};

/// Create a fresh resource and return its URI
async fn existing_uri<T, O>(fixture: &RestFixture<T, O>) -> String
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    fixture
        .api()
        .create_as_uri(&fixture.create_new_entity(), None)
        .await
        .expect("resource should be created")
}

/// Create a fresh resource and return the server's copy
async fn existing_resource<T, O>(fixture: &RestFixture<T, O>) -> T
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    fixture
        .api()
        .create(&fixture.create_new_entity())
        .await
        .expect("resource should be created")
}

fn id_of<T: NameableEntity>(resource: &T) -> i64 {
    resource.id().expect("persisted resource should have an id")
}

// ========== find - one ==========

pub async fn given_resource_for_id_does_not_exist_when_retrieved_then_404<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let uri = format!("{}{}", fixture.uri(), random_numeric(6));
    let response = fixture
        .api()
        .find_one_by_uri_as_response(&uri, None)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

pub async fn given_resource_for_id_exists_when_retrieved_then_200<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let uri = existing_uri(fixture).await;

    let response = fixture
        .api()
        .find_one_by_uri_as_response(&uri, None)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

pub async fn when_retrieved_by_negative_id_then_404<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let uri = format!("{}{}", fixture.uri(), random_negative_id());

    let response = fixture
        .api()
        .find_one_by_uri_as_response(&uri, None)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

pub async fn when_retrieved_by_non_numeric_id_then_400<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let uri = format!("{}{}", fixture.uri(), random_alphabetic(6));

    let response = fixture
        .api()
        .find_one_by_uri_as_response(&uri, None)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

pub async fn given_resource_for_id_does_not_exist_when_retrieved_then_error<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let uri = format!("{}{}", fixture.uri(), random_numeric(8));

    let result = fixture.api().find_one_by_uri(&uri, None).await;

    assert!(
        matches!(result, Err(ClientError::ResourceAbsent(_))),
        "expected ResourceAbsent, got {:?}",
        result
    );
}

pub async fn given_resource_exists_when_retrieved_then_correctly_retrieved<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let new_resource = fixture.create_new_entity();
    let uri = fixture
        .api()
        .create_as_uri(&new_resource, None)
        .await
        .unwrap();

    let existing = fixture.api().find_one_by_uri(&uri, None).await.unwrap();

    assert_eq!(existing, new_resource);
}

pub async fn given_resource_does_not_exist_when_retrieved_by_id_then_resource_absent<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let result = fixture.api().find_one(random_positive_id()).await;

    assert!(
        matches!(result, Err(ClientError::ResourceAbsent(_))),
        "expected ResourceAbsent, got {:?}",
        result
    );
}

pub async fn given_resource_exists_when_retrieved_then_has_id<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let uri = existing_uri(fixture).await;

    let created = fixture.api().find_one_by_uri(&uri, None).await.unwrap();

    assert!(created.id().is_some());
}

// ========== find one - by attributes ==========

pub async fn given_resource_exists_when_searched_by_name_then_no_errors<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let existing = existing_resource(fixture).await;

    let constraint = Constraint::new(SearchField::Name, ClientOperation::Eq, existing.name());
    fixture.api().search_one(constraint).await.unwrap();
}

pub async fn given_resource_exists_when_searched_by_name_then_found<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let existing = existing_resource(fixture).await;

    let constraint = Constraint::new(SearchField::Name, ClientOperation::Eq, existing.name());
    let by_name = fixture.api().search_one(constraint).await.unwrap();

    assert!(by_name.is_some());
}

pub async fn given_resource_exists_when_searched_by_name_then_found_resource_is_correct<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let existing = existing_resource(fixture).await;

    let constraint = Constraint::new(SearchField::Name, ClientOperation::Eq, existing.name());
    let by_name = fixture.api().search_one(constraint).await.unwrap();

    assert_eq!(by_name, Some(existing));
}

pub async fn given_resource_exists_when_searched_by_negated_name_then_no_errors<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let existing = existing_resource(fixture).await;

    let constraint = Constraint::new(SearchField::Name, ClientOperation::NegEq, existing.name());
    let others = fixture.api().search_all(&[constraint]).await.unwrap();

    assert!(!others.contains(&existing));
}

// ========== find - all ==========

pub async fn when_all_retrieved_then_200<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let response = fixture.api().find_all_as_response(None).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

pub async fn when_all_retrieved_then_no_errors<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    fixture.api().find_all().await.unwrap();
}

pub async fn given_resource_exists_when_all_retrieved_then_it_is_among_them<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let existing = existing_resource(fixture).await;

    let resources = fixture.api().find_all().await.unwrap();

    assert!(resources.contains(&existing));
}

pub async fn given_resource_exists_when_all_retrieved_then_not_empty<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    existing_uri(fixture).await;

    let resources = fixture.api().find_all().await.unwrap();

    assert!(!resources.is_empty());
}

pub async fn when_all_retrieved_then_resources_have_ids<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    existing_uri(fixture).await;

    let resources = fixture.api().find_all().await.unwrap();

    assert!(resources.iter().all(|r| r.id().is_some()));
}

pub async fn given_wrong_credentials_when_all_retrieved_then_401<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let intruder = CredentialsConfig::new(random_alphabetic(6), random_alphabetic(12));

    let response = fixture
        .api()
        .find_all_as_response(Some(&intruder))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));
}

// ========== create ==========

pub async fn when_created_then_201<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let response = fixture
        .api()
        .create_as_response(&fixture.create_new_entity())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

pub async fn when_created_without_body_then_415<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let mime = fixture.api().marshaller().mime();

    let response = fixture
        .given_authenticated(Method::POST)
        .header("Content-Type", mime)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

pub async fn when_created_without_content_type_then_415<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let body = fixture
        .api()
        .marshaller()
        .encode(&fixture.create_new_entity())
        .unwrap();

    let response = fixture
        .given_authenticated(Method::POST)
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

pub async fn when_created_with_non_null_id_then_409<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let mut with_id = fixture.create_new_entity();
    with_id.set_id(Some(5));

    let response = fixture.api().create_as_response(&with_id).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub async fn when_created_then_location_is_returned<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let response = fixture
        .api()
        .create_as_response(&fixture.create_new_entity())
        .await
        .unwrap();

    assert!(response.headers().contains_key(LOCATION));
}

pub async fn given_resource_exists_when_same_resource_created_then_409<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let new_resource = fixture.create_new_entity();
    fixture
        .api()
        .create_as_uri(&new_resource, None)
        .await
        .unwrap();

    let response = fixture
        .api()
        .create_as_response(&new_resource)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub async fn when_created_then_no_errors<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    existing_uri(fixture).await;
}

pub async fn when_created_then_retrievable<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let existing = existing_resource(fixture).await;

    let found = fixture.api().find_one(id_of(&existing)).await.unwrap();

    assert_eq!(found, existing);
}

pub async fn when_created_then_saved_equals_original<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let original = fixture.create_new_entity();

    let saved = fixture.api().create(&original).await.unwrap();

    assert_eq!(saved, original);
}

// ========== update ==========

pub async fn given_invalid_resource_when_updated_then_409<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let mut existing = existing_resource(fixture).await;
    fixture.entity_ops().invalidate(&mut existing);

    let response = fixture.api().update_as_response(&existing).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub async fn when_updated_with_null_id_then_409<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let response = fixture
        .api()
        .update_as_response(&fixture.create_new_entity())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub async fn given_resource_exists_when_updated_then_200<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let existing = existing_resource(fixture).await;

    let response = fixture.api().update_as_response(&existing).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

pub async fn when_updated_without_body_then_415<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let mime = fixture.api().marshaller().mime();

    let response = fixture
        .given_authenticated(Method::PUT)
        .header("Content-Type", mime)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

pub async fn when_updated_with_unsupported_content_type_then_415<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let existing = existing_resource(fixture).await;
    let body = fixture.api().marshaller().encode(&existing).unwrap();

    let response = fixture
        .given_authenticated(Method::PUT)
        .header("Content-Type", "text/plain")
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

pub async fn given_resource_does_not_exist_when_updated_then_404<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let mut unpersisted = fixture.create_new_entity();
    unpersisted.set_id(Some(random_positive_id()));

    let response = fixture
        .api()
        .update_as_response(&unpersisted)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

pub async fn given_resource_exists_when_updated_then_no_errors<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let existing = existing_resource(fixture).await;

    fixture.api().update(&existing).await.unwrap();
}

pub async fn given_resource_exists_when_updated_then_updates_are_persisted<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let mut existing = existing_resource(fixture).await;

    fixture.entity_ops().change(&mut existing);
    fixture.api().update(&existing).await.unwrap();

    let from_server = fixture.api().find_one(id_of(&existing)).await.unwrap();

    assert_eq!(from_server, existing);
}

pub async fn given_other_resource_has_name_when_updated_to_it_then_409<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let first = existing_resource(fixture).await;
    let second = existing_resource(fixture).await;

    let mut clash = first.clone();
    clash.set_id(second.id());

    let response = fixture.api().update_as_response(&clash).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ========== delete ==========

pub async fn when_deleted_by_non_numeric_id_then_400<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let uri = format!("{}{}", fixture.uri(), random_alphabetic(6));

    let response = fixture.api().delete_as_response(&uri).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

pub async fn given_resource_does_not_exist_when_deleted_then_404<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let uri = format!("{}{}", fixture.uri(), random_numeric(6));

    let response = fixture.api().delete_as_response(&uri).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

pub async fn given_resource_exists_when_deleted_then_204<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let uri = existing_uri(fixture).await;

    let response = fixture.api().delete_as_response(&uri).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

pub async fn given_resource_exists_when_deleted_then_retrieving_it_gives_404<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let uri = existing_uri(fixture).await;
    fixture.api().delete_as_response(&uri).await.unwrap();

    let response = fixture
        .api()
        .find_one_by_uri_as_response(&uri, None)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

pub async fn given_resource_exists_when_deleted_then_it_no_longer_exists<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let existing = existing_resource(fixture).await;
    let id = id_of(&existing);

    fixture.api().delete(id).await.unwrap();

    let result = fixture.api().find_one(id).await;
    assert!(
        matches!(result, Err(ClientError::ResourceAbsent(_))),
        "expected ResourceAbsent, got {:?}",
        result
    );

    let remaining = fixture.api().find_all().await.unwrap();
    assert!(!remaining.contains(&existing));
}

/// Instantiate every logic scenario as a `#[tokio::test]`
///
/// `$fixture` is an expression producing a future of a
/// [`RestFixture`](crate::RestFixture); it is awaited once per test so
/// every scenario runs against its own fixture.
///
/// ```rust,ignore
/// mod privilege_logic {
///     secrest_test_utils::logic_rest_integration_tests!(crate::common::privilege_fixture());
/// }
/// ```
#[macro_export]
macro_rules! logic_rest_integration_tests {
    (@scenarios $fixture:expr; $($scenario:ident),+ $(,)?) => {
        $(
            #[tokio::test]
            async fn $scenario() {
                let fixture = $fixture.await;
                $crate::logic::$scenario(&fixture).await;
            }
        )+
    };
    ($fixture:expr) => {
        $crate::logic_rest_integration_tests!(@scenarios $fixture;
            given_resource_for_id_does_not_exist_when_retrieved_then_404,
            given_resource_for_id_exists_when_retrieved_then_200,
            when_retrieved_by_negative_id_then_404,
            when_retrieved_by_non_numeric_id_then_400,
            given_resource_for_id_does_not_exist_when_retrieved_then_error,
            given_resource_exists_when_retrieved_then_correctly_retrieved,
            given_resource_does_not_exist_when_retrieved_by_id_then_resource_absent,
            given_resource_exists_when_retrieved_then_has_id,
            given_resource_exists_when_searched_by_name_then_no_errors,
            given_resource_exists_when_searched_by_name_then_found,
            given_resource_exists_when_searched_by_name_then_found_resource_is_correct,
            given_resource_exists_when_searched_by_negated_name_then_no_errors,
            when_all_retrieved_then_200,
            when_all_retrieved_then_no_errors,
            given_resource_exists_when_all_retrieved_then_it_is_among_them,
            given_resource_exists_when_all_retrieved_then_not_empty,
            when_all_retrieved_then_resources_have_ids,
            given_wrong_credentials_when_all_retrieved_then_401,
            when_created_then_201,
            when_created_without_body_then_415,
            when_created_without_content_type_then_415,
            when_created_with_non_null_id_then_409,
            when_created_then_location_is_returned,
            given_resource_exists_when_same_resource_created_then_409,
            when_created_then_no_errors,
            when_created_then_retrievable,
            when_created_then_saved_equals_original,
            given_invalid_resource_when_updated_then_409,
            when_updated_with_null_id_then_409,
            given_resource_exists_when_updated_then_200,
            when_updated_without_body_then_415,
            when_updated_with_unsupported_content_type_then_415,
            given_resource_does_not_exist_when_updated_then_404,
            given_resource_exists_when_updated_then_no_errors,
            given_resource_exists_when_updated_then_updates_are_persisted,
            given_other_resource_has_name_when_updated_to_it_then_409,
            when_deleted_by_non_numeric_id_then_400,
            given_resource_does_not_exist_when_deleted_then_404,
            given_resource_exists_when_deleted_then_204,
            given_resource_exists_when_deleted_then_retrieving_it_gives_404,
            given_resource_exists_when_deleted_then_it_no_longer_exists,
        );
    };
}
